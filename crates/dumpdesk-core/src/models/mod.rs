//! Data models for the marketplace entities.
//!
//! This module contains the wire types exchanged with the REST API:
//!
//! - `Admin`: console administrators
//! - `Customer`: customers renting dumpsters
//! - `Driver`, `PixKeyType`: truck drivers and their payout keys
//! - `Product`: rentable products, with multipart create/update payloads
//! - `ListRequest`, `ListResponse`, `ApiResponse`: pagination and envelopes

pub mod admin;
pub mod common;
pub mod customer;
pub mod driver;
pub mod product;

pub use admin::{Admin, AdminResponse, UpdateAdminPayload};
pub use common::{ApiResponse, ListRequest, ListResponse, DEFAULT_PAGE_SIZE};
pub use customer::{CreateCustomerPayload, Customer, UpdateCustomerPayload};
pub use driver::{CreateDriverPayload, Driver, PixKeyType, UpdateDriverPayload};
pub use product::{CreateProductPayload, Product, ProductImage, UpdateProductPayload};
