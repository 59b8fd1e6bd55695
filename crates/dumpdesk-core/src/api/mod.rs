//! REST API client module for the marketplace backend.
//!
//! This module provides the `ApiClient` for signing in and for the CRUD
//! calls behind the Admins, Customers, Drivers and Products pages.
//!
//! Requests carry the session's JWT as a bearer token.

pub mod client;
pub mod error;

pub use client::{ApiClient, DeleteOutcome, EntityKind, LoginResponse};
pub use error::ApiError;
