//! Core library for the dumpdesk admin console.
//!
//! - `auth`: session lifecycle (token decoding, persistence, expiry)
//! - `guard`: route selection from the session state
//! - `api`: REST client for the marketplace backend
//! - `models`: wire types for admins, customers, drivers and products
//! - `config`: console configuration

pub mod api;
pub mod auth;
pub mod config;
pub mod guard;
pub mod models;
pub mod utils;
