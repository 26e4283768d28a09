//! Functional core for the globalgood services.
//!
//! Everything in this crate is free of I/O except through the [`storage::DocumentStore`]
//! trait, which the server crate implements for each backend.

pub mod auth;
pub mod catalog;
pub mod error;
pub mod query;
pub mod relations;
pub mod serde;
pub mod storage;

pub use error::{service_error_to_status_code, ServiceError};
