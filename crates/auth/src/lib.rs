//! Bearer-token authentication for globalgood.
//!
//! This crate provides:
//! - Access-token verification against the user pool key set (RS256)
//! - A shared-secret verifier (HS256) for local development and tests
//! - Axum extractors for authenticated, optional and admin callers

mod config;
mod error;
mod extractors;
mod state;
mod verifiers;

pub use config::AuthConfig;
pub use error::AuthError;
pub use extractors::{AdminUser, CurrentUser, OptionalUser};
pub use state::AuthState;
pub use verifiers::{Hs256Verifier, JwksVerifier};
