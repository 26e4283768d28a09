use async_trait::async_trait;

use super::{AuthError, Identity};

/// Result type for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Verifies a bearer token and returns the caller it identifies.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Identity>;
}
