use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Auth errors for the globalgood_auth crate.
///
/// This wraps the core `AuthError` and adds the errors of the I/O side:
/// fetching signing keys and reading configuration.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Error from the core auth module (token claims, group membership)
    #[error(transparent)]
    Core(#[from] globalgood_core::auth::AuthError),

    /// HTTP client error while fetching signing keys
    #[error("HTTP error: {0}")]
    Http(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl IntoResponse for AuthError {
    /// Every failure is a bare 401; the reason is only logged.
    fn into_response(self) -> Response {
        match &self {
            AuthError::Core(globalgood_core::auth::AuthError::MissingToken) => {
                tracing::debug!("Rejected request: {}", self)
            }
            AuthError::Core(_) => tracing::warn!("Rejected request: {}", self),
            AuthError::Http(_) | AuthError::Config(_) => {
                tracing::error!("Token verification failed: {}", self)
            }
        }

        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Unauthorized" })),
        )
            .into_response()
    }
}
