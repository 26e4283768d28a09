//! The error taxonomy surfaced to callers, and its pure status-code mapping.

use thiserror::Error;

use crate::auth::AuthError;
use crate::catalog::{ReferenceError, ValidationError};
use crate::query::PlanError;
use crate::storage::RepositoryError;

/// Errors a request can end in.
///
/// Authentication and upstream failures carry generic messages only; the
/// underlying detail stays in the source chain for logging.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Unauthorized")]
    Unauthenticated,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Internal server error")]
    UpstreamFailure(#[source] RepositoryError),
}

impl From<ValidationError> for ServiceError {
    fn from(error: ValidationError) -> Self {
        ServiceError::InvalidInput(error.to_string())
    }
}

impl From<PlanError> for ServiceError {
    fn from(error: PlanError) -> Self {
        ServiceError::InvalidInput(error.to_string())
    }
}

impl From<ReferenceError> for ServiceError {
    fn from(error: ReferenceError) -> Self {
        ServiceError::InvalidInput(error.to_string())
    }
}

impl From<AuthError> for ServiceError {
    fn from(error: AuthError) -> Self {
        if error.is_forbidden() {
            ServiceError::Unauthorized
        } else {
            ServiceError::Unauthenticated
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound { entity_type, .. } => {
                ServiceError::NotFound(format!("{entity_type} not found"))
            }
            other => ServiceError::UpstreamFailure(other),
        }
    }
}

/// Maps a [`ServiceError`] to an HTTP status code.
///
/// Missing group membership is reported as 401, like a missing token.
///
/// ```
/// use globalgood_core::{service_error_to_status_code, ServiceError};
///
/// assert_eq!(service_error_to_status_code(&ServiceError::Unauthorized), 401);
/// assert_eq!(
///     service_error_to_status_code(&ServiceError::NotFound("BlogPost not found".into())),
///     404
/// );
/// ```
pub fn service_error_to_status_code(error: &ServiceError) -> u16 {
    match error {
        ServiceError::Unauthenticated => 401,
        ServiceError::Unauthorized => 401,
        ServiceError::InvalidInput(_) => 400,
        ServiceError::NotFound(_) => 404,
        ServiceError::UpstreamFailure(_) => 500,
    }
}
