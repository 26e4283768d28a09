use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use globalgood_core::auth::AuthError;
use globalgood_core::catalog::{ReferenceError, ValidationError};
use globalgood_core::query::PlanError;
use globalgood_core::storage::RepositoryError;
use globalgood_core::{service_error_to_status_code, ServiceError};
use serde_json::json;

pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Classifies the wrapped error into the service taxonomy.
    ///
    /// Anything unrecognised is an upstream failure.
    pub fn service_error(&self) -> ServiceError {
        let err = &self.0;
        if let Some(e) = err.downcast_ref::<ServiceError>() {
            return e.clone();
        }
        if let Some(e) = err.downcast_ref::<RepositoryError>() {
            return e.clone().into();
        }
        if let Some(e) = err.downcast_ref::<ValidationError>() {
            return e.clone().into();
        }
        if let Some(e) = err.downcast_ref::<PlanError>() {
            return e.clone().into();
        }
        if let Some(e) = err.downcast_ref::<ReferenceError>() {
            return e.clone().into();
        }
        if let Some(e) = err.downcast_ref::<AuthError>() {
            return e.clone().into();
        }
        if let Some(e) = err.downcast_ref::<JsonRejection>() {
            return ServiceError::InvalidInput(e.body_text());
        }
        if let Some(e) = err.downcast_ref::<QueryRejection>() {
            return ServiceError::InvalidInput(e.body_text());
        }
        if let Some(e) = err.downcast_ref::<PathRejection>() {
            return ServiceError::InvalidInput(e.body_text());
        }
        ServiceError::UpstreamFailure(RepositoryError::QueryFailed(err.to_string()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error = self.service_error();
        let status = StatusCode::from_u16(service_error_to_status_code(&error))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(error = ?self.0, "Request failed");
        } else {
            tracing::warn!(status = %status, message = %error, "Request rejected");
        }

        (status, Json(json!({ "message": error.to_string() }))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
