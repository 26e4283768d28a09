//! Axum extractors for authentication.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use globalgood_core::auth::{extract_bearer, require_group, AuthError as CoreError, Identity};

use crate::error::AuthError;
use crate::AuthState;

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_bearer)
}

async fn authenticate(parts: &Parts, auth_state: &AuthState) -> Result<Identity, AuthError> {
    let token = bearer_token(parts).ok_or(CoreError::MissingToken)?;
    Ok(auth_state.verifier.verify(token).await?)
}

/// Extractor for an authenticated user. Returns 401 if not authenticated.
pub struct CurrentUser(pub Identity);

impl<S> FromRequestParts<S> for CurrentUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        authenticate(parts, &auth_state).await.map(CurrentUser)
    }
}

/// Extractor for an optionally authenticated user.
///
/// A missing or invalid token yields `None` instead of a rejection.
pub struct OptionalUser(pub Option<Identity>);

impl<S> FromRequestParts<S> for OptionalUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if bearer_token(parts).is_none() {
            return Ok(OptionalUser(None));
        }
        let auth_state = AuthState::from_ref(state);
        match authenticate(parts, &auth_state).await {
            Ok(identity) => Ok(OptionalUser(Some(identity))),
            Err(e) => {
                tracing::debug!("Ignoring invalid optional token: {}", e);
                Ok(OptionalUser(None))
            }
        }
    }
}

/// Extractor for a member of the configured admin group.
///
/// Non-members are rejected with 401 like unauthenticated callers.
pub struct AdminUser(pub Identity);

impl<S> FromRequestParts<S> for AdminUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        let identity = authenticate(parts, &auth_state).await?;
        require_group(&identity, &auth_state.config.admin_group)?;
        Ok(AdminUser(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AuthConfig, Hs256Verifier};
    use axum::{body::Body, http::Request, http::StatusCode, routing::get, Router};
    use globalgood_core::auth::AccessClaims;
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    #[derive(Clone)]
    struct TestState {
        auth: AuthState,
    }

    impl AsRef<AuthState> for TestState {
        fn as_ref(&self) -> &AuthState {
            &self.auth
        }
    }

    fn verifier() -> Hs256Verifier {
        Hs256Verifier::new("test-secret", None)
    }

    fn token(username: &str, groups: &[&str]) -> String {
        let exp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64
            + 3600;
        verifier()
            .issue(&AccessClaims {
                sub: format!("sub-{username}"),
                username: Some(username.to_string()),
                groups: groups.iter().map(|g| g.to_string()).collect(),
                token_use: "access".to_string(),
                client_id: None,
                iss: None,
                exp,
            })
            .unwrap()
    }

    fn app() -> Router {
        let state = TestState {
            auth: AuthState::new(Arc::new(verifier()), AuthConfig::default()),
        };
        Router::new()
            .route(
                "/me",
                get(|CurrentUser(user): CurrentUser| async move { user.username }),
            )
            .route(
                "/maybe",
                get(|OptionalUser(user): OptionalUser| async move {
                    user.map(|u| u.username).unwrap_or_else(|| "anonymous".to_string())
                }),
            )
            .route(
                "/admin",
                get(|AdminUser(user): AdminUser| async move { user.username }),
            )
            .with_state(state)
    }

    async fn call(path: &str, token: Option<&str>) -> (StatusCode, String) {
        let mut request = Request::builder().uri(path);
        if let Some(token) = token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        let response = app()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn current_user_requires_token() {
        let (status, body) = call("/me", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, r#"{"message":"Unauthorized"}"#);
    }

    #[tokio::test]
    async fn current_user_accepts_valid_token() {
        let (status, body) = call("/me", Some(&token("alice", &[]))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "alice");
    }

    #[tokio::test]
    async fn current_user_rejects_tampered_token() {
        let (status, _) = call("/me", Some("abc.def.ghi")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn optional_user_falls_back_to_anonymous() {
        assert_eq!(call("/maybe", None).await.1, "anonymous");
        assert_eq!(call("/maybe", Some("garbage")).await.1, "anonymous");
        assert_eq!(call("/maybe", Some(&token("bob", &[]))).await.1, "bob");
    }

    #[tokio::test]
    async fn admin_requires_group_and_answers_401() {
        let (status, _) = call("/admin", Some(&token("alice", &[]))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = call("/admin", Some(&token("root", &["admin-users"]))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "root");
    }
}
