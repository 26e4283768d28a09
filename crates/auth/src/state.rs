//! Application state for auth.

use axum::extract::FromRef;
use globalgood_core::auth::TokenVerifier;
use std::sync::Arc;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::verifiers::{Hs256Verifier, JwksVerifier};

/// Shared state for the auth extractors.
#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn TokenVerifier>,
    pub config: Arc<AuthConfig>,
}

impl AuthState {
    pub fn new(verifier: Arc<dyn TokenVerifier>, config: AuthConfig) -> Self {
        Self {
            verifier,
            config: Arc::new(config),
        }
    }

    /// Picks the verifier the configuration enables.
    ///
    /// A user pool takes precedence over the development shared secret.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when neither is configured.
    pub fn from_config(config: AuthConfig) -> Result<Self, AuthError> {
        let verifier: Arc<dyn TokenVerifier> = if config.user_pool_id.is_some() {
            tracing::info!(region = %config.region, "Verifying tokens against the user pool key set");
            Arc::new(JwksVerifier::new(&config)?)
        } else if let Some(secret) = &config.hs256_secret {
            tracing::warn!("Verifying tokens with the development shared secret");
            Arc::new(Hs256Verifier::new(secret, config.client_id.clone()))
        } else {
            return Err(AuthError::Config(
                "set USER_POOL_ID or AUTH_HS256_SECRET".to_string(),
            ));
        };

        Ok(Self::new(verifier, config))
    }
}

/// Allows AuthState to be extracted from a parent state.
impl<S> FromRef<S> for AuthState
where
    S: AsRef<AuthState>,
{
    fn from_ref(state: &S) -> Self {
        state.as_ref().clone()
    }
}
