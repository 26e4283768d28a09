//! RS256 verification against the identity provider's published key set.

use std::collections::HashMap;

use async_trait::async_trait;
use globalgood_core::auth::{
    claims_to_identity, AccessClaims, AuthError, Identity, Result, TokenVerifier,
};
use jsonwebtoken::{decode, decode_header, jwk::JwkSet, Algorithm, DecodingKey, Validation};
use tokio::sync::RwLock;
use url::Url;

use crate::config::AuthConfig;
use crate::error::AuthError as CrateError;

/// Verifies pool-issued access tokens.
///
/// Signing keys are fetched lazily and cached by key ID; an unknown key ID
/// triggers one refresh so rotated keys are picked up.
pub struct JwksVerifier {
    jwks_url: Url,
    issuer: String,
    client_id: Option<String>,
    http_client: reqwest::Client,
    keys: RwLock<HashMap<String, DecodingKey>>,
}

impl JwksVerifier {
    /// # Errors
    ///
    /// Returns a configuration error when no user pool is configured.
    pub fn new(config: &AuthConfig) -> std::result::Result<Self, CrateError> {
        let jwks_url = config
            .jwks_url()?
            .ok_or_else(|| CrateError::Config("USER_POOL_ID is not set".to_string()))?;
        let issuer = config
            .issuer()
            .ok_or_else(|| CrateError::Config("USER_POOL_ID is not set".to_string()))?;

        let http_client = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| CrateError::Http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            jwks_url,
            issuer,
            client_id: config.client_id.clone(),
            http_client,
            keys: RwLock::new(HashMap::new()),
        })
    }

    async fn refresh(&self) -> Result<()> {
        let set: JwkSet = self
            .http_client
            .get(self.jwks_url.clone())
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| AuthError::KeySet(e.to_string()))?
            .json()
            .await
            .map_err(|e| AuthError::KeySet(e.to_string()))?;

        let keys: HashMap<String, DecodingKey> = set
            .keys
            .iter()
            .filter_map(|jwk| {
                let kid = jwk.common.key_id.clone()?;
                DecodingKey::from_jwk(jwk).ok().map(|key| (kid, key))
            })
            .collect();

        tracing::debug!(count = keys.len(), "Loaded signing keys");
        *self.keys.write().await = keys;
        Ok(())
    }

    async fn key_for(&self, kid: &str) -> Result<DecodingKey> {
        if let Some(key) = self.keys.read().await.get(kid) {
            return Ok(key.clone());
        }
        self.refresh().await?;
        self.keys
            .read()
            .await
            .get(kid)
            .cloned()
            .ok_or_else(|| AuthError::InvalidToken("unknown signing key".to_string()))
    }
}

#[async_trait]
impl TokenVerifier for JwksVerifier {
    async fn verify(&self, token: &str) -> Result<Identity> {
        let header = decode_header(token).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidToken("missing key id".to_string()))?;
        let key = self.key_for(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        // Access tokens carry client_id instead of aud.
        validation.validate_aud = false;

        let data = decode::<AccessClaims>(token, &key, &validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        claims_to_identity(data.claims, self.client_id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_requires_user_pool() {
        assert!(matches!(
            JwksVerifier::new(&AuthConfig::default()),
            Err(CrateError::Config(_))
        ));
    }

    #[tokio::test]
    async fn verify_rejects_garbage_without_fetching() {
        let config = AuthConfig {
            user_pool_id: Some("us-west-1_abc".to_string()),
            ..AuthConfig::default()
        };
        let verifier = JwksVerifier::new(&config).unwrap();

        let err = verifier.verify("not-a-jwt").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }
}
