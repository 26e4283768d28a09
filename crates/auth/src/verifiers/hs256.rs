//! Shared-secret verification for local development and tests.

use async_trait::async_trait;
use globalgood_core::auth::{
    claims_to_identity, AccessClaims, AuthError, Identity, Result, TokenVerifier,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Verifies HS256 access tokens signed with a shared secret.
pub struct Hs256Verifier {
    decoding: DecodingKey,
    encoding: EncodingKey,
    client_id: Option<String>,
}

impl Hs256Verifier {
    pub fn new(secret: &str, client_id: Option<String>) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            client_id,
        }
    }

    /// Signs `claims` with the shared secret.
    pub fn issue(&self, claims: &AccessClaims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

#[async_trait]
impl TokenVerifier for Hs256Verifier {
    async fn verify(&self, token: &str) -> Result<Identity> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;

        let data = decode::<AccessClaims>(token, &self.decoding, &validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        claims_to_identity(data.claims, self.client_id.as_deref())
    }
}
