use url::Url;

use crate::error::AuthError;

/// Token verification settings.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub region: String,
    /// Identity-provider user pool. Enables RS256 verification against its key set.
    pub user_pool_id: Option<String>,
    /// App client the access tokens must be issued to.
    pub client_id: Option<String>,
    /// Shared secret for locally minted HS256 tokens.
    pub hs256_secret: Option<String>,
    /// Group whose members may use the admin routes.
    pub admin_group: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            region: "us-west-1".to_string(),
            user_pool_id: None,
            client_id: None,
            hs256_secret: None,
            admin_group: "admin-users".to_string(),
        }
    }
}

impl AuthConfig {
    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `AWS_REGION`: Region of the user pool (default: `us-west-1`)
    /// - `USER_POOL_ID`: User pool ID (optional, enables RS256 verification)
    /// - `POOL_CLIENT_ID`: App client ID access tokens must carry (optional)
    /// - `AUTH_HS256_SECRET`: Shared secret for development tokens (optional)
    /// - `ADMIN_GROUP`: Admin group name (default: `admin-users`)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let non_empty = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        Self {
            region: non_empty("AWS_REGION").unwrap_or(defaults.region),
            user_pool_id: non_empty("USER_POOL_ID"),
            client_id: non_empty("POOL_CLIENT_ID"),
            hs256_secret: non_empty("AUTH_HS256_SECRET"),
            admin_group: non_empty("ADMIN_GROUP").unwrap_or(defaults.admin_group),
        }
    }

    /// Issuer of the pool's tokens.
    pub fn issuer(&self) -> Option<String> {
        self.user_pool_id.as_ref().map(|pool| {
            format!("https://cognito-idp.{}.amazonaws.com/{}", self.region, pool)
        })
    }

    /// Location of the pool's public signing keys.
    pub fn jwks_url(&self) -> Result<Option<Url>, AuthError> {
        self.issuer()
            .map(|issuer| {
                Url::parse(&format!("{issuer}/.well-known/jwks.json"))
                    .map_err(|e| AuthError::Config(format!("invalid key set URL: {e}")))
            })
            .transpose()
    }
}
