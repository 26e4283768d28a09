//! Application state shared by all request handlers.
//!
//! Collaborators are built once at startup and injected here as trait
//! objects: the document store selected by feature flag and the token
//! verifier chosen by [`AuthState::from_config`].

use std::sync::Arc;

use globalgood_auth::AuthState;
use globalgood_core::relations::RelationSynchronizer;
use globalgood_core::storage::{DocumentStore, Tables};

use crate::config::Config;

/// Shared application state.
///
/// This is cloned for each request handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    /// Likes and comment log maintenance on blog posts.
    pub relations: RelationSynchronizer,
    pub auth: AuthState,
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates a new AppState over the given store.
    pub fn build(store: Arc<dyn DocumentStore>, auth: AuthState, config: Config) -> Self {
        let relations = RelationSynchronizer::new(store.clone(), config.tables.clone());
        Self {
            store,
            relations,
            auth,
            config: Arc::new(config),
        }
    }

    pub fn tables(&self) -> &Tables {
        &self.config.tables
    }
}

impl AsRef<AuthState> for AppState {
    fn as_ref(&self) -> &AuthState {
        &self.auth
    }
}

// ============================================================================
// Backend-specific constructors
// ============================================================================

#[cfg(feature = "inmemory")]
mod inmemory_backend {
    use super::*;
    use crate::mock_data;
    use crate::storage::InMemoryStore;

    impl AppState {
        /// Creates AppState with in-memory storage seeded with the demo catalogue.
        pub async fn new(config: Config, auth: AuthState) -> Result<Self, anyhow::Error> {
            let store = Arc::new(InMemoryStore::new(&config.tables));
            mock_data::seed(&*store, &config.tables).await?;

            tracing::info!("Using in-memory storage");
            Ok(Self::build(store, auth, config))
        }
    }
}

#[cfg(feature = "dynamodb")]
mod dynamodb_backend {
    use super::*;
    use crate::storage::DynamoDbStore;

    impl AppState {
        /// Creates AppState with DynamoDB storage.
        pub async fn new(config: Config, auth: AuthState) -> Result<Self, anyhow::Error> {
            let store = Arc::new(DynamoDbStore::connect(&config.region, &config.tables).await);

            tracing::info!(region = %config.region, "Using DynamoDB storage");
            Ok(Self::build(store, auth, config))
        }
    }
}

// ============================================================================
// Test support
// ============================================================================

#[cfg(all(test, feature = "inmemory"))]
pub mod test_support {
    use super::*;
    use crate::storage::InMemoryStore;

    use globalgood_auth::{AuthConfig, Hs256Verifier};
    use globalgood_core::auth::AccessClaims;

    pub const TEST_SECRET: &str = "test-secret";
    pub const ADMIN_GROUP: &str = "admin-users";

    /// State over an empty in-memory store with a shared-secret verifier.
    pub fn test_state() -> (AppState, InMemoryStore) {
        let store = InMemoryStore::default();
        let auth = AuthState::new(
            Arc::new(Hs256Verifier::new(TEST_SECRET, None)),
            AuthConfig::default(),
        );
        let state = AppState::build(Arc::new(store.clone()), auth, Config::default());
        (state, store)
    }

    /// Mints an access token for `username`, valid for one hour.
    pub fn token(username: &str, groups: &[&str]) -> String {
        let exp = chrono::Utc::now().timestamp() + 3600;
        Hs256Verifier::new(TEST_SECRET, None)
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

    pub fn admin_token() -> String {
        token("root", &[ADMIN_GROUP])
    }
}
