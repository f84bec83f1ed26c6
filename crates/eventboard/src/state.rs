//! Application state.
//!
//! Shared by every request handler: the event list container, the
//! data-access façade it writes through, and the auth state. The storage
//! backend behind the façade is chosen by feature flag.

use std::sync::Arc;

use eventboard_auth::{AuthConfig, AuthState, MemoryIdentityProvider};
use eventboard_core::auth::IdentityProvider;
use eventboard_core::storage::EventRepository;

use crate::config::Config;
use crate::event_list::EventList;
use crate::service::EventService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The events shown by the pages.
    pub events: EventList,
    /// Direct store access for lookups that must not disturb the list.
    pub service: EventService,
    pub auth: AuthState,
    pub config: Arc<Config>,
}

impl AsRef<AuthState> for AppState {
    fn as_ref(&self) -> &AuthState {
        &self.auth
    }
}

impl AppState {
    /// Assembles the state around an already-built repository and auth state.
    pub fn build(repo: Arc<dyn EventRepository>, auth: AuthState, config: Config) -> Self {
        let service = EventService::new(repo);
        Self {
            events: EventList::new(service.clone()),
            service,
            auth,
            config: Arc::new(config),
        }
    }

    /// State over a fresh in-memory store and in-memory identity provider.
    ///
    /// Must be called from within a Tokio runtime.
    #[cfg(any(test, feature = "inmemory"))]
    pub fn in_memory(auth_config: AuthConfig) -> Self {
        let provider = Arc::new(MemoryIdentityProvider::from_config(&auth_config));
        Self::build(
            Arc::new(crate::storage::InMemoryRepository::new()),
            AuthState::new(provider, auth_config),
            Config::default(),
        )
    }
}

/// Picks the identity provider for `auth_config`.
///
/// The hosted provider is used when it is configured and compiled in.
pub fn identity_provider(auth_config: &AuthConfig) -> Arc<dyn IdentityProvider> {
    #[cfg(feature = "auth-gotrue")]
    if let Some(hosted) = &auth_config.hosted {
        tracing::info!(url = %hosted.url, "Using hosted identity provider");
        return Arc::new(eventboard_auth::GoTrueProvider::new(hosted));
    }

    #[cfg(not(feature = "auth-gotrue"))]
    if auth_config.hosted.is_some() {
        tracing::warn!("IDENTITY_URL is set but the 'auth-gotrue' feature is disabled");
    }

    if auth_config.accounts.is_empty() {
        tracing::warn!("No admin account configured; set ADMIN_EMAIL and ADMIN_PASSWORD");
    }
    Arc::new(MemoryIdentityProvider::from_config(auth_config))
}

// ============================================================================
// Storage backend selection
// ============================================================================

#[cfg(feature = "inmemory")]
mod backend {
    use super::*;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates a new AppState with an in-memory store.
        pub async fn new(config: Config, auth_config: AuthConfig) -> anyhow::Result<Self> {
            tracing::info!("Using in-memory storage");
            let auth = AuthState::new(identity_provider(&auth_config), auth_config);
            Ok(Self::build(
                Arc::new(InMemoryRepository::new()),
                auth,
                config,
            ))
        }
    }
}

#[cfg(feature = "sqlite")]
mod backend {
    use super::*;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates a new AppState backed by the SQLite file at `SQLITE_PATH`.
        pub async fn new(config: Config, auth_config: AuthConfig) -> anyhow::Result<Self> {
            tracing::info!(path = %config.sqlite_path, "Using SQLite storage");
            let repo = SqliteRepository::new(&config.sqlite_path).await?;
            let auth = AuthState::new(identity_provider(&auth_config), auth_config);
            Ok(Self::build(Arc::new(repo), auth, config))
        }
    }
}

#[cfg(feature = "postgrest")]
mod backend {
    use anyhow::Context;

    use super::*;
    use crate::storage::PostgrestRepository;

    impl AppState {
        /// Creates a new AppState backed by the hosted store at `STORE_URL`.
        pub async fn new(config: Config, auth_config: AuthConfig) -> anyhow::Result<Self> {
            let (Some(url), Some(api_key)) = (&config.store_url, &config.store_api_key) else {
                anyhow::bail!("STORE_URL and STORE_API_KEY are required for the 'postgrest' backend");
            };
            let url: url::Url = url.parse().context("STORE_URL is not a valid URL")?;

            tracing::info!(url = %url, "Using hosted storage");
            let repo = PostgrestRepository::new(&url, api_key.clone())?;
            let auth = AuthState::new(identity_provider(&auth_config), auth_config);
            Ok(Self::build(Arc::new(repo), auth, config))
        }
    }
}
