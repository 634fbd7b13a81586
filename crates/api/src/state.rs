//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::services::auth::TokenCodec;
use crate::services::avatar::AvatarStore;

/// Application state shared across all handlers.
///
/// Constructed once at process start and passed by axum state into every
/// handler. Never reconstructed per call, never reached through a global.
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    tokens: TokenCodec,
    avatars: AvatarStore,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ApiConfig, pool: PgPool) -> Self {
        let tokens = TokenCodec::new(&config.jwt_secret);
        let avatars = AvatarStore::new(&config.uploads_dir);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                tokens,
                avatars,
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the bearer token codec.
    #[must_use]
    pub fn tokens(&self) -> &TokenCodec {
        &self.inner.tokens
    }

    /// Get a reference to the avatar file store.
    #[must_use]
    pub fn avatars(&self) -> &AvatarStore {
        &self.inner.avatars
    }
}
