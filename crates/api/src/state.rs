//! Application state shared across handlers.

use std::collections::HashSet;
use std::sync::Arc;

use sqlx::PgPool;

use kiosk_core::TelegramId;

use crate::config::AppConfig;
use crate::services::auth;

/// Credential verification material, derived once at startup and read-only
/// afterwards.
#[derive(Clone)]
pub struct AuthKeys {
    secret: [u8; 32],
    admin_ids: HashSet<TelegramId>,
}

impl AuthKeys {
    /// The HMAC key credentials are verified against.
    #[must_use]
    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    /// Whether this Telegram id is granted admin status at row creation.
    #[must_use]
    pub fn is_allowlisted_admin(&self, id: TelegramId) -> bool {
        self.admin_ids.contains(&id)
    }
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    pool: PgPool,
    auth: AuthKeys,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Derives the credential verification secret from the bot token here,
    /// once; request handling only ever reads it.
    #[must_use]
    pub fn new(config: AppConfig, pool: PgPool) -> Self {
        let auth = AuthKeys {
            secret: auth::derive_secret(config.bot_token()),
            admin_ids: config.admin_ids.clone(),
        };

        Self {
            inner: Arc::new(AppStateInner { config, pool, auth }),
        }
    }

    /// Get a reference to the application configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the credential verification material.
    #[must_use]
    pub fn auth(&self) -> &AuthKeys {
        &self.inner.auth
    }
}
