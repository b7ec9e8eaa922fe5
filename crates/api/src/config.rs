//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `KIOSK_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `TELEGRAM_BOT_TOKEN` - Bot token; also the source of the credential
//!   verification key
//!
//! ## Optional
//! - `KIOSK_HOST` - Bind address (default: 127.0.0.1)
//! - `KIOSK_PORT` - Listen port (default: 8000)
//! - `TELEGRAM_ADMIN_IDS` - Comma-separated Telegram ids granted admin at
//!   first login (default: empty)
//! - `KIOSK_DEV_AUTH` - Enable the development auth bypass (default: off;
//!   never set in production)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::collections::HashSet;
use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use kiosk_core::TelegramId;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Telegram bot token; the credential verification key is derived from it
    pub bot_token: SecretString,
    /// Telegram ids granted admin status when their user row is created
    pub admin_ids: HashSet<TelegramId>,
    /// Whether the development auth bypass is active
    pub dev_auth_enabled: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("KIOSK_DATABASE_URL")?;
        let host = get_env_or_default("KIOSK_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("KIOSK_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("KIOSK_PORT", "8000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("KIOSK_PORT".to_string(), e.to_string()))?;

        let bot_token = get_required_env("TELEGRAM_BOT_TOKEN")?;
        validate_bot_token(&bot_token, "TELEGRAM_BOT_TOKEN")?;

        let admin_ids = parse_admin_ids(
            &get_env_or_default("TELEGRAM_ADMIN_IDS", ""),
            "TELEGRAM_ADMIN_IDS",
        )?;
        let dev_auth_enabled = parse_flag(&get_env_or_default("KIOSK_DEV_AUTH", "0"));
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            database_url,
            host,
            port,
            bot_token: SecretString::from(bot_token),
            admin_ids,
            dev_auth_enabled,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Expose the bot token for key derivation at startup.
    #[must_use]
    pub fn bot_token(&self) -> &str {
        self.bot_token.expose_secret()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a comma-separated list of Telegram ids.
///
/// Blank entries are skipped; anything non-numeric is a configuration error
/// rather than being silently dropped.
fn parse_admin_ids(value: &str, var_name: &str) -> Result<HashSet<TelegramId>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry.parse::<i64>().map(TelegramId::new).map_err(|_| {
                ConfigError::InvalidEnvVar(
                    var_name.to_string(),
                    format!("'{entry}' is not a valid Telegram id"),
                )
            })
        })
        .collect()
}

/// Validate the bot token shape (`<bot_id>:<secret>`).
fn validate_bot_token(token: &str, var_name: &str) -> Result<(), ConfigError> {
    let valid = match token.split_once(':') {
        Some((bot_id, secret)) => {
            !bot_id.is_empty()
                && bot_id.bytes().all(|b| b.is_ascii_digit())
                && !secret.is_empty()
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "expected '<bot_id>:<secret>' format".to_string(),
        ))
    }
}

/// Parse a boolean-ish flag variable.
fn parse_flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("yes")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_admin_ids_basic() {
        let ids = parse_admin_ids("123, 456,789", "TEST_VAR").unwrap();
        assert_eq!(ids.len(), 3);
        assert!(ids.contains(&TelegramId::new(456)));
    }

    #[test]
    fn test_parse_admin_ids_skips_blanks() {
        let ids = parse_admin_ids(" , 42, ", "TEST_VAR").unwrap();
        assert_eq!(ids.len(), 1);
        assert!(ids.contains(&TelegramId::new(42)));
    }

    #[test]
    fn test_parse_admin_ids_empty() {
        let ids = parse_admin_ids("", "TEST_VAR").unwrap();
        assert!(ids.is_empty());
    }

    #[test]
    fn test_parse_admin_ids_rejects_garbage() {
        let result = parse_admin_ids("123,abc", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_validate_bot_token_accepts_real_shape() {
        assert!(validate_bot_token("7213960:AAH8LkPoWbyqPPjrXAmBpTF6jXWE7wZMfIw", "T").is_ok());
    }

    #[test]
    fn test_validate_bot_token_rejects_missing_colon() {
        assert!(validate_bot_token("no-colon-here", "T").is_err());
    }

    #[test]
    fn test_validate_bot_token_rejects_non_numeric_id() {
        assert!(validate_bot_token("bot:secret", "T").is_err());
        assert!(validate_bot_token(":secret", "T").is_err());
        assert!(validate_bot_token("123:", "T").is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag("true"));
        assert!(parse_flag("YES"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
        assert!(!parse_flag("off"));
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 8000,
            bot_token: SecretString::from("123:abc"),
            admin_ids: HashSet::new(),
            dev_auth_enabled: false,
            sentry_dsn: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 8000);
    }
}
