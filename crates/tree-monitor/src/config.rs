//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

use database::Database;

/// Tree monitor server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Maximum database pool connections.
    pub pool_size: u32,
    /// Base reward per accepted reading.
    pub tokens_per_reading: u32,
    /// Shared secret for the network server webhook. Loaded but not yet
    /// checked against incoming requests.
    pub webhook_secret: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `DATABASE_URL` | SQLite database URL | `sqlite:tree_monitor.db?mode=rwc` |
    /// | `PORT` | Listen port on all interfaces | `8080` |
    /// | `DATABASE_POOL_SIZE` | Maximum pool connections | `20` |
    /// | `TOKENS_PER_READING` | Base reward per reading | `10` |
    /// | `WEBHOOK_SECRET` | Webhook shared secret | (unset) |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port: u16 = match var("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => 8080,
        };

        let database_url =
            var("DATABASE_URL").unwrap_or_else(|| "sqlite:tree_monitor.db?mode=rwc".to_string());

        let pool_size = match var("DATABASE_POOL_SIZE") {
            Some(raw) => parse_positive(&raw).ok_or(ConfigError::InvalidPoolSize(raw))?,
            None => Database::DEFAULT_POOL_SIZE,
        };

        let tokens_per_reading = match var("TOKENS_PER_READING") {
            Some(raw) => parse_positive(&raw).ok_or(ConfigError::InvalidTokensPerReading(raw))?,
            None => 10,
        };

        let webhook_secret = var("WEBHOOK_SECRET");

        Ok(Self {
            addr: SocketAddr::from(([0, 0, 0, 0], port)),
            database_url,
            pool_size,
            tokens_per_reading,
            webhook_secret,
        })
    }
}

fn parse_positive(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|n| *n > 0)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PORT: {0}")]
    InvalidPort(String),

    #[error("Invalid DATABASE_POOL_SIZE (expected a positive integer): {0}")]
    InvalidPoolSize(String),

    #[error("Invalid TOKENS_PER_READING (expected a positive integer): {0}")]
    InvalidTokensPerReading(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.database_url, "sqlite:tree_monitor.db?mode=rwc");
        assert_eq!(config.pool_size, 20);
        assert_eq!(config.tokens_per_reading, 10);
        assert!(config.webhook_secret.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("PORT", "9000"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("DATABASE_POOL_SIZE", "4"),
            ("TOKENS_PER_READING", "25"),
            ("WEBHOOK_SECRET", "s3cret"),
        ])
        .unwrap();
        assert_eq!(config.addr.port(), 9000);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.pool_size, 4);
        assert_eq!(config.tokens_per_reading, 25);
        assert_eq!(config.webhook_secret.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_empty_values_use_defaults() {
        let config = load(&[("PORT", ""), ("WEBHOOK_SECRET", "  ")]).unwrap();
        assert_eq!(config.addr.port(), 8080);
        assert!(config.webhook_secret.is_none());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("PORT", "http")]),
            Err(ConfigError::InvalidPort(_))
        ));
        assert!(matches!(
            load(&[("TOKENS_PER_READING", "0")]),
            Err(ConfigError::InvalidTokensPerReading(_))
        ));
        assert!(matches!(
            load(&[("TOKENS_PER_READING", "-3")]),
            Err(ConfigError::InvalidTokensPerReading(_))
        ));
        assert!(matches!(
            load(&[("DATABASE_POOL_SIZE", "many")]),
            Err(ConfigError::InvalidPoolSize(_))
        ));
    }
}
