//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::DEFAULT_TTL_SECS;
use crate::service::DEFAULT_SKU_MAX_ATTEMPTS;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// sqlx connection string for the product store
    pub database_url: String,
    /// Store connection pool size
    pub db_max_connections: u32,
    /// Seconds to wait for a store connection before failing
    pub db_acquire_timeout: u64,
    /// Redis connection string; the in-process cache is used when absent
    pub redis_url: Option<String>,
    /// Expiry of cached reads in seconds
    pub cache_ttl: u64,
    /// Per-command cache timeout in milliseconds
    pub cache_timeout_ms: u64,
    /// In-process cache sweep interval in seconds
    pub cleanup_interval: u64,
    /// Insert attempts before SKU allocation fails
    pub sku_max_attempts: u32,
}

fn parsed<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `DATABASE_URL` or `DB_URL` - store connection string (default: sqlite://inventory.db)
    /// - `DB_MAX_CONNECTIONS` - store pool size (default: 10)
    /// - `DB_ACQUIRE_TIMEOUT` - seconds to wait for a connection (default: 5)
    /// - `REDIS_URL` - Redis cache; unset selects the in-process cache
    /// - `CACHE_TTL` - cached read expiry in seconds (default: 3600)
    /// - `CACHE_TIMEOUT_MS` - per-command cache timeout (default: 500)
    /// - `CLEANUP_INTERVAL` - in-process cache sweep frequency in seconds (default: 60)
    /// - `SKU_MAX_ATTEMPTS` - SKU insert attempts (default: 5)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parsed("SERVER_PORT", defaults.server_port),
            database_url: env::var("DATABASE_URL")
                .or_else(|_| env::var("DB_URL"))
                .unwrap_or(defaults.database_url),
            db_max_connections: parsed("DB_MAX_CONNECTIONS", defaults.db_max_connections).max(1),
            db_acquire_timeout: parsed("DB_ACQUIRE_TIMEOUT", defaults.db_acquire_timeout),
            redis_url: env::var("REDIS_URL").ok().filter(|v| !v.trim().is_empty()),
            cache_ttl: parsed("CACHE_TTL", defaults.cache_ttl),
            cache_timeout_ms: parsed("CACHE_TIMEOUT_MS", defaults.cache_timeout_ms),
            cleanup_interval: parsed("CLEANUP_INTERVAL", defaults.cleanup_interval).max(1),
            sku_max_attempts: parsed("SKU_MAX_ATTEMPTS", defaults.sku_max_attempts).max(1),
        }
    }

    pub fn db_acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.db_acquire_timeout)
    }

    pub fn cache_timeout(&self) -> Duration {
        Duration::from_millis(self.cache_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            database_url: "sqlite://inventory.db".to_string(),
            db_max_connections: 10,
            db_acquire_timeout: 5,
            redis_url: None,
            cache_ttl: DEFAULT_TTL_SECS,
            cache_timeout_ms: 500,
            cleanup_interval: 60,
            sku_max_attempts: DEFAULT_SKU_MAX_ATTEMPTS,
        }
    }
}
