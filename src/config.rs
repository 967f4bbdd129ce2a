//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

/// Which key-value backend the server runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// A Redis server reached at `redis_url`
    Redis,
    /// The in-process memory backend
    Memory,
}

impl BackendKind {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "redis" => Some(BackendKind::Redis),
            "memory" => Some(BackendKind::Memory),
            _ => None,
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend selection
    pub backend: BackendKind,
    /// Redis connection URL
    pub redis_url: String,
    /// HTTP server port
    pub server_port: u16,
    /// Memory backend purge interval in seconds
    pub cleanup_interval: u64,
    /// Lifetime of a page access counter in seconds
    pub page_count_ttl: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `BACKEND` - `redis` or `memory` (default: redis)
    /// - `REDIS_URL` - Redis connection URL (default: redis://127.0.0.1:6379/)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Memory purge frequency in seconds (default: 1)
    /// - `PAGE_COUNT_TTL` - Page counter window in seconds (default: 10)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            backend: env::var("BACKEND")
                .ok()
                .and_then(|v| BackendKind::parse(&v))
                .unwrap_or(defaults.backend),
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cleanup_interval),
            page_count_ttl: env::var("PAGE_COUNT_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.page_count_ttl),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendKind::Redis,
            redis_url: "redis://127.0.0.1:6379/".to_string(),
            server_port: 3000,
            cleanup_interval: 1,
            page_count_ttl: 10,
        }
    }
}
