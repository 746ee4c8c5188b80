//! Configuration Module
//!
//! Loads responder, store and fetcher settings from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Process configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the static responder listens on
    pub server_port: u16,
    /// Base URL the fetcher requests resources from
    pub base_url: String,
    /// Lifetime of entries written by the fetcher
    pub cache_ttl: Duration,
    /// Maximum number of entries the memory store can hold
    pub max_entries: usize,
    /// Interval between expired-entry sweeps
    pub cleanup_interval: Duration,
    /// Upper bound on a single remote request
    pub request_timeout: Duration,
}

const DEFAULT_PORT: u16 = 8080;

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - responder port (default: 8080)
    /// - `BASE_URL` - remote base URL (default: `http://localhost:<SERVER_PORT>`)
    /// - `CACHE_TTL` - entry lifetime in seconds (default: 3600)
    /// - `MAX_ENTRIES` - memory store capacity (default: 1000)
    /// - `CLEANUP_INTERVAL` - sweep frequency in seconds (default: 1)
    /// - `REQUEST_TIMEOUT` - remote request timeout in seconds (default: 5)
    pub fn from_env() -> Self {
        let server_port = env_or("SERVER_PORT", DEFAULT_PORT);
        Self {
            server_port,
            base_url: env::var("BASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| local_base_url(server_port)),
            cache_ttl: Duration::from_secs(env_or("CACHE_TTL", 3600)),
            max_entries: env_or("MAX_ENTRIES", 1000),
            cleanup_interval: Duration::from_secs(env_or("CLEANUP_INTERVAL", 1)),
            request_timeout: Duration::from_secs(env_or("REQUEST_TIMEOUT", 5)),
        }
    }
}

fn local_base_url(port: u16) -> String {
    format!("http://localhost:{}", port)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_PORT,
            base_url: local_base_url(DEFAULT_PORT),
            cache_ttl: Duration::from_secs(3600),
            max_entries: 1000,
            cleanup_interval: Duration::from_secs(1),
            request_timeout: Duration::from_secs(5),
        }
    }
}
