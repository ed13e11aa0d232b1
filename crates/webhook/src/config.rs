//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

/// Webhook server configuration.
///
/// Provider credentials (Twilio, Anthropic, OpenAI, Resend) are read by
/// the respective client crates; this struct only carries what the server
/// itself needs.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Seconds allowed for knowledge lookup + classification.
    pub classify_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `WEBHOOK_ADDR` | Server bind address | `127.0.0.1:8787` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:conserje.db?mode=rwc` |
    /// | `CLASSIFY_TIMEOUT_SECS` | Classification budget | `12` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("WEBHOOK_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8787".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url =
            env::var("SQLITE_PATH").unwrap_or_else(|_| "sqlite:conserje.db?mode=rwc".to_string());

        let classify_timeout_secs = env::var("CLASSIFY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(12);

        Ok(Self {
            addr,
            database_url,
            classify_timeout_secs,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid WEBHOOK_ADDR format")]
    InvalidAddr,
}
