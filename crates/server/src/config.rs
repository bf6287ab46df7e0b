//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Secret used to sign session tokens.
    pub token_secret: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `COACH_ADDR` | Server bind address | `127.0.0.1:3000` |
    /// | `DATABASE_URL` | SQLite database URL | `sqlite:coach.db?mode=rwc` |
    /// | `COACH_TOKEN_SECRET` | Session-token signing secret | (required) |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("COACH_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:coach.db?mode=rwc".to_string());

        let token_secret =
            env::var("COACH_TOKEN_SECRET").map_err(|_| ConfigError::MissingTokenSecret)?;

        Ok(Self {
            addr,
            database_url,
            token_secret,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid COACH_ADDR format")]
    InvalidAddr,

    #[error("COACH_TOKEN_SECRET environment variable is required")]
    MissingTokenSecret,
}
