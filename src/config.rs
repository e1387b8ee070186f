//! Service configuration loaded from environment variables.
//!
//! - `DATABASE_URL` (required) MongoDB connection string, or `memory://`
//! - `DATABASE_NAME` (default `graphql`)
//! - `JWT_SECRET` (required) token signing secret
//! - `BIND_ADDRESS` (default `127.0.0.1:8000`)
//! - `TOKEN_TTL_HOURS` (default `24`)

use std::env;
use thiserror::Error;

pub const MEMORY_URL: &str = "memory://";

/// Upper bound for `TOKEN_TTL_HOURS`, 100 years.
pub const MAX_TOKEN_TTL_HOURS: i64 = 100 * 365 * 24;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(String),
    #[error("Invalid environment variable {0}: {1}")]
    Invalid(String, String),
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub database_name: String,
    pub jwt_secret: String,
    pub bind_address: String,
    pub token_ttl_hours: i64,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("database_name", &self.database_name)
            .field("jwt_secret", &"[REDACTED]")
            .field("bind_address", &self.bind_address)
            .field("token_ttl_hours", &self.token_ttl_hours)
            .finish()
    }
}

impl Config {
    /// Load configuration from the process environment. `main` loads `.env`
    /// into the environment before calling this.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).ok_or_else(|| ConfigError::Missing(key.to_string()));

        let jwt_secret = required("JWT_SECRET")?;
        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid("JWT_SECRET".into(), "must not be empty".into()));
        }

        let token_ttl_hours = match lookup("TOKEN_TTL_HOURS") {
            Some(raw) => match raw.parse::<i64>() {
                Ok(hours) if hours > 0 && hours <= MAX_TOKEN_TTL_HOURS => hours,
                _ => return Err(ConfigError::Invalid("TOKEN_TTL_HOURS".into(), raw)),
            },
            None => 24,
        };

        Ok(Config {
            database_url: required("DATABASE_URL")?,
            database_name: lookup("DATABASE_NAME").unwrap_or_else(|| "graphql".to_string()),
            jwt_secret,
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| "127.0.0.1:8000".to_string()),
            token_ttl_hours,
        })
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url == MEMORY_URL
    }
}
