//! Runtime configuration loaded from the environment.
//!
//! A `.env` file in the working directory is honored through `dotenvy` by the
//! binary before [`Config::from_env`] runs.

use std::{env, fmt::Display, net::SocketAddr, str::FromStr};

use thiserror::Error;
use tracing::info;

use crate::selector::SelectionPolicy;

/// Number of creatures in the first-generation catalog.
pub const DEFAULT_CATALOG_SIZE: i32 = 151;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    /// Only send the session cookie over HTTPS.
    pub session_secure: bool,
    pub session_inactivity_hours: i64,
    /// Policy behind `GET /api/next/`.
    pub selection_policy: SelectionPolicy,
    /// Highest external id the sequential selector scans to.
    pub catalog_size: i32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            database_url,
            bind_addr: try_load("BIND_ADDR", "127.0.0.1:3000")?,
            max_connections: try_load("DB_MAX_CONNECTIONS", "10")?,
            session_secure: try_load("SESSION_SECURE", "false")?,
            session_inactivity_hours: try_load("SESSION_INACTIVITY_HOURS", "24")?,
            selection_policy: try_load("SELECTION_POLICY", "random")?,
            catalog_size: try_load("CATALOG_SIZE", &DEFAULT_CATALOG_SIZE.to_string())?,
        })
    }
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}
