use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{defaults, envconfig::EnvConfig, validate};

/// Process configuration, read from the environment at startup.
///
/// Keys map one-to-one onto environment variables (`PORT`, `DATABASE_URL`, ...).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_min_idle: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: defaults::DEFAULT_HOST.to_string(),
            port: defaults::DEFAULT_PORT,
            rust_log: defaults::DEFAULT_RUST_LOG.to_string(),
            database_url: None,
            db_max_connections: defaults::DEFAULT_DB_MAX_CONNECTIONS,
            db_min_idle: defaults::DEFAULT_DB_MIN_IDLE,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        <Self as EnvConfig>::from_env()
    }

    /// Connection settings for the storage collaborator.
    ///
    /// Only meaningful after [`validate`](validate::validate) has accepted the
    /// config, which guarantees the URL is present.
    pub fn database(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database_url.clone().unwrap_or_default(),
            max_connections: self.db_max_connections,
            min_idle: self.db_min_idle,
        }
    }
}

impl EnvConfig for AppConfig {
    fn validate(&self) -> Result<()> {
        validate::validate(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_idle: u32,
}
