//! Server configuration read from the environment

use std::env;
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 3000;

/// Default directory for the SQLite database file
pub const DEFAULT_DATA_DIR: &str = "data";

/// Name of the SQLite database file inside the data directory
pub const DATABASE_FILE: &str = "vitaltrack.db";

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be a number between 0 and 65535, got '{0}'")]
    InvalidPort(String),

    #[error("ENABLE_SWAGGER must be true or false, got '{0}'")]
    InvalidFlag(String),
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub data_dir: PathBuf,
    /// Serve Swagger UI at `/api-docs`
    pub enable_swagger: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            enable_swagger: true,
        }
    }
}

impl ServerConfig {
    /// Read `PORT`, `DATA_DIR` and `ENABLE_SWAGGER`, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let data_dir = lookup("DATA_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let enable_swagger = match lookup("ENABLE_SWAGGER") {
            Some(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidFlag(raw))?,
            None => true,
        };

        info!(
            "Server configuration: port={}, data_dir={}, swagger={}",
            port,
            data_dir.display(),
            enable_swagger
        );

        Ok(Self {
            port,
            data_dir,
            enable_swagger,
        })
    }

    /// Location of the SQLite database file
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
