//! Runtime configuration read from the environment.
//!
//! | Variable              | Default                                  |
//! |-----------------------|------------------------------------------|
//! | `LEDGER_DATABASE_URL` | `sqlite://<data dir>/ledger-backend/ledger.db` |
//! | `LEDGER_BIND_ADDR`    | `127.0.0.1:3000`                         |
//! | `LEDGER_CORS_ORIGIN`  | `http://localhost:8080`                  |

use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

pub const DATABASE_URL_VAR: &str = "LEDGER_DATABASE_URL";
pub const BIND_ADDR_VAR: &str = "LEDGER_BIND_ADDR";
pub const CORS_ORIGIN_VAR: &str = "LEDGER_CORS_ORIGIN";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:8080";
const APP_DIR_NAME: &str = "ledger-backend";
const DATABASE_FILE_NAME: &str = "ledger.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("LEDGER_BIND_ADDR must be a socket address like 127.0.0.1:3000, got '{0}'")]
    InvalidBindAddr(String),
    #[error("LEDGER_CORS_ORIGIN is not a valid origin: '{0}'")]
    InvalidCorsOrigin(String),
    #[error("No platform data directory found; set LEDGER_DATABASE_URL")]
    NoDataDirectory,
}

#[derive(Debug, Clone)]
pub struct LedgerConfig {
    pub database_url: String,
    /// Set when the database lives in the default location, so its directory can be created
    pub database_path: Option<PathBuf>,
    pub bind_addr: SocketAddr,
    pub cors_origin: HeaderValue,
}

impl LedgerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let (database_url, database_path) = match read(DATABASE_URL_VAR) {
            Some(url) => (url, None),
            None => {
                let path = default_database_path()?;
                (format!("sqlite://{}", path.display()), Some(path))
            }
        };

        let bind_addr = read(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBindAddr(bind_addr.clone()))?;

        let cors_origin = read(CORS_ORIGIN_VAR).unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string());
        let cors_origin = HeaderValue::from_str(&cors_origin)
            .map_err(|_| ConfigError::InvalidCorsOrigin(cors_origin.clone()))?;

        Ok(Self {
            database_url,
            database_path,
            bind_addr,
            cors_origin,
        })
    }
}

fn default_database_path() -> Result<PathBuf, ConfigError> {
    let data_dir = dirs::data_dir().ok_or(ConfigError::NoDataDirectory)?;
    Ok(data_dir.join(APP_DIR_NAME).join(DATABASE_FILE_NAME))
}
