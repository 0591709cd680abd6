//! Runtime configuration read from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `CPN_DATA_DIR` | `~/Documents/CPN Tracker` |
//! | `CPN_BIND_ADDR` | `127.0.0.1:3000` |
//! | `CPN_ALLOWED_ORIGIN` | `http://localhost:8080` |

use anyhow::{anyhow, Context, Result};
use axum::http::HeaderValue;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DATA_DIR_VAR: &str = "CPN_DATA_DIR";
pub const BIND_ADDR_VAR: &str = "CPN_BIND_ADDR";
pub const ALLOWED_ORIGIN_VAR: &str = "CPN_ALLOWED_ORIGIN";

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:8080";
pub const DATA_DIR_NAME: &str = "CPN Tracker";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_directory: PathBuf,
    pub bind_address: SocketAddr,
    pub allowed_origin: HeaderValue,
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, treating blank values as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let data_directory = match get(DATA_DIR_VAR) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_directory()?,
        };

        let bind_address = get(BIND_ADDR_VAR)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_address: SocketAddr = bind_address
            .parse()
            .with_context(|| format!("Invalid {}: {}", BIND_ADDR_VAR, bind_address))?;

        let allowed_origin = get(ALLOWED_ORIGIN_VAR)
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string());
        let allowed_origin = HeaderValue::from_str(&allowed_origin)
            .with_context(|| format!("Invalid {}: {}", ALLOWED_ORIGIN_VAR, allowed_origin))?;

        Ok(Self {
            data_directory,
            bind_address,
            allowed_origin,
        })
    }
}

/// `<Documents>/CPN Tracker`, falling back to `$HOME/Documents` when the
/// platform has no documents directory
pub fn default_data_directory() -> Result<PathBuf> {
    let documents_dir = match dirs::document_dir() {
        Some(dir) => dir,
        None => dirs::home_dir()
            .map(|home| home.join("Documents"))
            .ok_or_else(|| anyhow!("Could not determine home directory"))?,
    };
    Ok(documents_dir.join(DATA_DIR_NAME))
}
