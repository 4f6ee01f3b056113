use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use anyhow::{anyhow, Result};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub cors_origin: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            database_path: PathBuf::from("recipebox.db"),
            cors_origin: None,
        }
    }
}

impl Config {
    /// Read the server settings from the environment
    pub fn load() -> Result<Self> {
        Ok(Self {
            host: try_load("RECIPEBOX_HOST", "0.0.0.0")?,
            port: try_load("RECIPEBOX_PORT", "5000")?,
            database_path: try_load("RECIPEBOX_DB", "recipebox.db")?,
            cors_origin: var("RECIPEBOX_CORS_ORIGIN").ok(),
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| ())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        anyhow!("environment misconfigured: {key}={raw}: {e}")
    })
}
