// src/config/mod.rs
//
// Session tuning and server connection settings.
//
// Server settings come from the environment first, then from
// {CONFIG_DIR}/mediasession/config.json. The crate never writes credentials.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

pub const SERVER_URL_ENV: &str = "MEDIASESSION_SERVER_URL";
pub const API_KEY_ENV: &str = "MEDIASESSION_API_KEY";

/// Knobs the session controller reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Assets requested per page
    pub page_size: u32,
    /// Safety cap on assets fetched per episode
    pub max_assets_to_fetch: u64,
    /// Back-stack depth
    pub history_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            page_size: 1000,
            max_assets_to_fetch: 10_000,
            history_limit: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub server_url: String,
    pub api_key: String,
    #[serde(default)]
    pub session: SessionConfig,
}

impl ServerConfig {
    /// Default config file location
    pub fn default_path() -> AppResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AppError::Config("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("mediasession").join("config.json"))
    }

    /// Environment first, then the default config file
    pub fn load() -> AppResult<Self> {
        let url = std::env::var(SERVER_URL_ENV).ok();
        let key = std::env::var(API_KEY_ENV).ok();

        if let (Some(server_url), Some(api_key)) = (url, key) {
            let config = Self {
                server_url,
                api_key,
                session: SessionConfig::default(),
            };
            config.validate()?;
            return Ok(config);
        }

        Self::from_file(&Self::default_path()?)
    }

    pub fn from_file(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Err(AppError::Config(format!(
                "No config at {} and {}/{} not set",
                path.display(),
                SERVER_URL_ENV,
                API_KEY_ENV
            )));
        }
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> AppResult<()> {
        if self.server_url.trim().is_empty() {
            return Err(AppError::Config("server_url is empty".to_string()));
        }
        if self.api_key.trim().is_empty() {
            return Err(AppError::Config("api_key is empty".to_string()));
        }
        if self.session.page_size == 0 {
            return Err(AppError::Config("page_size must be positive".to_string()));
        }
        Ok(())
    }

    /// Server URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.server_url.trim_end_matches('/')
    }
}
