//! Application configuration management.
//!
//! This module handles loading and saving the console configuration: the API
//! base URL, the page size for list views and the last used username.
//!
//! Configuration is stored at `~/.config/dumpdesk/config.json`. Environment
//! variables override the file.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::models::DEFAULT_PAGE_SIZE;

/// Application name used for config/data directory paths
pub const APP_NAME: &str = "dumpdesk";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Backend used when nothing is configured
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

/// Env var overriding `api_base_url` for one run
pub const API_URL_ENV: &str = "DUMPDESK_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub last_username: Option<String>,
    /// Set from the environment; never written back to the file.
    #[serde(skip)]
    api_url_override: Option<String>,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            page_size: default_page_size(),
            last_username: None,
            api_url_override: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        self.api_url_override = lookup(API_URL_ENV)
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
    }

    /// Backend to talk to: the env override if set, else the saved URL.
    pub fn api_url(&self) -> &str {
        self.api_url_override
            .as_deref()
            .unwrap_or(&self.api_base_url)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Where the persisted session lives.
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"last_username":"ana"}"#).expect("parse");
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.last_username.as_deref(), Some("ana"));
    }

    #[test]
    fn test_env_overrides_url() {
        let mut config = Config::default();
        config.apply_env(|key| {
            (key == API_URL_ENV).then(|| " https://api.example.com ".to_string())
        });
        assert_eq!(config.api_url(), "https://api.example.com");
    }

    #[test]
    fn test_env_override_is_not_saved() {
        let mut config = Config::default();
        config.apply_env(|_| Some("https://staging.example.com".to_string()));
        config.last_username = Some("ana".to_string());

        let saved = serde_json::to_value(&config).expect("serialize");
        assert_eq!(saved["api_base_url"], DEFAULT_API_BASE_URL);
        assert!(saved.get("api_url_override").is_none());

        let reloaded: Config = serde_json::from_value(saved).expect("parse");
        assert_eq!(reloaded.api_url(), DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_blank_env_ignored() {
        let mut config = Config::default();
        config.apply_env(|_| Some("   ".to_string()));
        assert_eq!(config.api_url(), DEFAULT_API_BASE_URL);
    }
}
