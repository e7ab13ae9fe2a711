use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{Result, anyhow};

use crate::loader::{DEFAULT_DEMO_TIMEOUT, DEFAULT_LIVE_TIMEOUT};
use crate::model::{Coordinate, FeedMode};

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const API_URL_ENV: &str = "VYN_API_URL";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub api_url: Option<String>,
    pub dark_mode: Option<bool>,
    pub default_mode: Option<String>,
    pub share_location: Option<bool>,
    pub location: Option<Coordinate>,
    pub demo_timeout_secs: Option<u64>,
    pub live_timeout_secs: Option<u64>,
    pub reacquire_location: Option<bool>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            dark_mode: Some(true),
            default_mode: Some(FeedMode::Demo.as_str().to_string()),
            ..Default::default()
        }
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, config_content)?;
        Ok(())
    }

    /// Env var first, then the config file, then the local default.
    pub fn api_url(&self) -> String {
        std::env::var(API_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    pub fn feed_mode(&self) -> FeedMode {
        self.default_mode
            .as_deref()
            .and_then(FeedMode::from_str)
            .unwrap_or_default()
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode.unwrap_or(true)
    }

    pub fn share_location(&self) -> bool {
        self.share_location.unwrap_or(true)
    }

    pub fn demo_timeout(&self) -> Duration {
        self.demo_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_DEMO_TIMEOUT)
    }

    pub fn live_timeout(&self) -> Duration {
        self.live_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_LIVE_TIMEOUT)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("vyn").join("config.json"))
    }
}
