//! Configuration types for the uptime dashboard

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::TimeRange;

/// Environment variable overriding the default backend URL
pub const API_URL_ENV: &str = "UPTIME_API_URL";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Backend connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Where the session token is kept
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_token_dir")]
    pub token_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            token_dir: default_token_dir(),
        }
    }
}

/// Live view behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_chart_poll_interval")]
    pub chart_poll_interval_seconds: u64,
    #[serde(default)]
    pub default_range: TimeRange,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            chart_poll_interval_seconds: default_chart_poll_interval(),
            default_range: TimeRange::default(),
        }
    }
}

impl Config {
    /// Apply the URL override from the environment when the file left the default
    pub fn apply_env(&mut self, env_url: Option<String>) {
        if let Some(url) = env_url.filter(|u| !u.trim().is_empty()) {
            if self.api.base_url == default_base_url() {
                self.api.base_url = url;
            }
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_token_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".uptime-dashboard")
}

fn default_chart_poll_interval() -> u64 {
    60
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::DashboardError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
