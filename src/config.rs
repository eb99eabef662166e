//! Client configuration.

use crate::drag::{DEFAULT_ACTIVATION_DISTANCE, PointerTracker};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file name within the config directory.
const CONFIG_FILE: &str = "config.yaml";

/// Environment variable overriding the API URL.
pub const API_URL_ENV: &str = "LANES_API_URL";

/// Default remote store location.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Settings for the board client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the remote store's API
    pub api_url: String,

    /// Pointer travel in pixels before a press becomes a drag
    pub activation_distance: f64,

    /// Per-request timeout; unset means the transport's own behavior
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            activation_distance: DEFAULT_ACTIVATION_DISTANCE,
            request_timeout_secs: None,
        }
    }
}

impl Config {
    /// Default location: `<config dir>/lanes/config.yaml`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lanes")
            .join(CONFIG_FILE)
    }

    /// Load from `path` if it exists, otherwise defaults; then apply the
    /// environment override.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let raw = fs::read_to_string(path).context("Failed to read config file")?;
            serde_yaml::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var(API_URL_ENV)
            && !url.is_empty()
        {
            config.api_url = url;
        }

        Ok(config)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Pointer tracker using the configured activation distance.
    pub fn pointer_tracker(&self) -> PointerTracker {
        PointerTracker::new(self.activation_distance)
    }
}
