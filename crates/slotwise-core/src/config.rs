//! TOML-based engine configuration.
//!
//! Stores the defaults the engine falls back on when a request carries
//! no explicit preferences:
//! - Work-hour window
//! - Number of suggestions to keep
//! - Horizon length for callers that derive one from "now"
//! - Per-participant gateway fetch timeout
//!
//! Configuration is stored at `~/.config/slotwise/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Engine configuration.
///
/// Serialized to/from TOML at `~/.config/slotwise/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_work_start")]
    pub work_start_hour: u32,
    #[serde(default = "default_work_end")]
    pub work_end_hour: u32,
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    #[serde(default = "default_horizon_days")]
    pub horizon_days: i64,
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

// Default functions
fn default_work_start() -> u32 {
    9
}
fn default_work_end() -> u32 {
    17
}
fn default_max_suggestions() -> usize {
    3
}
fn default_horizon_days() -> i64 {
    7
}
fn default_fetch_timeout() -> u64 {
    10
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            work_start_hour: default_work_start(),
            work_end_hour: default_work_end(),
            max_suggestions: default_max_suggestions(),
            horizon_days: default_horizon_days(),
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

impl EngineConfig {
    /// Load from the default location; missing file means defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = config_path()?;
        self.save_to(&path)
    }

    /// Save to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let text = toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(path, text).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Returns `~/.config/slotwise[-dev]/` based on SLOTWISE_ENV.
///
/// Set SLOTWISE_ENV=dev to use the development data directory.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("SLOTWISE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("slotwise-dev")
    } else {
        base_dir.join("slotwise")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::SaveFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(data_dir()?.join("config.toml"))
}
