//! Application configuration.
//!
//! Loaded from a TOML file at `<config-dir>/daybook/config.toml` (or the
//! path in `DAYBOOK_CONFIG`). Sync is optional: a config without a
//! `[sync]` table runs the journal purely locally.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{DaybookError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Local journal document settings.
    pub journal: JournalConfig,

    /// Remote sync settings; absent means sync is not configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync: Option<SyncSettings>,
}

/// Where the journal document lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalConfig {
    /// Path of the markdown document.
    pub path: PathBuf,
}

/// Remote file-store endpoint and schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Base URL of the remote store (e.g. "https://dav.example.com/remote.php/dav/files/me").
    pub server_url: String,
    /// Basic-auth username.
    pub username: String,
    /// Basic-auth password or app token.
    pub password: String,
    /// Remote document path relative to the base URL (e.g. "daybook/daybook.md").
    pub remote_path: String,
    /// Seconds between automatic sync cycles.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_interval_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        let default_path = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("daybook")
            .join("daybook.md");

        Self {
            journal: JournalConfig { path: default_path },
            sync: None,
        }
    }
}

impl Config {
    /// The config file path: `DAYBOOK_CONFIG` if set, otherwise
    /// `<config-dir>/daybook/config.toml`.
    pub fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("DAYBOOK_CONFIG") {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("daybook").join("config.toml"))
    }

    /// Load config from the default location, or return defaults if no
    /// file exists.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Config::default()),
        }
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| DaybookError::Config(format!("read {}: {}", path.display(), e)))?;
        toml::from_str(&contents)
            .map_err(|e| DaybookError::Config(format!("parse {}: {}", path.display(), e)))
    }

    /// Save config to the default location.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| DaybookError::Config("could not determine config directory".into()))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| DaybookError::Config(format!("create {}: {}", parent.display(), e)))?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| DaybookError::Config(format!("serialize config: {}", e)))?;
        fs::write(&path, contents)
            .map_err(|e| DaybookError::Config(format!("write {}: {}", path.display(), e)))
    }
}
