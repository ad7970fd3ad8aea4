//! Persistent CLI settings stored as TOML.
//!
//! The file lives in the platform config directory (for example
//! `~/.config/rpt/settings.toml` on Linux). Missing files and missing keys
//! fall back to defaults; command-line flags override whatever is loaded.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rpt_persistence::AutoSaveConfig;
use serde::{Deserialize, Serialize};
use tracing::warn;

const QUALIFIER: &str = "com";
const ORGANIZATION: &str = "ReportStudio";
const APPLICATION: &str = "rpt";

/// All persisted settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Client used when a command takes an optional client id.
    pub default_client: Option<String>,
    pub store: StoreSettings,
    pub autosave: AutoSaveConfig,
}

/// Where configurations and the data source catalog live.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Directory of the file-backed store.
    pub dir: Option<PathBuf>,
    /// JSON file with the known data sources.
    pub catalog: Option<PathBuf>,
}

impl Settings {
    /// Load from the default location.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load from `path`. A missing file gives defaults; an unreadable one
    /// is reported and also gives defaults.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        toml::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "ignoring unreadable settings file");
            Self::default()
        })
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create config directory {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize settings")?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write settings to {}", path.display()))
    }

    /// Default settings file path.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .map(|dirs| dirs.config_dir().join("settings.toml"))
            .unwrap_or_else(|| PathBuf::from("settings.toml"))
    }

    /// Store directory: the configured one, else the platform data directory.
    pub fn store_dir(&self) -> PathBuf {
        self.store.dir.clone().unwrap_or_else(|| {
            directories::ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
                .map(|dirs| dirs.data_dir().join("store"))
                .unwrap_or_else(|| PathBuf::from("rpt-store"))
        })
    }
}
