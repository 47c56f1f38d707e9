//! Configuration management for date-range-picker

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::store::DEFAULT_SLOT_KEY;
use crate::validate::Policy;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Constraints applied ranges must satisfy
    pub policy: Policy,

    /// Where the last selection is remembered
    pub storage: StorageConfig,

    /// Applied payload formatting
    pub output: OutputConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Data directory (default: ~/.local/share/date-range-picker)
    pub data_dir: Option<PathBuf>,
}

/// Selection storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// State file path (default: `<data_dir>/state.json`)
    pub path: Option<PathBuf>,

    /// Slot key the selection is stored under
    pub key: String,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Render applied instants in UTC (`Z` suffix) rather than the local offset
    pub utc: bool,
}

// Default implementations

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            data_dir: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            key: DEFAULT_SLOT_KEY.to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { utc: true }
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::config("Could not determine config directory"))?;
        Ok(config_dir.join(crate::APP_NAME).join("config.toml"))
    }

    /// Get the data directory
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.general.data_dir {
            Ok(dir.clone())
        } else {
            let data_dir = dirs::data_local_dir()
                .ok_or_else(|| Error::config("Could not determine data directory"))?;
            Ok(data_dir.join(crate::APP_NAME))
        }
    }

    /// Get the selection state file path
    pub fn state_path(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.storage.path {
            return Ok(path.clone());
        }
        Ok(self.data_dir()?.join("state.json"))
    }

    /// Validate configuration values.
    ///
    /// Call this after loading to ensure all values are within acceptable ranges.
    pub fn validate(&self) -> Result<()> {
        if self.storage.key.trim().is_empty() {
            return Err(Error::config("storage key must not be empty"));
        }

        // Validate log_level is a known level
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.to_lowercase().as_str()) {
            return Err(Error::config(format!(
                "log_level must be one of {:?}, got '{}'",
                valid_levels, self.general.log_level
            )));
        }

        Ok(())
    }
}
