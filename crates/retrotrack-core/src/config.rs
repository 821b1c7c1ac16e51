use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::RetrotrackError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Plugin configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginConfig {
    pub retroarch: RetroarchConfig,
    pub tracking: TrackingConfig,
}

/// Where to reach RetroArch's network command interface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetroarchConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Register unrecognized games automatically.
    pub auto_add: bool,
    /// Seconds between status polls. The stop-detection budgets in
    /// [`crate::process`] are sized against this cadence.
    pub poll_interval: u64,
}

impl PluginConfig {
    /// Load config: user file (if exists) merged over built-in defaults.
    pub fn load() -> Result<Self, RetrotrackError> {
        let defaults: PluginConfig =
            toml::from_str(DEFAULT_CONFIG).map_err(|e| RetrotrackError::Config(e.to_string()))?;

        let user_path = Self::config_path();
        if user_path.exists() {
            let user_str = std::fs::read_to_string(&user_path)
                .map_err(|e| RetrotrackError::Config(e.to_string()))?;
            let user: PluginConfig =
                toml::from_str(&user_str).map_err(|e| RetrotrackError::Config(e.to_string()))?;
            Ok(user)
        } else {
            Ok(defaults)
        }
    }

    /// Save current config to the user config file.
    pub fn save(&self) -> Result<(), RetrotrackError> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| RetrotrackError::Config(e.to_string()))?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Path to the tracking database file.
    pub fn db_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.data_dir().join("retrotrack.db"))
            .unwrap_or_else(|| PathBuf::from("retrotrack.db"))
    }

    /// Ensure the data directory exists and return the DB path.
    pub fn ensure_db_path() -> Result<PathBuf, RetrotrackError> {
        let path = Self::db_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(path)
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "retrotrack")
    }
}

impl Default for PluginConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = PluginConfig::default();
        assert_eq!(config.retroarch.host, "localhost");
        assert_eq!(config.retroarch.port, 55355);
        assert!(!config.tracking.auto_add);
        assert_eq!(config.tracking.poll_interval, 5);
    }

    #[test]
    fn test_roundtrip() {
        let config = PluginConfig::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: PluginConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.retroarch.port, config.retroarch.port);
    }
}
