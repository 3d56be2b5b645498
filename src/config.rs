use crate::error::{LightningError, Result};
use crate::settings::RunSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_VERSION: u32 = 1;

/// Application configuration for export/import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version field for future compatibility
    pub version: u32,
    pub settings: RunSettings,
}

impl AppConfig {
    /// `<config dir>/lightning-generator/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lightning-generator").join("config.json"))
    }

    /// Export config to a JSON file, creating parent directories
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Import config from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            LightningError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config: AppConfig = serde_json::from_str(&content)?;
        if config.version > CONFIG_VERSION {
            return Err(LightningError::Config(format!(
                "{} was written by a newer version (format {})",
                path.display(),
                config.version
            )));
        }
        Ok(config)
    }

    /// Load the file at the default location, if there is one
    pub fn load_default() -> Result<Option<Self>> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_file(&path).map(Some),
            _ => Ok(None),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            settings: RunSettings::default(),
        }
    }
}
