//! Configuration management for flashlog.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::RECORD_SIZE;
use crate::region::{DeviceGeometry, Geometry};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "flashlog";

/// Default flash image file name.
const IMAGE_FILE_NAME: &str = "flash.img";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `FLASHLOG_`)
/// 2. TOML config file at `~/.config/flashlog/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Program flash geometry.
    pub geometry: GeometryConfig,
    /// Flash medium configuration.
    pub medium: MediumConfig,
    /// Record log configuration.
    pub log: LogConfig,
}

/// Program flash geometry. The log lives in the last page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Size of one erasable page in bytes.
    pub page_size: u32,
    /// Number of pages in the program area.
    pub page_count: u32,
}

/// Flash medium configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediumConfig {
    /// Path to the flash image file.
    /// Defaults to `~/.local/share/flashlog/flash.img`
    pub image_path: Option<PathBuf>,
    /// Number of readiness polls the simulated medium stays busy per write.
    pub write_latency_polls: u32,
}

/// Record log configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Erase the region every time the log is opened.
    pub erase_on_open: bool,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            page_size: 4096,
            page_count: 128,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("FLASHLOG_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the geometry cannot host the log.
    pub fn validate(&self) -> Result<()> {
        self.device_geometry()
            .map_err(|e| Error::ConfigValidation {
                message: e.to_string(),
            })?;

        if self.geometry.page_size < RECORD_SIZE {
            return Err(Error::ConfigValidation {
                message: format!(
                    "page_size ({}) must hold at least one {RECORD_SIZE}-byte record",
                    self.geometry.page_size
                ),
            });
        }

        Ok(())
    }

    /// Build the device geometry described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the geometry is invalid.
    pub fn device_geometry(&self) -> Result<DeviceGeometry> {
        DeviceGeometry::new(self.geometry.page_size, self.geometry.page_count)
    }

    /// Base address and size of the log region.
    ///
    /// # Errors
    ///
    /// Returns an error if the geometry is invalid.
    pub fn region_bounds(&self) -> Result<(u32, u32)> {
        Ok(self.device_geometry()?.region_base_and_size())
    }

    /// Get the flash image path, resolving defaults if not set.
    #[must_use]
    pub fn image_path(&self) -> PathBuf {
        self.medium
            .image_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(IMAGE_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.geometry.page_size, 4096);
        assert_eq!(config.geometry.page_count, 128);
        assert!(config.medium.image_path.is_none());
        assert_eq!(config.medium.write_latency_polls, 0);
        assert!(!config.log.erase_on_open);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_page_count() {
        let mut config = Config::default();
        config.geometry.page_count = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("page count"));
    }

    #[test]
    fn test_validate_unaligned_page_size() {
        let mut config = Config::default();
        config.geometry.page_size = 4095;

        assert!(matches!(
            config.validate(),
            Err(Error::ConfigValidation { .. })
        ));
    }

    #[test]
    fn test_validate_page_too_small_for_record() {
        let mut config = Config::default();
        config.geometry.page_size = 128;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("page_size"));
    }

    #[test]
    fn test_region_bounds() {
        let config = Config::default();
        assert_eq!(config.region_bounds().unwrap(), (0x7F000, 4096));
    }

    #[test]
    fn test_region_bounds_small_device() {
        let mut config = Config::default();
        config.geometry.page_size = 1024;
        config.geometry.page_count = 256;
        assert_eq!(config.region_bounds().unwrap(), (0x3FC00, 1024));
    }

    #[test]
    fn test_image_path_default() {
        let config = Config::default();
        let path = config.image_path();

        assert!(path.to_string_lossy().contains("flash.img"));
        assert!(path.to_string_lossy().contains("flashlog"));
    }

    #[test]
    fn test_image_path_custom() {
        let mut config = Config::default();
        config.medium.image_path = Some(PathBuf::from("/custom/nrf.img"));

        assert_eq!(config.image_path(), PathBuf::from("/custom/nrf.img"));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("flashlog"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(result.is_ok());
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[geometry]\npage_size = 1024\npage_count = 256\n\n[log]\nerase_on_open = true\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path)).unwrap();
        assert_eq!(config.geometry.page_size, 1024);
        assert_eq!(config.geometry.page_count, 256);
        assert!(config.log.erase_on_open);
        assert_eq!(config.medium, MediumConfig::default());
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[geometry]\npage_size = 100\n").unwrap();

        assert!(Config::load_from(Some(path)).is_err());
    }

    #[test]
    fn test_geometry_config_deserialize() {
        let json = r#"{"page_size": 2048}"#;
        let geometry: GeometryConfig = serde_json::from_str(json).unwrap();
        assert_eq!(geometry.page_size, 2048);
        assert_eq!(geometry.page_count, 128);
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("page_size"));
        assert!(json.contains("erase_on_open"));
    }
}
