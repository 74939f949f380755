//! Application configuration.
//!
//! A touch device is described by a [`DeviceConfig`]: the capabilities the
//! hardware reports (slot count, protocol, axis ranges) together with the
//! tracking policy the engine applies on top of them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{TouchslotError, TouchslotResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Touch device description and tracking policy.
    #[serde(default)]
    pub device: DeviceConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Multi-touch reporting convention used by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MtProtocol {
    /// Anonymous contact list, each contact terminated by `SYN_MT_REPORT`.
    TypeA,
    /// Slot-addressed updates introduced by `ABS_MT_SLOT`.
    #[default]
    TypeB,
}

/// Device capabilities and engine policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Human readable device name.
    #[serde(default)]
    pub name: String,

    /// Maximum number of concurrent contacts.
    pub max_slots: usize,

    /// Reporting convention of the raw event stream.
    #[serde(default)]
    pub protocol: MtProtocol,

    /// Pass driver-supplied tracking ids through instead of minting new ones.
    #[serde(default)]
    pub keep_tracking_ids: bool,

    /// Re-match anonymous contacts against active slots by distance.
    #[serde(default)]
    pub track: bool,

    /// Release slots that were not refreshed during a frame.
    #[serde(default)]
    pub autorelease: bool,

    /// Echo the first active contact as legacy single-touch events.
    #[serde(default)]
    pub st_compat: bool,

    /// Direct-touch device (touchscreen). Suppresses finger-count keys.
    #[serde(default)]
    pub direct: bool,

    /// Absolute axis ranges, keyed by evdev axis name.
    #[serde(default)]
    pub axes: Vec<AxisConfig>,
}

/// Range metadata for one absolute axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisConfig {
    /// Axis name, e.g. `ABS_MT_POSITION_X`.
    pub name: String,
    pub min: i32,
    pub max: i32,
    /// Units per millimetre; 0 when unknown.
    #[serde(default)]
    pub resolution: i32,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "touchslot_mt=trace,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: "generic touchpad".to_string(),
            max_slots: 10,
            protocol: MtProtocol::TypeB,
            keep_tracking_ids: false,
            track: false,
            autorelease: false,
            st_compat: true,
            direct: false,
            axes: vec![
                AxisConfig::new("ABS_MT_POSITION_X", 0, 4095),
                AxisConfig::new("ABS_MT_POSITION_Y", 0, 4095),
                AxisConfig::new("ABS_MT_PRESSURE", 0, 255),
                AxisConfig::new("ABS_MT_TOUCH_MAJOR", 0, 255),
            ],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AxisConfig {
    pub fn new(name: impl Into<String>, min: i32, max: i32) -> Self {
        Self {
            name: name.into(),
            min,
            max,
            resolution: 0,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &Path) -> TouchslotResult<Self> {
        if !path.exists() {
            return Err(TouchslotError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("touchslot").join("config.json")
}
