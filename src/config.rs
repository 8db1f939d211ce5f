//! Runtime configuration
//!
//! Loaded from `$HOME/.padwatch/config.toml`, or from the file named by
//! `PADWATCH_CONFIG`. Every key is optional; a missing or broken file falls
//! back to the built-in defaults so the tool always starts.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::controller::axis_normalizer::DEADZONE_THRESHOLD;
use crate::device::led::{Rgb, DEFAULT_LED_MARKER};

const CONFIG_DIR: &str = ".padwatch";
const CONFIG_FILE: &str = "config.toml";
pub const CONFIG_ENV: &str = "PADWATCH_CONFIG";
pub const DEFAULT_DEVICE_NODE: &str = "/dev/input/js0";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Joystick device node to read events from
    pub device_node: PathBuf,
    /// Half-width of the square rest region for sticks and d-pad
    pub deadzone: u16,
    pub led: LedConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device_node: PathBuf::from(DEFAULT_DEVICE_NODE),
            deadzone: DEADZONE_THRESHOLD,
            led: LedConfig::default(),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LedConfig {
    pub enabled: bool,
    pub color: Rgb,
    /// Substring identifying the RGB LED under the device's `leds/` directory
    pub marker: String,
}

impl Default for LedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            color: Rgb::new(100, 100, 100),
            marker: DEFAULT_LED_MARKER.to_string(),
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn default_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return PathBuf::from(path);
        }

        let mut path = dirs::home_dir().unwrap_or_else(|| {
            warn!("Could not determine home directory, using current directory");
            PathBuf::from(".")
        });
        path.push(CONFIG_DIR);
        path.push(CONFIG_FILE);
        path
    }

    // Never fails: problems are logged and defaults are used instead
    pub fn load_or_default() -> Self {
        let path = Self::default_path();
        Self::load_or_default_from(&path)
    }

    pub fn load_or_default_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No config file at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load(path) {
            Ok(config) => {
                debug!("Loaded config from {}: {:?}", path.display(), config);
                config
            }
            Err(e) => {
                warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }
}
