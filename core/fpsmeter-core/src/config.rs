//! Configuration loading.
//!
//! Startup parameters only: the sample resource path, sampling period, text
//! template, and opaque theming strings that are passed through to the host
//! untouched. A missing config file yields defaults; a malformed one is a
//! hard error so a typo never silently reverts the meter to defaults.

use crate::error::{MeterError, Result};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default counter resource exposed by the display driver.
pub const DEFAULT_SAMPLE_PATH: &str = "/sys/class/drm/sde-crtc-0/measured_fps";

pub const DEFAULT_PERIOD_MS: u64 = 1000;

/// `{fps}` is replaced with the current sample value.
pub const DEFAULT_TEXT_TEMPLATE: &str = "{fps} fps";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct MeterConfig {
    pub sample_path: PathBuf,
    pub period_ms: u64,
    pub text_template: String,
    pub theme: ThemeConfig,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            sample_path: PathBuf::from(DEFAULT_SAMPLE_PATH),
            period_ms: DEFAULT_PERIOD_MS,
            text_template: DEFAULT_TEXT_TEMPLATE.to_string(),
            theme: ThemeConfig::default(),
        }
    }
}

/// Visual theming, treated as opaque by the core and forwarded to the host
/// through the overlay descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ThemeConfig {
    pub text_color: String,
    pub background_color: String,
    pub text_size_px: u32,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            text_color: "#FFFFFF".to_string(),
            background_color: "#80000000".to_string(),
            text_size_px: 14,
        }
    }
}

/// Returns the fpsmeter directory (~/.fpsmeter).
pub fn config_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".fpsmeter"))
        .ok_or(MeterError::HomeDirNotFound)
}

/// Returns the default configuration file path (~/.fpsmeter/config.json).
pub fn default_config_path() -> Result<PathBuf> {
    config_dir().map(|dir| dir.join("config.json"))
}

/// Loads configuration from `path`, returning defaults if the file does not
/// exist.
pub fn load_config(path: &Path) -> Result<MeterConfig> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(MeterConfig::default())
        }
        Err(err) => {
            return Err(MeterError::Io {
                context: format!("reading config {}", path.display()),
                source: err,
            })
        }
    };

    serde_json::from_str(&raw).map_err(|err| MeterError::ConfigMalformed {
        path: path.to_path_buf(),
        details: err.to_string(),
    })
}
