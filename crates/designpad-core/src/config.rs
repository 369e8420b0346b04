//! Editor configuration.

use crate::history::MAX_UNDO_HISTORY;
use crate::shapes::SerializableColor;
use crate::snap::GRID_SIZE;
use crate::storage::DEFAULT_AUTOSAVE_INTERVAL_SECS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default freehand smoothing (1.0 = curves pass through segment midpoints).
pub const DEFAULT_SMOOTHING: f64 = 1.0;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {message}")]
    Io { path: String, message: String },
    #[error("Failed to parse config: {0}")]
    Parse(String),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Settings for an editing session. Every field has a default, so a config
/// file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub grid_pitch: f64,
    pub snap_to_grid: bool,
    pub history_limit: usize,
    pub autosave_interval_secs: u64,
    /// Freehand smoothing factor in `[0, 1]`. Rendering only.
    pub smoothing: f64,
    pub default_stroke_color: SerializableColor,
    pub default_stroke_width: f64,
    pub default_fill_color: SerializableColor,
    /// WebSocket URL of the remote design store.
    pub remote_url: Option<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_pitch: GRID_SIZE,
            snap_to_grid: false,
            history_limit: MAX_UNDO_HISTORY,
            autosave_interval_secs: DEFAULT_AUTOSAVE_INTERVAL_SECS,
            smoothing: DEFAULT_SMOOTHING,
            default_stroke_color: SerializableColor::black(),
            default_stroke_width: 2.0,
            default_fill_color: SerializableColor::new(74, 144, 217, 255),
            remote_url: None,
        }
    }
}

impl EditorConfig {
    /// Parse a config from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&json)
    }

    /// Load a config file, falling back to defaults when it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Default config file location.
    ///
    /// On Unix: `~/.config/designpad/config.json`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("designpad").join("config.json"))
    }

    /// Check the values an editing session cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.grid_pitch > 0.0) {
            return Err(ConfigError::Invalid(format!("grid_pitch must be positive, got {}", self.grid_pitch)));
        }
        if self.history_limit == 0 {
            return Err(ConfigError::Invalid("history_limit must be at least 1".to_string()));
        }
        if self.autosave_interval_secs == 0 {
            return Err(ConfigError::Invalid("autosave_interval_secs must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.smoothing) {
            return Err(ConfigError::Invalid(format!("smoothing must be within [0, 1], got {}", self.smoothing)));
        }
        if !(self.default_stroke_width > 0.0) {
            return Err(ConfigError::Invalid("default_stroke_width must be positive".to_string()));
        }
        Ok(())
    }
}
