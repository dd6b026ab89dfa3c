//! Layout configuration.
//!
//! Design constants for widget geometry: minimum sizes, the resize handle,
//! and the per-preset default table. Every field can be overridden from a
//! JSON file; missing fields keep their defaults.

use crate::layout::{LayoutPreset, PositionState, SizeState};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {message}")]
    Io { path: String, message: String },
    #[error("Invalid config: {0}")]
    Parse(String),
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Default geometry for one layout preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetDefaults {
    pub width: i32,
    pub height: i32,
    pub left_margin: i32,
    pub top_margin: i32,
    /// Height of the whole widget area under this preset.
    pub area_height: i32,
}

impl PresetDefaults {
    pub const fn new(width: i32, height: i32, left_margin: i32, top_margin: i32, area_height: i32) -> Self {
        Self {
            width,
            height,
            left_margin,
            top_margin,
            area_height,
        }
    }

    pub fn size(&self) -> SizeState {
        SizeState::new(self.width, self.height)
    }

    pub fn position(&self) -> PositionState {
        PositionState::new(self.left_margin, self.top_margin)
    }
}

/// One row of defaults per preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetTable {
    pub top: PresetDefaults,
    pub middle: PresetDefaults,
    pub bottom: PresetDefaults,
}

impl Default for PresetTable {
    fn default() -> Self {
        Self {
            top: PresetDefaults::new(320, 520, 10, 10, 580),
            middle: PresetDefaults::new(280, 440, 20, 10, 500),
            bottom: PresetDefaults::new(260, 400, 30, 10, 460),
        }
    }
}

impl PresetTable {
    /// Defaults for a preset.
    pub fn get(&self, preset: LayoutPreset) -> &PresetDefaults {
        match preset {
            LayoutPreset::Top => &self.top,
            LayoutPreset::Middle => &self.middle,
            LayoutPreset::Bottom => &self.bottom,
        }
    }
}

/// Geometry constants for the widget area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Smallest width a resize may produce.
    pub min_width: i32,
    /// Smallest height a resize may produce.
    pub min_height: i32,
    /// Side length of the square resize handle in the bottom-right corner.
    pub handle_size: i32,
    /// Width of the widget area until the platform reports its real width.
    pub area_width: i32,
    pub presets: PresetTable,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_width: 150,
            min_height: 100,
            handle_size: 60,
            area_width: 1080,
            presets: PresetTable::default(),
        }
    }
}

impl LayoutConfig {
    /// Parse a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&json)
    }

    /// Reject values no layout could satisfy.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_width < 0 || self.min_height < 0 {
            return Err(ConfigError::Invalid("minimum sizes must not be negative".to_string()));
        }
        if self.handle_size <= 0 {
            return Err(ConfigError::Invalid("handleSize must be positive".to_string()));
        }
        if self.area_width < 0 {
            return Err(ConfigError::Invalid("areaWidth must not be negative".to_string()));
        }
        for preset in LayoutPreset::ALL {
            let row = self.presets.get(preset);
            if row.width < self.min_width || row.height < self.min_height {
                return Err(ConfigError::Invalid(format!(
                    "{} preset size is below the minimum size",
                    preset.name()
                )));
            }
            if row.left_margin < 0 || row.top_margin < 0 || row.area_height < 0 {
                return Err(ConfigError::Invalid(format!(
                    "{} preset has a negative margin or area height",
                    preset.name()
                )));
            }
        }
        Ok(())
    }
}
