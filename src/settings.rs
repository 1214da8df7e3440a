//! Game settings and preferences
//!
//! Supplied by the host page as JSON (canvas `data-settings` attribute on the
//! web, a file path natively). Nothing is persisted between sessions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::HUD_SAMPLE_INTERVAL;
use crate::tuning::Tuning;

/// Base scroll speed chosen in the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpeedPreset {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl SpeedPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedPreset::Slow => "Slow",
            SpeedPreset::Normal => "Normal",
            SpeedPreset::Fast => "Fast",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "slow" => Some(SpeedPreset::Slow),
            "normal" | "med" | "medium" => Some(SpeedPreset::Normal),
            "fast" => Some(SpeedPreset::Fast),
            _ => None,
        }
    }

    /// World units scrolled per tick at level 1
    pub fn base_speed(&self) -> f32 {
        match self {
            SpeedPreset::Slow => 4.0,
            SpeedPreset::Normal => 5.0,
            SpeedPreset::Fast => 6.5,
        }
    }
}

/// Errors raised while reading host configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Malformed JSON or wrong field types
    Parse(serde_json::Error),
    /// A sampled range whose minimum exceeds its maximum
    InvalidRange { field: &'static str, min: f32, max: f32 },
    /// A value below its lower bound (non-positive gap or width, negative margin)
    OutOfBounds { field: &'static str, value: f32 },
    /// A mode configured with no lives at all
    ZeroLives,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "invalid settings JSON: {e}"),
            ConfigError::InvalidRange { field, min, max } => {
                write!(f, "invalid range for {field}: {min} > {max}")
            }
            ConfigError::OutOfBounds { field, value } => {
                write!(f, "{field} out of bounds: {value}")
            }
            ConfigError::ZeroLives => write!(f, "every mode needs at least one life"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Initial speed preference (the menu can change it)
    pub speed: SpeedPreset,

    // === Visuals ===
    /// Draw the chart grid behind the candles
    pub show_grid: bool,
    /// Scale the playfield down on narrow viewports
    pub responsive_scale: bool,

    // === HUD ===
    /// Ticks between coarse progress pushes to the host UI
    pub hud_interval: u64,

    /// Balance overrides
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed: SpeedPreset::Normal,
            show_grid: true,
            responsive_scale: true,
            hud_interval: HUD_SAMPLE_INTERVAL,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Parse settings JSON; unknown fields are ignored, missing ones defaulted
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.tuning = settings.tuning.validate()?;
        if settings.hud_interval == 0 {
            settings.hud_interval = HUD_SAMPLE_INTERVAL;
        }
        Ok(settings)
    }

    /// Parse settings, logging and falling back to defaults on error
    pub fn from_json_or_default(json: Option<&str>) -> Self {
        match json {
            Some(json) => match Self::from_json(json) {
                Ok(settings) => {
                    log::info!("Loaded settings (speed: {})", settings.speed.as_str());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring settings: {e}");
                    Self::default()
                }
            },
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }
}
