//! Session settings
//!
//! Loaded from an optional JSON file; every missing field falls back to
//! its default, and the CLI overlays its flags afterwards.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::datasource::ParseMode;
use crate::error::{Error, Result};

/// Wind source configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindSettings {
    /// Starting wind direction (degrees)
    pub direction: f64,
    /// Oscillation amplitude (degrees)
    pub amplitude: f64,
    /// Oscillation period, in clock units
    pub period: f64,
    /// Baseline drift per query (degrees)
    pub shift_rate: f64,
    /// Recorded wind directions to replay instead of oscillating
    pub data_file: Option<PathBuf>,
    /// Seed for the replay start offset; random when unset
    pub seed: Option<u64>,
}

impl Default for WindSettings {
    fn default() -> Self {
        Self {
            direction: 0.0,
            amplitude: 10.0,
            period: 10.0,
            shift_rate: 0.0,
            data_file: None,
            seed: None,
        }
    }
}

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Screen ===
    pub window_width: f64,
    pub window_height: f64,
    /// Projection zoom (pixels-per-nautical-mile × 60)
    pub zoom: f64,

    // === Pacing ===
    /// Delay between ticks
    pub frame_delay_ms: u64,
    /// Running ticks required between tacks
    pub tack_cooldown_ticks: u64,

    // === Track ===
    /// Distance moved before a new trail point is emitted
    pub track_threshold: f64,

    // === Wind ===
    pub wind: WindSettings,

    // === Telemetry ===
    pub parse_mode: ParseMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            zoom: DEFAULT_ZOOM,

            frame_delay_ms: DEFAULT_FRAME_DELAY_MS,
            tack_cooldown_ticks: TACK_COOLDOWN_TICKS,

            track_threshold: TRACK_PLOT_THRESHOLD,

            wind: WindSettings::default(),

            parse_mode: ParseMode::Strict,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Defaults, or the given file when there is one
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                log::info!("Using default settings");
                Ok(Self::default())
            }
        }
    }

    /// Mark position for the live race, near the top of the window
    pub fn mark_location(&self) -> glam::DVec2 {
        glam::DVec2::new(self.window_width / 2.0, self.window_height - TRACK_MARGIN)
    }

    /// Boat start position for the live race, near the bottom of the window
    pub fn boat_location(&self) -> glam::DVec2 {
        glam::DVec2::new(self.window_width / 2.0, 25.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "zoom": 1000.0, "wind": { "amplitude": 5.0 } }"#).unwrap();
        assert_eq!(settings.zoom, 1000.0);
        assert_eq!(settings.wind.amplitude, 5.0);
        assert_eq!(settings.wind.period, 10.0);
        assert_eq!(settings.frame_delay_ms, DEFAULT_FRAME_DELAY_MS);
        assert_eq!(settings.parse_mode, ParseMode::Strict);
    }

    #[test]
    fn test_parse_mode_from_json() {
        let settings = Settings::from_json(r#"{ "parse_mode": "lenient" }"#).unwrap();
        assert_eq!(settings.parse_mode, ParseMode::Lenient);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(Settings::from_json("{ zoom: }"), Err(Error::Settings(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = Settings::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_default_layout() {
        let settings = Settings::default();
        assert_eq!(settings.mark_location(), glam::DVec2::new(512.0, 718.0));
        assert_eq!(settings.boat_location(), glam::DVec2::new(512.0, 25.0));
        assert_eq!(Settings::load_or_default(None).unwrap(), settings);
    }
}
