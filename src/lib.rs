//! Windward - upwind sailboat racing against a shifting wind
//!
//! Core modules:
//! - `sim`: Deterministic simulation (boat, wind, course, race and replay sessions)
//! - `geometry`: Point rotation and geographic-to-screen projection
//! - `datasource`: Recorded navigation telemetry ingestion
//! - `draw`: Drawing primitives handed to an external renderer
//! - `settings`: Data-driven session configuration

pub mod datasource;
pub mod draw;
pub mod error;
pub mod geometry;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use settings::Settings;

/// Simulation constants
pub mod consts {
    /// Closest angle to the true wind a boat can sail (degrees)
    pub const TACK_ANGLE: f64 = 45.0;

    /// Distance a boat covers per simulation tick
    pub const BOAT_STEP: f64 = 1.0;

    /// Internal clock step of the oscillating wind, per query
    pub const WIND_CLOCK_STEP: f64 = 0.05;
    /// Cursor step through recorded wind directions, per query
    pub const REPLAY_WIND_STEP: f64 = 0.05;

    /// Projection tile size (pixels at zoom 1)
    pub const TILE_SIZE: f64 = 512.0;
    /// Fixed horizontal origin offset of the projection
    pub const SCREEN_X_ORIGIN: f64 = 100.0;
    /// Clamp for sin(latitude), keeps the poles finite
    pub const MAX_SIN_LAT: f64 = 0.9999;
    /// Default zoom, roughly pixels-per-nautical-mile × 60
    pub const DEFAULT_ZOOM: f64 = 5500.0;

    /// Window dimensions
    pub const WINDOW_WIDTH: f64 = 1024.0;
    pub const WINDOW_HEIGHT: f64 = 768.0;
    /// Distance kept between the lowest replay point and the window edge
    pub const TRACK_MARGIN: f64 = 50.0;

    /// Minimum distance moved before a new trail point is emitted
    pub const TRACK_PLOT_THRESHOLD: f64 = 5.0;
    /// Start line length, centred on the boat's starting position
    pub const START_LINE_LENGTH: f64 = 200.0;
    /// Length of drawn laylines and wind indicators
    pub const LAYLINE_LENGTH: f64 = 1000.0;

    /// Running ticks required between two tacks (500ms at the default delay)
    pub const TACK_COOLDOWN_TICKS: u64 = 10;
    /// Default delay between ticks
    pub const DEFAULT_FRAME_DELAY_MS: u64 = 50;
    /// Delay change per speed-up/slow-down request
    pub const FRAME_DELAY_STEP_MS: u64 = 10;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    let normalized = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if normalized >= 360.0 { 0.0 } else { normalized }
}
