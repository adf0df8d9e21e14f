//! Wind models
//!
//! Both models are driven by call count, never by wall-clock time, so a
//! session replays identically from the same inputs.

use std::f64::consts::TAU;
use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{REPLAY_WIND_STEP, WIND_CLOCK_STEP};
use crate::datasource::median;
use crate::error::{Error, Result};
use crate::settings::WindSettings;

/// A source of true wind direction, queried once per tick
pub trait WindModel: std::fmt::Debug {
    /// Current wind direction in degrees (not normalized)
    fn wind_direction(&mut self) -> f64;
}

/// Synthetic wind oscillating around a (possibly drifting) baseline
#[derive(Debug, Clone, PartialEq)]
pub struct OscillatingWind {
    base_direction: f64,
    amplitude: f64,
    period: f64,
    shift_rate: f64,
    calls: u64,
}

impl OscillatingWind {
    pub fn new(base_direction: f64, amplitude: f64, period: f64) -> Self {
        Self::with_shift_rate(base_direction, amplitude, period, 0.0)
    }

    /// Oscillation whose baseline drifts by `shift_rate` degrees per query
    pub fn with_shift_rate(base_direction: f64, amplitude: f64, period: f64, shift_rate: f64) -> Self {
        Self {
            base_direction,
            amplitude,
            period,
            shift_rate,
            calls: 0,
        }
    }

    /// Internal clock
    pub fn clock(&self) -> f64 {
        self.calls as f64 * WIND_CLOCK_STEP
    }

    /// Direction the next query will return, without advancing
    pub fn peek(&self) -> f64 {
        let drift = self.calls as f64 * self.shift_rate;
        let shift = if self.period == 0.0 {
            0.0
        } else {
            self.amplitude * (TAU * self.clock() / self.period).sin()
        };
        self.base_direction + drift + shift
    }
}

impl WindModel for OscillatingWind {
    fn wind_direction(&mut self) -> f64 {
        let direction = self.peek();
        self.calls += 1;
        direction
    }
}

/// Recorded wind directions, centred on their median and played in a loop
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayWind {
    directions: Vec<f64>,
    median: f64,
    start: f64,
    steps: u64,
}

impl ReplayWind {
    /// Load one decimal degree value per line from a file
    pub fn from_file<R: Rng>(path: impl AsRef<Path>, rng: &mut R) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let wind = Self::from_text(&text, rng)?;
        log::info!(
            "Loaded {} wind directions from {} (median {:.1})",
            wind.len(),
            path.display(),
            wind.median
        );
        Ok(wind)
    }

    /// Parse one value per line. Blank lines are ignored, invalid ones
    /// are logged and skipped.
    pub fn from_text<R: Rng>(text: &str, rng: &mut R) -> Result<Self> {
        let directions = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| match line.parse::<f64>() {
                Ok(direction) => Some(direction),
                Err(_) => {
                    log::warn!("ignoring invalid wind direction: {}", line);
                    None
                }
            })
            .collect();
        Self::from_directions(directions, rng)
    }

    /// Start at a random point in the series
    pub fn from_directions<R: Rng>(directions: Vec<f64>, rng: &mut R) -> Result<Self> {
        let len = directions.len() as f64;
        let offset = rng.random::<f64>() * len;
        Self::with_offset(directions, offset)
    }

    /// Start at a fixed fractional position in the series
    pub fn with_offset(mut directions: Vec<f64>, offset: f64) -> Result<Self> {
        let median = median(&directions).ok_or(Error::NoWindData)?;
        for direction in &mut directions {
            *direction -= median;
        }
        let mut wind = Self {
            directions,
            median,
            start: offset.max(0.0),
            steps: 0,
        };
        wind.wrap();
        Ok(wind)
    }

    /// Median subtracted from the recorded values
    pub fn median(&self) -> f64 {
        self.median
    }

    /// Median-centred series
    pub fn directions(&self) -> &[f64] {
        &self.directions
    }

    pub fn len(&self) -> usize {
        self.directions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }

    /// Fractional playback position
    pub fn position(&self) -> f64 {
        self.start + self.steps as f64 * REPLAY_WIND_STEP
    }

    fn wrap(&mut self) {
        if self.position() as usize >= self.directions.len() {
            self.start = 0.0;
            self.steps = 0;
        }
    }
}

impl WindModel for ReplayWind {
    fn wind_direction(&mut self) -> f64 {
        let direction = self.directions[self.position() as usize];
        self.steps += 1;
        self.wrap();
        direction
    }
}

/// Wind model described by the settings: recorded directions when a data
/// file is given, otherwise an oscillation
pub fn wind_model(settings: &WindSettings) -> Result<Box<dyn WindModel>> {
    match &settings.data_file {
        Some(path) => {
            let seed = settings.seed.unwrap_or_else(rand::random);
            log::debug!("Wind replay seed: {}", seed);
            let mut rng = Pcg32::seed_from_u64(seed);
            Ok(Box::new(ReplayWind::from_file(path, &mut rng)?))
        }
        None => Ok(Box::new(OscillatingWind::with_shift_rate(
            settings.direction,
            settings.amplitude,
            settings.period,
            settings.shift_rate,
        ))),
    }
}
