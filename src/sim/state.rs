//! Session phase and frame pacing shared by live races and replays

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_FRAME_DELAY_MS, FRAME_DELAY_STEP_MS};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RacePhase {
    /// Waiting for the start signal
    #[default]
    NotStarted,
    /// Ticking
    Running,
    /// Frozen until unpaused
    Paused,
    /// Race over, ticks are no-ops
    Finished,
}

impl RacePhase {
    pub fn is_running(&self) -> bool {
        *self == RacePhase::Running
    }

    pub fn is_finished(&self) -> bool {
        *self == RacePhase::Finished
    }

    /// Phase after a start/pause key press
    pub fn toggled(self) -> Self {
        match self {
            RacePhase::NotStarted => RacePhase::Running,
            RacePhase::Running => RacePhase::Paused,
            RacePhase::Paused => RacePhase::Running,
            RacePhase::Finished => RacePhase::Finished,
        }
    }
}

/// Delay the driver waits between ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramePacer {
    delay_ms: u64,
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_DELAY_MS)
    }
}

impl FramePacer {
    pub fn new(delay_ms: u64) -> Self {
        Self { delay_ms }
    }

    /// Shorter delay, never below zero
    pub fn increase_speed(&mut self) {
        self.delay_ms = self.delay_ms.saturating_sub(FRAME_DELAY_STEP_MS);
    }

    pub fn decrease_speed(&mut self) {
        self.delay_ms += FRAME_DELAY_STEP_MS;
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_toggle() {
        assert_eq!(RacePhase::NotStarted.toggled(), RacePhase::Running);
        assert_eq!(RacePhase::Running.toggled(), RacePhase::Paused);
        assert_eq!(RacePhase::Paused.toggled(), RacePhase::Running);
        assert_eq!(RacePhase::Finished.toggled(), RacePhase::Finished);
    }

    #[test]
    fn test_pacer_floors_at_zero() {
        let mut pacer = FramePacer::new(25);
        pacer.increase_speed();
        assert_eq!(pacer.delay(), Duration::from_millis(15));
        pacer.increase_speed();
        pacer.increase_speed();
        assert_eq!(pacer.delay(), Duration::ZERO);
        pacer.decrease_speed();
        assert_eq!(pacer.delay(), Duration::from_millis(10));
        assert_eq!(FramePacer::default().delay(), Duration::from_millis(50));
    }
}
