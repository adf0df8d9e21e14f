//! Race model: boat, wind, course, track and the two session types
//!
//! `SailRace` sails a boat against a wind model, one boat length per tick.
//! `RaceReplay` walks a recorded track through the same boat and course.
//! Neither reads the clock; the driver owns pacing and input.

pub mod boat;
pub mod course;
pub mod race;
pub mod replay;
pub mod state;
pub mod track;
pub mod wind;

pub use boat::{Boat, TackSide};
pub use course::{Laylines, RaceCourse, StartingBox};
pub use race::{RaceStatus, SailRace};
pub use replay::{RaceReplay, ReplayPoint, ReplayStatus};
pub use state::{FramePacer, RacePhase};
pub use track::TrackPlotter;
pub use wind::{OscillatingWind, ReplayWind, WindModel, wind_model};
