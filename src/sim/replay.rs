//! Replay of recorded telemetry over the race model
//!
//! The whole recording is rotated around the mark so that its median true
//! wind blows from straight up, then shifted so the mark sits centred
//! horizontally and the lowest track point keeps a margin from the bottom.

use std::time::Duration;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::boat::Boat;
use super::course::RaceCourse;
use super::state::{FramePacer, RacePhase};
use super::track::TrackPlotter;
use crate::consts::TRACK_MARGIN;
use crate::datasource::{NavigationDataPoint, ReplayNavigationData, median_wind_direction};
use crate::draw::Shape;
use crate::error::{Error, Result};
use crate::geometry::{lat_lng_to_screen, rotate_point};
use crate::normalize_degrees;
use crate::settings::Settings;

/// A recorded sample in the wind-aligned frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayPoint {
    /// Sample with course over ground and true wind direction relative to the median wind
    pub data: NavigationDataPoint,
    /// Projected and rotated position, before the screen offset
    pub position: DVec2,
}

/// Plain-data replay status for a text UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayStatus {
    pub sailed_distance: f64,
    pub distance_to_mark: f64,
    /// Compass true wind direction of the current sample
    pub true_wind_direction: f64,
    /// Compass course over ground of the current sample
    pub heading: f64,
    pub finished: bool,
    pub wrong_side: bool,
    pub total_distance: Option<f64>,
}

impl ReplayStatus {
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Sailed distance:  {:.2}", self.sailed_distance),
            format!("Distance to mark: {:.2}", self.distance_to_mark),
            format!("TWD: {:03.0}", self.true_wind_direction),
            format!("HDG: {:03.0}", self.heading),
        ];
        if self.finished {
            lines.push("FINISHED!".to_string());
        }
        if let Some(total) = self.total_distance {
            lines.push(format!("TOTAL DISTANCE: {:.2}", total));
        }
        if self.wrong_side {
            lines.push("Wrong side of the mark!".to_string());
        }
        lines
    }
}

/// Playback session over one loaded recording
#[derive(Debug, Clone)]
pub struct RaceReplay {
    course: RaceCourse,
    boat: Boat,
    track: TrackPlotter,
    points: Vec<ReplayPoint>,
    median_wind: f64,
    offset: DVec2,
    cursor: usize,
    current: Option<usize>,
    phase: RacePhase,
    pacer: FramePacer,
}

impl RaceReplay {
    pub const HELP: [&'static str; 7] = [
        "Press SPACE to start or pause",
        "'q' quits",
        "'r' restarts",
        "'l' toggles laylines",
        "'w' toggles wind",
        "'1' increases speed",
        "'2' decreases speed",
    ];

    /// Load every sample and align the track to the median wind.
    ///
    /// `window` is the screen size, `zoom` the projection zoom.
    pub fn new(
        mark_lat: f64,
        mark_lng: f64,
        window: DVec2,
        zoom: f64,
        data: &ReplayNavigationData,
    ) -> Result<Self> {
        let samples = data.all_points();
        let median_wind = median_wind_direction(&samples).ok_or(Error::NoNavigationData)?;
        log::info!(
            "Replaying {} samples, median wind direction {:.2}",
            samples.len(),
            median_wind
        );

        let mark = lat_lng_to_screen(mark_lat, mark_lng, zoom);
        let points: Vec<ReplayPoint> = samples
            .into_iter()
            .map(|mut data| {
                let projected = lat_lng_to_screen(data.latitude, data.longitude, zoom);
                data.course_over_ground -= median_wind;
                data.true_wind_direction -= median_wind;
                ReplayPoint {
                    data,
                    position: rotate_point(projected, mark, -median_wind),
                }
            })
            .collect();

        let min_y = points
            .iter()
            .map(|p| p.position.y)
            .fold(f64::INFINITY, f64::min);
        let offset = DVec2::new(mark.x - window.x / 2.0, min_y - TRACK_MARGIN);

        let first = &points[0];
        let start = first.position - offset;
        let wind = first.data.true_wind_direction;

        Ok(Self {
            course: RaceCourse::new(mark - offset, wind),
            boat: Boat::new(start, wind),
            track: TrackPlotter::new(start),
            points,
            median_wind,
            offset,
            cursor: 0,
            current: None,
            phase: RacePhase::NotStarted,
            pacer: FramePacer::default(),
        })
    }

    /// Replay laid out and paced from settings
    pub fn from_settings(
        settings: &Settings,
        mark_lat: f64,
        mark_lng: f64,
        data: &ReplayNavigationData,
    ) -> Result<Self> {
        let window = DVec2::new(settings.window_width, settings.window_height);
        let mut replay = Self::new(mark_lat, mark_lng, window, settings.zoom, data)?;
        replay.track = TrackPlotter::with_threshold(replay.boat.position(), settings.track_threshold);
        replay.pacer = FramePacer::new(settings.frame_delay_ms);
        Ok(replay)
    }

    /// Rewind to the first sample and play
    pub fn restart(&mut self) {
        let first = &self.points[0];
        let wind = first.data.true_wind_direction;
        let start = first.position - self.offset;

        self.boat.reset(start, wind);
        self.course.set_wind_direction(wind);
        self.track.clear();
        self.cursor = 0;
        self.current = None;
        self.phase = RacePhase::Running;
        log::debug!("Replay restarted");
    }

    /// Start, pause or resume
    pub fn toggle_pause(&mut self) {
        match self.phase {
            RacePhase::NotStarted => self.restart(),
            phase => self.phase = phase.toggled(),
        }
    }

    /// Show the sample under the cursor and move on
    pub fn tick(&mut self) {
        if !self.phase.is_running() {
            return;
        }

        let index = self.cursor;
        if index + 1 < self.points.len() {
            self.cursor += 1;
        } else {
            self.phase = RacePhase::Finished;
            log::info!("Replay finished after {} samples", self.points.len());
        }
        self.current = Some(index);

        let point = &self.points[index];
        self.boat.set_location(
            point.position - self.offset,
            point.data.course_over_ground,
            point.data.true_wind_direction,
        );
        self.course.set_wind_direction(point.data.true_wind_direction);
        self.track.plot_location(self.boat.position());
    }

    /// Sample shown by the last tick
    pub fn current_point(&self) -> Option<&ReplayPoint> {
        self.current.map(|i| &self.points[i])
    }

    pub fn status(&self) -> ReplayStatus {
        let position = self.boat.position();
        let sailed_distance = self.boat.sailed_distance();
        let distance_to_mark = self.course.distance_to_mark(position);
        let finished = self.phase.is_finished();
        ReplayStatus {
            sailed_distance,
            distance_to_mark,
            true_wind_direction: normalize_degrees(self.course.wind_direction() + self.median_wind),
            heading: normalize_degrees(self.boat.heading() + self.median_wind),
            finished,
            wrong_side: finished && position.x < self.course.mark().x,
            total_distance: finished.then_some(sailed_distance + distance_to_mark),
        }
    }

    pub fn increase_speed(&mut self) {
        self.pacer.increase_speed();
    }

    pub fn decrease_speed(&mut self) {
        self.pacer.decrease_speed();
    }

    pub fn frame_delay(&self) -> Duration {
        self.pacer.delay()
    }

    pub fn toggle_laylines(&mut self) {
        self.boat.toggle_laylines();
        self.course.toggle_laylines();
    }

    pub fn toggle_wind_direction(&mut self) {
        self.course.toggle_wind_direction();
    }

    pub fn phase(&self) -> RacePhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_finished()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn median_wind(&self) -> f64 {
        self.median_wind
    }

    /// Screen offset subtracted from every aligned position
    pub fn offset(&self) -> DVec2 {
        self.offset
    }

    pub fn points(&self) -> &[ReplayPoint] {
        &self.points
    }

    pub fn boat(&self) -> &Boat {
        &self.boat
    }

    pub fn course(&self) -> &RaceCourse {
        &self.course
    }

    pub fn track(&self) -> &TrackPlotter {
        &self.track
    }

    pub fn shapes(&self) -> Vec<Shape> {
        let mut shapes = self.boat.shapes();
        shapes.extend(self.course.shapes());
        shapes.extend(self.track.shapes());
        shapes
    }
}
