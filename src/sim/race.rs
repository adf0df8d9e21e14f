//! Live race: one boat beating upwind to a mark in a shifting wind

use std::time::Duration;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::boat::{Boat, TackSide};
use super::course::{RaceCourse, StartingBox};
use super::state::{FramePacer, RacePhase};
use super::track::TrackPlotter;
use super::wind::WindModel;
use crate::consts::{START_LINE_LENGTH, TACK_ANGLE, TACK_COOLDOWN_TICKS};
use crate::draw::Shape;
use crate::normalize_degrees;
use crate::settings::Settings;

/// Plain-data race status for a text UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceStatus {
    pub sailed_distance: f64,
    pub distance_to_mark: f64,
    pub finished: bool,
    /// Finished left of the mark
    pub wrong_side: bool,
    /// Sailed distance plus what is left to the mark, once finished
    pub total_distance: Option<f64>,
}

impl RaceStatus {
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Sailed distance:  {:.2}", self.sailed_distance),
            format!("Distance to mark: {:.2}", self.distance_to_mark),
        ];
        if self.finished {
            lines.push("FINISHED!".to_string());
            if let Some(total) = self.total_distance {
                lines.push(format!("TOTAL DISTANCE: {:.2}", total));
            }
            if self.wrong_side {
                lines.push("Wrong side of the mark!".to_string());
            }
        }
        lines
    }
}

/// A live race session
#[derive(Debug)]
pub struct SailRace {
    course: RaceCourse,
    start_line: StartingBox,
    boat: Boat,
    wind: Box<dyn WindModel>,
    track: TrackPlotter,
    phase: RacePhase,
    pacer: FramePacer,
    /// Running ticks so far
    time_ticks: u64,
    last_tack_tick: Option<u64>,
    tack_cooldown_ticks: u64,
}

impl SailRace {
    pub const HELP: [&'static str; 8] = [
        "Press SPACE to start or pause",
        "'q' quits",
        "'t' tacks",
        "'r' restarts",
        "'l' toggles laylines",
        "'w' toggles wind",
        "'1' increases speed",
        "'2' decreases speed",
    ];

    /// Race from `boat_start` to `mark`; the wind is sampled once for the
    /// starting direction
    pub fn new(mark: DVec2, boat_start: DVec2, mut wind: Box<dyn WindModel>) -> Self {
        let wind_direction = wind.wind_direction();
        let half_line = DVec2::new(START_LINE_LENGTH / 2.0, 0.0);
        Self {
            course: RaceCourse::new(mark, wind_direction),
            start_line: StartingBox::new(boat_start + half_line, boat_start - half_line, wind_direction),
            boat: Boat::new(boat_start, wind_direction),
            wind,
            track: TrackPlotter::new(boat_start),
            phase: RacePhase::NotStarted,
            pacer: FramePacer::default(),
            time_ticks: 0,
            last_tack_tick: None,
            tack_cooldown_ticks: TACK_COOLDOWN_TICKS,
        }
    }

    /// Race laid out and paced from settings
    pub fn from_settings(settings: &Settings, wind: Box<dyn WindModel>) -> Self {
        let boat_start = settings.boat_location();
        let mut race = Self::new(settings.mark_location(), boat_start, wind);
        race.track = TrackPlotter::with_threshold(boat_start, settings.track_threshold);
        race.pacer = FramePacer::new(settings.frame_delay_ms);
        race.tack_cooldown_ticks = settings.tack_cooldown_ticks;
        race
    }

    pub fn start(&mut self) {
        if self.phase == RacePhase::NotStarted {
            log::debug!("Race started");
            self.phase = RacePhase::Running;
        }
    }

    /// Start, pause or resume
    pub fn toggle_pause(&mut self) {
        self.phase = self.phase.toggled();
        log::debug!("Race phase: {:?}", self.phase);
    }

    /// Advance the race by one tick
    pub fn tick(&mut self) {
        if !self.phase.is_running() {
            return;
        }
        if self.past_mark() {
            self.finish();
            return;
        }

        self.time_ticks += 1;

        // Wind first, so heading and wind agree within the frame
        let wind_direction = self.wind.wind_direction();
        self.boat.set_wind_direction(wind_direction);
        self.boat.advance();
        self.course.set_wind_direction(wind_direction);
        self.start_line.set_wind_direction(wind_direction);
        self.track.plot_location(self.boat.position());

        if self.past_mark() {
            self.finish();
        }
    }

    /// Tack unless the last tack was too recent; returns whether it tacked
    pub fn tack_boat(&mut self) -> bool {
        if !self.phase.is_running() {
            return false;
        }
        let ready = self
            .last_tack_tick
            .is_none_or(|last| self.time_ticks - last >= self.tack_cooldown_ticks);
        if ready {
            self.boat.tack();
            self.last_tack_tick = Some(self.time_ticks);
        }
        ready
    }

    /// Whether the boat has reached the layline for its other tack, so that
    /// tacking now fetches the mark in the current wind
    pub fn on_layline(&self) -> bool {
        let to_mark = self.course.mark() - self.boat.position();
        let bearing = to_mark.x.atan2(to_mark.y).to_degrees();
        let relative = normalize_degrees(bearing - self.boat.wind_direction() + 180.0) - 180.0;
        match self.boat.tack_side() {
            TackSide::Starboard => relative >= TACK_ANGLE,
            TackSide::Port => relative <= -TACK_ANGLE,
        }
    }

    fn past_mark(&self) -> bool {
        self.boat.position().y > self.course.mark().y
    }

    fn finish(&mut self) {
        self.phase = RacePhase::Finished;
        let status = self.status();
        log::info!(
            "Race finished after {} ticks, total distance {:.2}{}",
            self.time_ticks,
            status.total_distance.unwrap_or(status.sailed_distance),
            if status.wrong_side { " (wrong side of the mark)" } else { "" }
        );
    }

    pub fn status(&self) -> RaceStatus {
        let position = self.boat.position();
        let sailed_distance = self.boat.sailed_distance();
        let distance_to_mark = self.course.distance_to_mark(position);
        let finished = self.phase.is_finished();
        RaceStatus {
            sailed_distance,
            distance_to_mark,
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

    /// How long the driver should wait before the next tick
    pub fn frame_delay(&self) -> Duration {
        self.pacer.delay()
    }

    pub fn toggle_laylines(&mut self) {
        self.boat.toggle_laylines();
        self.course.toggle_laylines();
        self.start_line.toggle_laylines();
    }

    pub fn toggle_wind_direction(&mut self) {
        self.course.toggle_wind_direction();
        self.start_line.toggle_wind_direction();
    }

    pub fn phase(&self) -> RacePhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_finished()
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn boat(&self) -> &Boat {
        &self.boat
    }

    pub fn course(&self) -> &RaceCourse {
        &self.course
    }

    pub fn start_line(&self) -> &StartingBox {
        &self.start_line
    }

    pub fn track(&self) -> &TrackPlotter {
        &self.track
    }

    /// Everything to draw this frame
    pub fn shapes(&self) -> Vec<Shape> {
        let mut shapes = self.boat.shapes();
        shapes.extend(self.course.shapes());
        shapes.extend(self.start_line.shapes());
        shapes.extend(self.track.shapes());
        shapes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::course::Laylines;
    use crate::sim::wind::{OscillatingWind, ReplayWind};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn steady_race(mark: DVec2) -> SailRace {
        SailRace::new(mark, DVec2::ZERO, Box::new(OscillatingWind::new(0.0, 0.0, 10.0)))
    }

    fn run_to_finish(race: &mut SailRace, max_ticks: usize) {
        for _ in 0..max_ticks {
            if race.is_finished() {
                return;
            }
            race.tick();
        }
    }

    #[test]
    fn test_tick_before_start_is_noop() {
        let mut race = steady_race(DVec2::new(0.0, 500.0));
        race.tick();
        assert_eq!(race.phase(), RacePhase::NotStarted);
        assert_eq!(race.boat().position(), DVec2::ZERO);
        assert!(!race.tack_boat());
    }

    #[test]
    fn test_finishes_when_passing_mark() {
        let mut race = steady_race(DVec2::new(0.0, 500.0));
        race.start();
        run_to_finish(&mut race, 2000);

        assert!(race.is_finished());
        let y = race.boat().position().y;
        let step = 0.5_f64.sqrt();
        assert!(y > 500.0);
        assert!(y - step <= 500.0, "finished late at y = {y}");
        assert_eq!(race.time_ticks(), 708);

        // Finished is terminal
        let position = race.boat().position();
        race.tick();
        race.toggle_pause();
        race.tick();
        assert_eq!(race.boat().position(), position);
        assert!(race.is_finished());
    }

    #[test]
    fn test_tacking_on_layline_fetches_mark() {
        let mut race = steady_race(DVec2::new(0.0, 500.0));
        race.start();
        assert!(!race.on_layline());

        while !race.on_layline() {
            race.tick();
        }
        // Starboard layline from the mark crosses x = -250 at y = 250
        let position = race.boat().position();
        assert!((position.x + 250.0).abs() < 1.0);
        assert!(race.tack_boat());
        assert!(!race.on_layline());

        run_to_finish(&mut race, 2000);
        let status = race.status();
        assert!(race.boat().position().x.abs() < 2.0);
        assert!(status.sailed_distance < 720.0);
    }

    #[test]
    fn test_straight_upwind_finishes_on_first_tick_past_mark() {
        // Wind from 45 puts the starboard heading straight up, 1 unit per tick
        let wind = OscillatingWind::new(45.0, 0.0, 10.0);
        let mut race = SailRace::new(DVec2::new(0.0, 500.0), DVec2::ZERO, Box::new(wind));
        race.start();

        for _ in 0..500 {
            race.tick();
        }
        assert_eq!(race.boat().position(), DVec2::new(0.0, 500.0));
        assert_eq!(race.phase(), RacePhase::Running);

        race.tick();
        assert_eq!(race.time_ticks(), 501);
        assert_eq!(race.boat().position(), DVec2::new(0.0, 501.0));
        assert!(race.is_finished());
        assert_eq!(race.status().sailed_distance, 501.0);
    }

    #[test]
    fn test_score_and_wrong_side() {
        // Starboard tack drifts left of the mark
        let mut race = steady_race(DVec2::new(0.0, 500.0));
        race.start();
        run_to_finish(&mut race, 2000);
        let status = race.status();
        assert!(status.finished);
        assert!(status.wrong_side);
        let total = status.total_distance.unwrap();
        assert!((total - (status.sailed_distance + status.distance_to_mark)).abs() < 1e-9);
        assert!((status.sailed_distance - 708.0).abs() < 1e-6);
        assert!(status.lines().contains(&"Wrong side of the mark!".to_string()));

        // Port tack finishes right of it
        let mut race = steady_race(DVec2::new(0.0, 500.0));
        race.start();
        assert!(race.tack_boat());
        run_to_finish(&mut race, 2000);
        let status = race.status();
        assert!(status.finished);
        assert!(!status.wrong_side);
        assert_eq!(status.lines()[2], "FINISHED!");
    }

    #[test]
    fn test_pause_freezes_race() {
        let mut race = steady_race(DVec2::new(0.0, 500.0));
        race.toggle_pause();
        assert_eq!(race.phase(), RacePhase::Running);
        race.tick();
        let position = race.boat().position();

        race.toggle_pause();
        assert_eq!(race.phase(), RacePhase::Paused);
        race.tick();
        assert_eq!(race.boat().position(), position);
        assert!(!race.tack_boat());

        race.toggle_pause();
        race.tick();
        assert_ne!(race.boat().position(), position);
    }

    #[test]
    fn test_tack_is_debounced() {
        let mut race = steady_race(DVec2::new(0.0, 500.0));
        race.start();
        assert!(race.tack_boat());
        assert!(!race.tack_boat());
        for _ in 0..TACK_COOLDOWN_TICKS - 1 {
            race.tick();
        }
        assert!(!race.tack_boat());
        race.tick();
        assert!(race.tack_boat());
    }

    #[test]
    fn test_boat_and_course_share_wind() {
        let wind = OscillatingWind::with_shift_rate(0.0, 10.0, 10.0, 0.1);
        let mut race = SailRace::new(DVec2::new(0.0, 500.0), DVec2::ZERO, Box::new(wind));
        race.start();
        for _ in 0..37 {
            race.tick();
            let boat = race.boat();
            assert_eq!(boat.wind_direction(), race.course().wind_direction());
            assert!(((boat.heading() - boat.wind_direction()).abs() - 45.0).abs() < 1e-9);
        }
        // Moved 37 units, trail sampled every 6
        assert!((race.boat().sailed_distance() - 37.0).abs() < 1e-9);
        assert_eq!(race.track().len(), 6);
    }

    #[test]
    fn test_replay_wind_is_deterministic() {
        let directions = vec![350.0, 355.0, 0.0, 5.0, 10.0, 2.0, 357.0];
        let make = || {
            let mut rng = Pcg32::seed_from_u64(2024);
            let wind = ReplayWind::from_directions(directions.clone(), &mut rng).unwrap();
            let mut race = SailRace::new(DVec2::new(0.0, 300.0), DVec2::ZERO, Box::new(wind));
            race.start();
            race
        };
        let mut a = make();
        let mut b = make();
        for i in 0..200 {
            if i % 40 == 0 {
                a.tack_boat();
                b.tack_boat();
            }
            a.tick();
            b.tick();
        }
        assert_eq!(a.boat().position(), b.boat().position());
        assert_eq!(a.status(), b.status());
    }

    #[test]
    fn test_speed_control() {
        let mut race = steady_race(DVec2::new(0.0, 500.0));
        assert_eq!(race.frame_delay(), Duration::from_millis(50));
        for _ in 0..10 {
            race.increase_speed();
        }
        assert_eq!(race.frame_delay(), Duration::ZERO);
        race.decrease_speed();
        assert_eq!(race.frame_delay(), Duration::from_millis(10));
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings {
            frame_delay_ms: 20,
            tack_cooldown_ticks: 0,
            ..Settings::default()
        };
        let mut race = SailRace::from_settings(&settings, Box::new(OscillatingWind::new(0.0, 0.0, 10.0)));
        assert_eq!(race.course().mark(), settings.mark_location());
        assert_eq!(race.boat().position(), settings.boat_location());
        assert_eq!(race.frame_delay(), Duration::from_millis(20));
        race.start();
        assert!(race.tack_boat());
        assert!(race.tack_boat());
    }

    #[test]
    fn test_shapes_cover_all_entities() {
        let mut race = steady_race(DVec2::new(0.0, 500.0));
        race.start();
        for _ in 0..10 {
            race.tick();
        }
        // boat 3 + course 7 + start line 11 + track 1
        assert_eq!(race.shapes().len(), 22);
        race.toggle_laylines();
        race.toggle_wind_direction();
        assert_eq!(race.shapes().len(), 1 + 4 + 5 + 1);
    }

    #[test]
    fn test_start_line_follows_wind() {
        let wind = OscillatingWind::new(0.0, 10.0, 10.0);
        let mut race = SailRace::new(DVec2::new(0.0, 500.0), DVec2::new(50.0, 0.0), Box::new(wind));
        assert_eq!(race.start_line().midpoint(), DVec2::new(50.0, 0.0));
        assert_eq!(race.start_line().boat_end(), DVec2::new(150.0, 0.0));
        assert_eq!(race.start_line().pin_end(), DVec2::new(-50.0, 0.0));

        race.start();
        for _ in 0..20 {
            race.tick();
        }
        let [boat_end, _] = race.start_line().laylines();
        let expected = Laylines::new(boat_end.origin, race.course().wind_direction());
        assert_eq!(boat_end, expected);
    }
}
