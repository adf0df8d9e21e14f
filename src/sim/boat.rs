//! Boat kinematics and tacking

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::{BOAT_STEP, LAYLINE_LENGTH, TACK_ANGLE};
use crate::draw::{Color, Shape};
use crate::geometry::rotate_point;

/// Side the wind comes over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TackSide {
    /// Heading left of the wind (`wind - TACK_ANGLE`)
    Starboard,
    /// Heading right of the wind (`wind + TACK_ANGLE`)
    Port,
}

impl TackSide {
    /// Heading offset from the wind direction
    pub fn offset(&self) -> f64 {
        match self {
            TackSide::Starboard => -TACK_ANGLE,
            TackSide::Port => TACK_ANGLE,
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            TackSide::Starboard => TackSide::Port,
            TackSide::Port => TackSide::Starboard,
        }
    }

    /// Side implied by a heading relative to the wind
    pub fn from_heading(heading: f64, wind_direction: f64) -> Self {
        if heading < wind_direction {
            TackSide::Starboard
        } else {
            TackSide::Port
        }
    }
}

/// A boat sailing upwind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boat {
    position: DVec2,
    heading: f64,
    wind_direction: f64,
    sailed_distance: f64,
    tack_side: TackSide,
    show_laylines: bool,
}

impl Boat {
    /// New boat on starboard tack, close-hauled
    pub fn new(position: DVec2, wind_direction: f64) -> Self {
        let tack_side = TackSide::Starboard;
        Self {
            position,
            heading: wind_direction + tack_side.offset(),
            wind_direction,
            sailed_distance: 0.0,
            tack_side,
            show_laylines: true,
        }
    }

    /// Put the boat back on the start, close-hauled on starboard with no
    /// distance sailed. Display toggles are kept.
    pub fn reset(&mut self, position: DVec2, wind_direction: f64) {
        *self = Self {
            show_laylines: self.show_laylines,
            ..Self::new(position, wind_direction)
        };
    }

    /// Follow a wind shift, staying close-hauled on the current tack
    pub fn set_wind_direction(&mut self, direction: f64) {
        self.wind_direction = direction;
        self.heading = direction + self.tack_side.offset();
    }

    /// Turn through the wind onto the other tack
    pub fn tack(&mut self) {
        self.tack_side = self.tack_side.opposite();
        self.heading = self.wind_direction + self.tack_side.offset();
        log::debug!("Tacked onto {:?}, heading {:.1}", self.tack_side, self.heading);
    }

    /// Move one step along the heading
    pub fn advance(&mut self) {
        let ahead = self.position + DVec2::new(0.0, BOAT_STEP);
        let next = rotate_point(ahead, self.position, self.heading);
        self.move_to(next);
    }

    /// Jump to a recorded position (replay)
    pub fn set_location(&mut self, position: DVec2, heading: f64, wind_direction: f64) {
        self.move_to(position);
        self.heading = heading;
        self.wind_direction = wind_direction;
        self.tack_side = TackSide::from_heading(heading, wind_direction);
    }

    fn move_to(&mut self, position: DVec2) {
        self.sailed_distance += self.position.distance(position);
        self.position = position;
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn wind_direction(&self) -> f64 {
        self.wind_direction
    }

    pub fn sailed_distance(&self) -> f64 {
        self.sailed_distance
    }

    pub fn tack_side(&self) -> TackSide {
        self.tack_side
    }

    pub fn toggle_laylines(&mut self) {
        self.show_laylines = !self.show_laylines;
    }

    /// Hull plus the boat's own laylines
    pub fn shapes(&self) -> Vec<Shape> {
        let mut shapes = vec![Shape::Circle {
            center: self.position,
            radius: 10.0,
            color: Color::DarkBlue,
        }];

        if self.show_laylines {
            shapes.push(Shape::ray(
                self.position,
                self.wind_direction - TACK_ANGLE,
                LAYLINE_LENGTH,
                2.0,
                Color::Green,
            ));
            shapes.push(Shape::ray(
                self.position,
                self.wind_direction + TACK_ANGLE,
                LAYLINE_LENGTH,
                2.0,
                Color::Red,
            ));
        }

        shapes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_tack_invariant(boat: &Boat) {
        let offset = boat.heading() - boat.wind_direction();
        assert!((offset.abs() - TACK_ANGLE).abs() < 1e-9, "offset {offset}");
        assert_eq!(boat.tack_side().offset().signum(), offset.signum());
    }

    #[test]
    fn test_new_boat_starts_on_starboard() {
        let boat = Boat::new(DVec2::new(10.0, 20.0), 30.0);
        assert_eq!(boat.heading(), -15.0);
        assert_eq!(boat.tack_side(), TackSide::Starboard);
        assert_eq!(boat.sailed_distance(), 0.0);
        assert_tack_invariant(&boat);
    }

    #[test]
    fn test_wind_shift_keeps_tack() {
        let mut boat = Boat::new(DVec2::ZERO, 0.0);
        boat.set_wind_direction(10.0);
        assert_eq!(boat.heading(), -35.0);
        assert_tack_invariant(&boat);

        boat.tack();
        boat.set_wind_direction(-20.0);
        assert_eq!(boat.tack_side(), TackSide::Port);
        assert_eq!(boat.heading(), 25.0);
        assert_tack_invariant(&boat);
    }

    #[test]
    fn test_double_tack_restores_heading() {
        let mut boat = Boat::new(DVec2::ZERO, 12.5);
        let before = boat.heading();
        boat.tack();
        assert_eq!(boat.heading(), 57.5);
        assert_tack_invariant(&boat);
        boat.tack();
        assert_eq!(boat.heading(), before);
    }

    #[test]
    fn test_advance_moves_one_unit() {
        let mut boat = Boat::new(DVec2::ZERO, 45.0);
        // Heading 0: straight up
        boat.advance();
        assert!((boat.position() - DVec2::new(0.0, 1.0)).length() < 1e-9);

        let mut boat = Boat::new(DVec2::ZERO, 0.0);
        boat.advance();
        let h = 0.5_f64.sqrt();
        assert!((boat.position() - DVec2::new(-h, h)).length() < 1e-9);
    }

    #[test]
    fn test_sailed_distance_accumulates() {
        let mut boat = Boat::new(DVec2::new(3.0, 4.0), 17.0);
        let mut last = 0.0;
        for _ in 0..100 {
            boat.advance();
            assert!(boat.sailed_distance() > last);
            last = boat.sailed_distance();
        }
        assert!((boat.sailed_distance() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_set_location_accumulates_distance() {
        let mut boat = Boat::new(DVec2::ZERO, 0.0);
        boat.set_location(DVec2::new(3.0, 4.0), 80.0, 30.0);
        boat.set_location(DVec2::new(3.0, 10.0), -20.0, 30.0);
        assert_eq!(boat.sailed_distance(), 11.0);
        assert_eq!(boat.heading(), -20.0);
        assert_eq!(boat.wind_direction(), 30.0);
        assert_eq!(boat.tack_side(), TackSide::Starboard);
    }

    #[test]
    fn test_shapes() {
        let mut boat = Boat::new(DVec2::new(1.0, 2.0), 0.0);
        let shapes = boat.shapes();
        assert_eq!(shapes.len(), 3);
        assert_eq!(shapes[1].color(), Color::Green);
        assert_eq!(shapes[2].color(), Color::Red);

        boat.toggle_laylines();
        assert_eq!(boat.shapes().len(), 1);
    }

    #[test]
    fn test_reset_keeps_display_toggles() {
        let mut boat = Boat::new(DVec2::ZERO, 0.0);
        boat.tack();
        boat.advance();
        boat.toggle_laylines();

        boat.reset(DVec2::new(5.0, 5.0), 20.0);
        assert_eq!(boat.position(), DVec2::new(5.0, 5.0));
        assert_eq!(boat.sailed_distance(), 0.0);
        assert_eq!(boat.tack_side(), TackSide::Starboard);
        assert_eq!(boat.heading(), -25.0);
        assert_eq!(boat.shapes().len(), 1);
    }
}
