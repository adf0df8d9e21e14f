//! Race course marks and start line

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::{LAYLINE_LENGTH, TACK_ANGLE};
use crate::draw::{self, Color, Shape};
use crate::geometry::project_bearing;

/// Closing approach lines to a point, for the current wind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Laylines {
    pub origin: DVec2,
    /// Bearing of the port layline, pointing away from the mark (downwind side)
    pub port_bearing: f64,
    /// Bearing of the starboard layline, pointing away from the mark (downwind side)
    pub starboard_bearing: f64,
}

impl Laylines {
    /// Laylines through `origin` for a wind from `wind_direction`
    pub fn new(origin: DVec2, wind_direction: f64) -> Self {
        Self {
            origin,
            port_bearing: wind_direction - TACK_ANGLE + 180.0,
            starboard_bearing: wind_direction + TACK_ANGLE + 180.0,
        }
    }

    /// Far end of the port layline
    pub fn port_end(&self, length: f64) -> DVec2 {
        project_bearing(self.origin, self.port_bearing, length)
    }

    /// Far end of the starboard layline
    pub fn starboard_end(&self, length: f64) -> DVec2 {
        project_bearing(self.origin, self.starboard_bearing, length)
    }

    pub fn shapes(&self) -> [Shape; 2] {
        [
            Shape::line(self.origin, self.port_end(LAYLINE_LENGTH), 2.0, Color::Red),
            Shape::line(self.origin, self.starboard_end(LAYLINE_LENGTH), 2.0, Color::Green),
        ]
    }
}

/// Line from `origin` showing where the wind blows to
fn wind_indicator(origin: DVec2, wind_direction: f64) -> Shape {
    Shape::ray(origin, wind_direction + 180.0, LAYLINE_LENGTH, 1.0, Color::BlueViolet)
}

/// Windward mark under the current wind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceCourse {
    mark: DVec2,
    wind_direction: f64,
    show_laylines: bool,
    show_wind_direction: bool,
}

impl RaceCourse {
    /// `wind_direction` is where the wind blows from, 0 = from straight up
    pub fn new(mark: DVec2, wind_direction: f64) -> Self {
        Self {
            mark,
            wind_direction,
            show_laylines: true,
            show_wind_direction: true,
        }
    }

    pub fn set_wind_direction(&mut self, direction: f64) {
        self.wind_direction = direction;
    }

    pub fn mark(&self) -> DVec2 {
        self.mark
    }

    pub fn wind_direction(&self) -> f64 {
        self.wind_direction
    }

    pub fn laylines(&self) -> Laylines {
        Laylines::new(self.mark, self.wind_direction)
    }

    pub fn distance_to_mark(&self, position: DVec2) -> f64 {
        position.distance(self.mark)
    }

    pub fn toggle_laylines(&mut self) {
        self.show_laylines = !self.show_laylines;
    }

    pub fn toggle_wind_direction(&mut self) {
        self.show_wind_direction = !self.show_wind_direction;
    }

    pub fn shapes(&self) -> Vec<Shape> {
        let mut shapes = draw::flag(self.mark);
        if self.show_laylines {
            shapes.extend(self.laylines().shapes());
        }
        if self.show_wind_direction {
            shapes.push(wind_indicator(self.mark, self.wind_direction));
        }
        shapes
    }
}

/// Start line between the committee boat and the pin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartingBox {
    boat_end: DVec2,
    pin_end: DVec2,
    wind_direction: f64,
    show_laylines: bool,
    show_wind_direction: bool,
}

impl StartingBox {
    pub fn new(boat_end: DVec2, pin_end: DVec2, wind_direction: f64) -> Self {
        Self {
            boat_end,
            pin_end,
            wind_direction,
            show_laylines: true,
            show_wind_direction: true,
        }
    }

    pub fn set_wind_direction(&mut self, direction: f64) {
        self.wind_direction = direction;
    }

    pub fn boat_end(&self) -> DVec2 {
        self.boat_end
    }

    pub fn pin_end(&self) -> DVec2 {
        self.pin_end
    }

    pub fn midpoint(&self) -> DVec2 {
        (self.boat_end + self.pin_end) / 2.0
    }

    /// Laylines at the boat end and the pin end
    pub fn laylines(&self) -> [Laylines; 2] {
        [
            Laylines::new(self.boat_end, self.wind_direction),
            Laylines::new(self.pin_end, self.wind_direction),
        ]
    }

    pub fn toggle_laylines(&mut self) {
        self.show_laylines = !self.show_laylines;
    }

    pub fn toggle_wind_direction(&mut self) {
        self.show_wind_direction = !self.show_wind_direction;
    }

    pub fn shapes(&self) -> Vec<Shape> {
        let mut shapes = draw::flag(self.pin_end);
        shapes.push(Shape::Circle {
            center: self.boat_end,
            radius: 10.0,
            color: Color::DarkBlue,
        });

        if self.show_laylines {
            for laylines in self.laylines() {
                shapes.extend(laylines.shapes());
            }
            shapes.push(Shape::line(self.pin_end, self.boat_end, 2.0, Color::Blue));
        }
        if self.show_wind_direction {
            shapes.push(wind_indicator(self.midpoint(), self.wind_direction));
        }
        shapes
    }
}
