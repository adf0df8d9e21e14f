//! Drawing primitives
//!
//! Entities describe what they look like as a list of shapes; turning
//! shapes into pixels is left to whoever owns the window.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::geometry::project_bearing;

/// Named palette used by the simulation entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    /// Boat hull
    DarkBlue,
    /// Starboard laylines
    Green,
    /// Port laylines
    Red,
    /// Mark flag
    OrangeRed,
    /// Wind indicator and sailed track
    BlueViolet,
    /// Starting line
    Blue,
}

impl Color {
    /// RGBA in 0..1
    pub fn rgba(&self) -> [f32; 4] {
        match self {
            Color::DarkBlue => [0.0, 0.0, 0.545, 1.0],
            Color::Green => [0.0, 0.502, 0.0, 1.0],
            Color::Red => [1.0, 0.0, 0.0, 1.0],
            Color::OrangeRed => [1.0, 0.271, 0.0, 1.0],
            Color::BlueViolet => [0.541, 0.169, 0.886, 1.0],
            Color::Blue => [0.0, 0.0, 1.0, 1.0],
        }
    }
}

/// A single drawing primitive in screen space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Line {
        from: DVec2,
        to: DVec2,
        width: f64,
        color: Color,
    },
    Circle {
        center: DVec2,
        radius: f64,
        color: Color,
    },
    /// Unconnected dots (used for sparse trails)
    Points {
        points: Vec<DVec2>,
        radius: f64,
        color: Color,
    },
}

impl Shape {
    pub fn line(from: DVec2, to: DVec2, width: f64, color: Color) -> Self {
        Shape::Line {
            from,
            to,
            width,
            color,
        }
    }

    /// Line of `length` from `origin` along `bearing`
    pub fn ray(origin: DVec2, bearing: f64, length: f64, width: f64, color: Color) -> Self {
        Shape::line(origin, project_bearing(origin, bearing, length), width, color)
    }

    pub fn color(&self) -> Color {
        match self {
            Shape::Line { color, .. } | Shape::Circle { color, .. } | Shape::Points { color, .. } => {
                *color
            }
        }
    }
}

/// Pennant flag planted at `base`
pub fn flag(base: DVec2) -> Vec<Shape> {
    let mid = base + DVec2::new(0.0, 10.0);
    let top = base + DVec2::new(0.0, 20.0);
    let tip = base + DVec2::new(10.0, 15.0);
    vec![
        Shape::line(base, top, 2.0, Color::OrangeRed),
        Shape::line(mid, tip, 2.0, Color::OrangeRed),
        Shape::line(top, tip, 2.0, Color::OrangeRed),
        Shape::Circle {
            center: base,
            radius: 2.0,
            color: Color::OrangeRed,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_points_along_bearing() {
        let Shape::Line { from, to, .. } = Shape::ray(DVec2::ZERO, 90.0, 10.0, 1.0, Color::Red) else {
            panic!("expected a line");
        };
        assert_eq!(from, DVec2::ZERO);
        assert!((to - DVec2::new(10.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn test_flag_is_anchored_at_base() {
        let shapes = flag(DVec2::new(3.0, 4.0));
        assert_eq!(shapes.len(), 4);
        assert!(shapes.iter().all(|s| s.color() == Color::OrangeRed));
        assert!(matches!(shapes[3], Shape::Circle { center, .. } if center == DVec2::new(3.0, 4.0)));
    }
}
