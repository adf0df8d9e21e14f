//! Screen-space geometry
//!
//! Angles are degrees, 0 = up, increasing clockwise. The screen frame is
//! y-up, so a heading of 0 moves towards +y and a heading of 90 towards +x.

use glam::DVec2;
use std::f64::consts::PI;

use crate::consts::{MAX_SIN_LAT, SCREEN_X_ORIGIN, TILE_SIZE};

/// Rotate `point` clockwise by `degrees` around `origin`
#[inline]
pub fn rotate_point(point: DVec2, origin: DVec2, degrees: f64) -> DVec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let d = point - origin;
    origin + DVec2::new(d.x * cos + d.y * sin, -d.x * sin + d.y * cos)
}

/// Point `length` units away from `origin` along a compass `bearing`
#[inline]
pub fn project_bearing(origin: DVec2, bearing: f64, length: f64) -> DVec2 {
    rotate_point(origin + DVec2::new(0.0, length), origin, bearing)
}

/// Project latitude/longitude (degrees) to screen space.
///
/// Web Mercator scaled by `TILE_SIZE * zoom`, y-up. One degree of
/// longitude is `zoom * TILE_SIZE / 360` pixels, so a zoom of
/// pixels-per-nautical-mile × 60 keeps one nautical mile at the
/// requested pixel size near the equator.
pub fn lat_lng_to_screen(latitude: f64, longitude: f64, zoom: f64) -> DVec2 {
    let scale = TILE_SIZE * zoom;
    let x = (longitude + 180.0) / 360.0 * scale + SCREEN_X_ORIGIN;

    let sin_lat = latitude
        .to_radians()
        .sin()
        .clamp(-MAX_SIN_LAT, MAX_SIN_LAT);
    let y = (0.5 + ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / (4.0 * PI)) * scale;

    DVec2::new(x, y)
}
