//! Sailed track, sampled sparsely for display
//!
//! Distance-gated: a point is kept only once the boat has moved more than
//! the threshold away from the last kept point.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::TRACK_PLOT_THRESHOLD;
use crate::draw::{Color, Shape};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPlotter {
    threshold: f64,
    last_plotted: Option<DVec2>,
    points: Vec<DVec2>,
}

impl TrackPlotter {
    /// Track starting at `origin` (not itself plotted)
    pub fn new(origin: DVec2) -> Self {
        Self::with_threshold(origin, TRACK_PLOT_THRESHOLD)
    }

    pub fn with_threshold(origin: DVec2, threshold: f64) -> Self {
        Self {
            threshold,
            last_plotted: Some(origin),
            points: Vec::new(),
        }
    }

    /// Offer the boat's current position; returns whether it was kept
    pub fn plot_location(&mut self, position: DVec2) -> bool {
        let far_enough = self
            .last_plotted
            .is_none_or(|last| last.distance(position) > self.threshold);
        if far_enough {
            self.points.push(position);
            self.last_plotted = Some(position);
        }
        far_enough
    }

    /// Forget the trail; the next plotted position is kept unconditionally
    pub fn clear(&mut self) {
        self.points.clear();
        self.last_plotted = None;
    }

    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn shapes(&self) -> Vec<Shape> {
        if self.points.is_empty() {
            return Vec::new();
        }
        vec![Shape::Points {
            points: self.points.clone(),
            radius: 1.0,
            color: Color::BlueViolet,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plots_only_after_threshold() {
        let mut track = TrackPlotter::new(DVec2::ZERO);
        assert!(!track.plot_location(DVec2::new(0.0, 3.0)));
        assert!(!track.plot_location(DVec2::new(0.0, 5.0)));
        assert!(track.plot_location(DVec2::new(0.0, 5.5)));
        assert!(!track.plot_location(DVec2::new(0.0, 10.0)));
        assert!(track.plot_location(DVec2::new(0.0, 11.0)));
        assert_eq!(track.points(), &[DVec2::new(0.0, 5.5), DVec2::new(0.0, 11.0)]);
    }

    #[test]
    fn test_one_unit_steps_are_sparse() {
        let mut track = TrackPlotter::new(DVec2::ZERO);
        for i in 1..=60 {
            track.plot_location(DVec2::new(0.0, i as f64));
        }
        // Every sixth step crosses the 5 unit gate
        assert_eq!(track.len(), 10);
    }

    #[test]
    fn test_clear_restarts_trail() {
        let mut track = TrackPlotter::new(DVec2::ZERO);
        track.plot_location(DVec2::new(10.0, 0.0));
        assert_eq!(track.len(), 1);

        track.clear();
        assert!(track.is_empty());
        assert!(track.shapes().is_empty());

        // Right next to the old point, but the trail starts over
        assert!(track.plot_location(DVec2::new(10.5, 0.0)));
        assert_eq!(track.shapes().len(), 1);
    }
}
