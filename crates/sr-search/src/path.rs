//! Finished paths.

use std::time::Duration;

use sr_core::{Coord, WorldPoint};

/// An immutable ordered list of world points with derived metrics.
///
/// Holds no reference to the cache or the surface; a path stays valid (as a
/// value) after the world changes.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    points:   Vec<WorldPoint>,
    distance: f64,
    speed:    f64,
}

impl Path {
    /// `speed` is world units per second and only feeds
    /// [`estimated_time`](Self::estimated_time).
    pub fn new(points: Vec<WorldPoint>, speed: f64) -> Self {
        let distance = points.windows(2).map(|w| w[0].distance(w[1])).sum();
        Self { points, distance, speed }
    }

    /// Path through the centres of `cells` at elevation `y`.
    pub fn from_cells(cells: &[Coord], y: f64, speed: f64) -> Self {
        Self::new(cells.iter().map(|c| c.center(y)).collect(), speed)
    }

    /// A new path with the same speed.
    pub fn with_points(&self, points: Vec<WorldPoint>) -> Self {
        Self::new(points, self.speed)
    }

    #[inline]
    pub fn points(&self) -> &[WorldPoint] {
        &self.points
    }

    pub fn into_points(self) -> Vec<WorldPoint> {
        self.points
    }

    #[inline]
    pub fn waypoint_count(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn start(&self) -> Option<WorldPoint> {
        self.points.first().copied()
    }

    pub fn end(&self) -> Option<WorldPoint> {
        self.points.last().copied()
    }

    /// Sum of segment lengths.
    #[inline]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn estimated_secs(&self) -> f64 {
        if self.speed > 0.0 { self.distance / self.speed } else { 0.0 }
    }

    pub fn estimated_time(&self) -> Duration {
        Duration::from_secs_f64(self.estimated_secs())
    }

    /// The same path travelled the other way.
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points, distance: self.distance, speed: self.speed }
    }
}
