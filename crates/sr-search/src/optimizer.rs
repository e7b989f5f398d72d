//! Path post-processing.
//!
//! * [`simplify`](PathOptimizer::simplify) drops waypoints that a straight
//!   water segment can skip.  This is the canonical form that gets stored.
//! * [`smooth`](PathOptimizer::smooth) widens sharp turns for a vehicle that
//!   follows the path physically.  It adds points and is not stored.
//! * [`decimate`](PathOptimizer::decimate) keeps every Nth point for
//!   pathologically long raw outputs.

use std::sync::Arc;

use sr_core::{OptimizerConfig, Surface, WorldPoint};
use sr_terrain::PathValidator;

use crate::Path;

pub struct PathOptimizer<S: Surface + ?Sized> {
    validator: Arc<PathValidator<S>>,
    config:    OptimizerConfig,
}

impl<S: Surface + ?Sized> PathOptimizer<S> {
    pub fn new(validator: Arc<PathValidator<S>>, config: OptimizerConfig) -> Self {
        Self { validator, config }
    }

    /// Greedy line-of-sight reduction.  From each kept waypoint, jump to the
    /// farthest later waypoint visible over water.  The result is a
    /// subsequence of the input with the same endpoints.
    pub fn simplify(&self, path: &Path) -> Path {
        let pts = path.points();
        if pts.len() <= 2 {
            return path.clone();
        }
        let step = self.config.los_step;
        let last = pts.len() - 1;

        let mut kept = vec![pts[0]];
        let mut i = 0;
        while i < last {
            let next = (i + 2..=last)
                .rev()
                .find(|&j| self.validator.has_line_of_sight(pts[i], pts[j], step))
                .unwrap_or(i + 1);
            kept.push(pts[next]);
            i = next;
        }
        path.with_points(kept)
    }

    /// Insert midpoints on both sides of every turn sharper than the
    /// configured threshold.
    pub fn smooth(&self, path: &Path) -> Path {
        let pts = path.points();
        if pts.len() <= 2 {
            return path.clone();
        }
        let threshold = self.config.turn_threshold_deg;

        let mut out = Vec::with_capacity(pts.len() * 2);
        out.push(pts[0]);
        for w in pts.windows(3) {
            let (prev, cur, next) = (w[0], w[1], w[2]);
            if turn_angle_deg(prev, cur, next).abs() > threshold {
                out.push(prev.midpoint(cur));
                out.push(cur);
                out.push(cur.midpoint(next));
            } else {
                out.push(cur);
            }
        }
        out.push(pts[pts.len() - 1]);
        path.with_points(out)
    }

    /// Keep the first point, every `every_n`th point, and the last point.
    pub fn decimate(&self, path: &Path, every_n: usize) -> Path {
        let pts = path.points();
        if pts.len() <= 2 || every_n <= 1 {
            return path.clone();
        }
        let last = pts.len() - 1;
        let mut kept = vec![pts[0]];
        kept.extend((every_n..last).step_by(every_n).map(|i| pts[i]));
        kept.push(pts[last]);
        path.with_points(kept)
    }
}

/// Signed heading change at `cur`, in degrees within [-180, 180].
pub fn turn_angle_deg(prev: WorldPoint, cur: WorldPoint, next: WorldPoint) -> f64 {
    let a1 = (cur.z - prev.z).atan2(cur.x - prev.x);
    let a2 = (next.z - cur.z).atan2(next.x - cur.x);
    let mut diff = (a2 - a1).to_degrees();
    while diff > 180.0 {
        diff -= 360.0;
    }
    while diff < -180.0 {
        diff += 360.0;
    }
    diff
}
