//! Navigable-anchor discovery.
//!
//! A user-placed endpoint often sits in a harbour corner, a river mouth, or
//! right against a pier: water, but a poor place to start a long search.
//! [`AnchorFinder::find_anchor`] moves it to the nearest cell with a good
//! [`navigability_score`](AnchorFinder::navigability_score).
//!
//! # Score (0–100)
//!
//! | Part  | Measure                                         | Points                         |
//! |-------|-------------------------------------------------|--------------------------------|
//! | area  | % water in the 11×11 window                     | 40 if ≥ 70 %, else % / 2       |
//! | reach | compass directions clear for 20 cells           | 40 if ≥ 6, else 5 each         |
//! | depth | water column depth                              | 4 per unit, max 20             |
//!
//! # Scan
//!
//! Radius 5, 10, … up to the maximum; at each radius 24 candidates every
//! 15°.  The first candidate scoring ≥ 80 wins outright; otherwise the best
//! one scoring ≥ 60 is returned.

use std::sync::Arc;

use log::{debug, info};

use sr_core::{AnchorConfig, Bounds, Coord, Surface, WorldPoint, COMPASS};
use sr_terrain::PathValidator;

/// A qualifying anchor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Anchor {
    pub cell:  Coord,
    /// Cell centre at the reference elevation.
    pub point: WorldPoint,
    pub score: u8,
}

pub struct AnchorFinder<S: Surface + ?Sized> {
    validator: Arc<PathValidator<S>>,
    config:    AnchorConfig,
}

impl<S: Surface + ?Sized> AnchorFinder<S> {
    pub fn new(validator: Arc<PathValidator<S>>, config: AnchorConfig) -> Self {
        Self { validator, config }
    }

    #[inline]
    pub fn config(&self) -> &AnchorConfig {
        &self.config
    }

    fn anchor(&self, cell: Coord, score: u8) -> Anchor {
        let y = self.validator.elevation() as f64;
        Anchor { cell, point: cell.center(y), score }
    }

    pub fn find_anchor(&self, nominal: Coord, max_radius: i32) -> Option<Anchor> {
        let cfg = &self.config;
        let here = self.navigability_score(nominal);
        if here >= cfg.qualify_score {
            debug!("{nominal} already navigable (score {here})");
            return Some(self.anchor(nominal, here));
        }

        let mut best: Option<Anchor> = None;
        let mut radius = cfg.ring_step;
        while radius <= max_radius {
            let mut angle = 0u32;
            while angle < 360 {
                let rad = (angle as f64).to_radians();
                let cell = nominal.offset(
                    (radius as f64 * rad.cos()) as i32,
                    (radius as f64 * rad.sin()) as i32,
                );
                angle += cfg.angle_step_deg;

                if !self.validator.is_traversable(cell) {
                    continue;
                }
                let score = self.navigability_score(cell);
                if best.is_none_or(|b| score > b.score) {
                    best = Some(self.anchor(cell, score));
                    if score >= cfg.excellent_score {
                        info!("anchor for {nominal}: {cell} (score {score}, radius {radius})");
                        return best;
                    }
                }
            }
            radius += cfg.ring_step;
        }

        match best {
            Some(b) if b.score >= cfg.qualify_score => {
                info!("anchor for {nominal}: {} (score {})", b.cell, b.score);
                Some(b)
            }
            _ => {
                info!("no navigable anchor within {max_radius} of {nominal}");
                None
            }
        }
    }

    pub fn navigability_score(&self, at: Coord) -> u8 {
        if !self.validator.is_traversable(at) {
            return 0;
        }
        let cfg = &self.config;

        let window = Bounds::around(at, cfg.area_half_width);
        let water = window.cells().filter(|&c| self.validator.is_traversable(c)).count() as u64;
        let area_pct = (water * 100 / window.area()) as u32;
        let area_points = if area_pct >= cfg.min_water_area_pct { 40 } else { area_pct / 2 };

        let clear = COMPASS
            .iter()
            .filter(|&&(dx, dz)| self.clear_run(at, dx, dz, cfg.clear_direction_distance) >= cfg.clear_direction_distance)
            .count() as u32;
        let reach_points = if clear >= cfg.min_clear_directions { 40 } else { clear * 5 };

        let depth_points = (self.validator.water_depth(at) * 4).min(20);

        (area_points + reach_points + depth_points).min(100) as u8
    }

    /// The compass direction with the longest clear run (probing up to the
    /// configured distance), if that run is long enough to call open water.
    pub fn direction_to_open_water(&self, at: Coord) -> Option<(i32, i32)> {
        let cfg = &self.config;
        let mut best: Option<((i32, i32), i32)> = None;
        for &(dx, dz) in &COMPASS {
            let run = self.clear_run(at, dx, dz, cfg.open_water_probe);
            if run > best.map_or(0, |(_, r)| r) {
                best = Some(((dx, dz), run));
            }
        }
        best.filter(|&(_, run)| run >= cfg.open_water_min_run).map(|(dir, _)| dir)
    }

    /// Consecutive traversable cells stepping from `at` in `(dx, dz)`, up
    /// to `limit`.
    fn clear_run(&self, at: Coord, dx: i32, dz: i32, limit: i32) -> i32 {
        (1..=limit)
            .take_while(|&i| self.validator.is_traversable(at.offset(dx * i, dz * i)))
            .count() as i32
    }
}
