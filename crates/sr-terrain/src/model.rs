//! Cell cost model.
//!
//! # Cost
//!
//! Land costs [`IMPASSABLE_COST`].  Water cost has two parts:
//!
//! 1. **Shore distance** `d`: the first square ring (radius 1..=K) around the
//!    cell that holds a non-traversable cell.
//!    `cost = open_water_cost + shore_step_cost × (K − d)`, or
//!    `open_water_cost` when no ring up to K has land.  With the defaults
//!    (K = 5) this is 5, 4, 3, 2, 1, 1, … for d = 1, 2, 3, 4, 5, 6+.
//! 2. **Isolation**: the 8 compass cells at offset K are sampled; fewer than
//!    `min_open_directions` traversable marks a dead-end pocket and the cost
//!    is raised to at least `dead_end_floor`.
//!
//! A narrow bay can look like open water a few cells in but lead nowhere;
//! the long-range sample catches that without a flood fill.
//!
//! # Neighbour probes
//!
//! Each probe asks, in order: the cache, the live surface (if observable),
//! otherwise assumes water.  Optimism here only lowers a cost estimate; it
//! never makes land traversable.

use sr_cache::CostCache;
use sr_core::{Coord, CostConfig, Surface, COMPASS, IMPASSABLE_COST};

#[derive(Clone, Debug)]
pub struct CostModel {
    config:    CostConfig,
    elevation: i32,
}

impl CostModel {
    pub fn new(config: CostConfig, elevation: i32) -> Self {
        Self { config, elevation }
    }

    #[inline]
    pub fn config(&self) -> &CostConfig {
        &self.config
    }

    #[inline]
    pub fn elevation(&self) -> i32 {
        self.elevation
    }

    /// Cost of a cell whose traversability is already known.
    pub fn compute_cost<S: Surface + ?Sized>(
        &self,
        at:          Coord,
        traversable: bool,
        cache:       &CostCache,
        surface:     &S,
    ) -> u16 {
        if !traversable {
            return IMPASSABLE_COST;
        }
        let shore = self.shore_distance(at, cache, surface);
        let isolated = self.open_directions(at, cache, surface) < self.config.min_open_directions;
        self.cost_for(shore, isolated)
    }

    /// Pure cost formula.  `shore_distance > K` means open water.
    pub fn cost_for(&self, shore_distance: i32, isolated: bool) -> u16 {
        let k = self.config.probe_radius;
        let base = if (1..=k).contains(&shore_distance) {
            let rings = (k - shore_distance) as u16;
            self.config
                .open_water_cost
                .saturating_add(self.config.shore_step_cost.saturating_mul(rings))
        } else {
            self.config.open_water_cost
        };
        if isolated {
            base.max(self.config.dead_end_floor)
        } else {
            base
        }
    }

    /// Radius of the nearest ring holding land, or `K + 1` if none does.
    pub fn shore_distance<S: Surface + ?Sized>(
        &self,
        at:      Coord,
        cache:   &CostCache,
        surface: &S,
    ) -> i32 {
        let k = self.config.probe_radius;
        for r in 1..=k {
            if ring(at, r).any(|c| !self.probe(c, cache, surface)) {
                return r;
            }
        }
        k + 1
    }

    /// How many of the 8 compass cells at offset K are traversable.
    pub fn open_directions<S: Surface + ?Sized>(
        &self,
        at:      Coord,
        cache:   &CostCache,
        surface: &S,
    ) -> u8 {
        let k = self.config.probe_radius;
        COMPASS
            .iter()
            .filter(|&&(dx, dz)| self.probe(at.offset(dx * k, dz * k), cache, surface))
            .count() as u8
    }

    #[inline]
    fn probe<S: Surface + ?Sized>(&self, at: Coord, cache: &CostCache, surface: &S) -> bool {
        if let Some(rec) = cache.peek(at) {
            return rec.traversable;
        }
        if surface.is_observable(at) {
            return surface.is_traversable(at, self.elevation);
        }
        true
    }
}

/// Cells at Chebyshev distance exactly `r` from `center`.
fn ring(center: Coord, r: i32) -> impl Iterator<Item = Coord> {
    let top_bottom = (-r..=r).flat_map(move |dx| [(dx, -r), (dx, r)]);
    let sides = (-r + 1..r).flat_map(move |dz| [(-r, dz), (r, dz)]);
    top_bottom
        .chain(sides)
        .map(move |(dx, dz)| center.offset(dx, dz))
}
