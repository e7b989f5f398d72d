//! Read-through traversability queries.
//!
//! [`PathValidator`] is what searches, the anchor finder, and the optimizer
//! ask about cells.  A lookup checks the cache first.  On a miss it computes
//! the record through the cost model if the cell is observable and writes it
//! back.  Otherwise the cell is reported as [`Lookup::Unobservable`], which
//! [`is_traversable`](PathValidator::is_traversable) treats as blocked.

use std::sync::Arc;

use sr_cache::{CellRecord, CostCache};
use sr_core::{Bounds, Coord, NavConfig, Surface, UnknownCells, WorldPoint};

use crate::CostModel;

/// Result of a validator lookup.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Lookup {
    Known(CellRecord),
    /// Not cached and not observable right now.
    Unobservable,
}

pub struct PathValidator<S: Surface + ?Sized> {
    cache:             Arc<CostCache>,
    surface:           Arc<S>,
    model:             CostModel,
    depth_probe:       u32,
    unobserved_depth:  u32,
    unknown_cell_cost: u16,
}

impl<S: Surface + ?Sized> PathValidator<S> {
    pub fn new(cache: Arc<CostCache>, surface: Arc<S>, config: &NavConfig) -> Self {
        Self {
            cache,
            surface,
            model: CostModel::new(config.cost.clone(), config.reference_elevation),
            depth_probe:       config.depth_probe,
            unobserved_depth:  config.unobserved_depth,
            unknown_cell_cost: config.search.unknown_cell_cost,
        }
    }

    #[inline]
    pub fn cache(&self) -> &Arc<CostCache> {
        &self.cache
    }

    #[inline]
    pub fn surface(&self) -> &Arc<S> {
        &self.surface
    }

    #[inline]
    pub fn model(&self) -> &CostModel {
        &self.model
    }

    #[inline]
    pub fn elevation(&self) -> i32 {
        self.model.elevation()
    }

    /// Cache, then live observation with write-back.
    pub fn lookup(&self, at: Coord) -> Lookup {
        if let Some(rec) = self.cache.get(at) {
            return Lookup::Known(rec);
        }
        let surface = &*self.surface;
        if !surface.is_observable(at) {
            return Lookup::Unobservable;
        }
        let traversable = surface.is_traversable(at, self.elevation());
        let cost = self.model.compute_cost(at, traversable, &self.cache, surface);
        let rec = CellRecord::new(traversable, cost);
        if !self.cache.put_if_absent(at, rec) {
            // Another writer got there first; report what is stored.
            if let Some(stored) = self.cache.peek(at) {
                return Lookup::Known(stored);
            }
        }
        Lookup::Known(rec)
    }

    /// `false` for land and for unknown, unobservable cells.
    pub fn is_traversable(&self, at: Coord) -> bool {
        matches!(self.lookup(at), Lookup::Known(rec) if rec.traversable)
    }

    /// Traversability under an explicit unknown-cell policy.
    pub fn is_passable(&self, at: Coord, unknown: UnknownCells) -> bool {
        match self.lookup(at) {
            Lookup::Known(rec) => rec.traversable,
            Lookup::Unobservable => unknown == UnknownCells::Optimistic,
        }
    }

    /// Cost of entering a cell, or `None` if it cannot be entered.
    pub fn traversal_cost(&self, at: Coord, unknown: UnknownCells) -> Option<u16> {
        match self.lookup(at) {
            Lookup::Known(rec) if rec.traversable => Some(rec.cost),
            Lookup::Known(_) => None,
            Lookup::Unobservable => match unknown {
                UnknownCells::Blocked => None,
                UnknownCells::Optimistic => Some(self.unknown_cell_cost),
            },
        }
    }

    /// Water column depth below the reference elevation, capped at the depth
    /// probe.  Unobservable water reports a fixed moderate depth.
    pub fn water_depth(&self, at: Coord) -> u32 {
        match self.lookup(at) {
            Lookup::Known(rec) if !rec.traversable => 0,
            Lookup::Unobservable => self.unobserved_depth,
            Lookup::Known(_) => {
                let surface = &*self.surface;
                if surface.is_observable(at) {
                    surface.depth(at, self.elevation(), self.depth_probe)
                } else {
                    self.unobserved_depth
                }
            }
        }
    }

    /// `true` if every cell within `radius` (square) is traversable.
    pub fn is_safe_from_shore(&self, at: Coord, radius: i32) -> bool {
        if radius <= 0 {
            return true;
        }
        Bounds::around(at, radius).cells().all(|c| self.is_traversable(c))
    }

    /// `true` if sample points every `step` units along `a → b` are all in
    /// traversable cells.  `b` itself is sampled; `a` is not.
    pub fn has_line_of_sight(&self, a: WorldPoint, b: WorldPoint, step: f64) -> bool {
        let dist = a.distance_xz(b);
        let samples = (dist / step.max(f64::EPSILON)).ceil().max(1.0) as u64;
        (1..=samples).all(|i| {
            let t = i as f64 / samples as f64;
            self.is_traversable(a.lerp(b, t).cell())
        })
    }
}
