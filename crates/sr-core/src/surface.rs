//! Host surface trait and an in-memory grid implementation.
//!
//! # Host integration
//!
//! The engine never owns the world.  It asks a [`Surface`] three questions:
//! is this cell observable right now, is it traversable at the reference
//! elevation, and how deep is the water column.  A game server, a raster
//! loader, or a test fixture each implement the trait once and hand it to the
//! engine wrapped in an `Arc`.
//!
//! # `GridSurface`
//!
//! A dense rectangle of depth values (0 = land).  Cells outside the rectangle
//! are observable land, so searches over a `GridSurface` always terminate.
//! Observability is per-cell and can be toggled through `&self` with
//! [`GridSurface::reveal`], which lets tests and demos stream regions in
//! while searches run on other threads.
//!
//! ```text
//! ~  water, depth 8        #  land
//! ,  shallow water, depth 1 ?  water, not yet observable
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use crate::{Bounds, Coord, CoreError, CoreResult};

// ── Surface trait ─────────────────────────────────────────────────────────────

/// Read-only view of the live world.
///
/// Implementations must be `Send + Sync`; background cache population and
/// searches call into the surface from Rayon worker threads.
pub trait Surface: Send + Sync {
    /// `true` if the host has data for `at` right now (the chunk is loaded).
    fn is_observable(&self, at: Coord) -> bool;

    /// `true` if the cell at `at` is water at `elevation`.  Only meaningful
    /// when [`is_observable`](Self::is_observable) returns `true`.
    fn is_traversable(&self, at: Coord, elevation: i32) -> bool;

    /// Contiguous water cells from `elevation` downward, capped at `max`.
    ///
    /// The default reports 1 for water and 0 for land, which is enough for
    /// hosts without depth information.
    fn depth(&self, at: Coord, elevation: i32, max: u32) -> u32 {
        u32::from(self.is_traversable(at, elevation)).min(max)
    }
}

// ── GridSurface ───────────────────────────────────────────────────────────────

/// Depth written for `~` cells by [`GridSurface::from_ascii`].
pub const ASCII_DEEP: u8 = 8;

/// Dense in-memory surface.
pub struct GridSurface {
    bounds:     Bounds,
    width:      usize,
    depths:     Vec<u8>,
    observable: Vec<AtomicBool>,
}

impl GridSurface {
    /// All land, all observable.
    pub fn land(bounds: Bounds) -> Self {
        Self::filled(bounds, 0)
    }

    /// All water of `depth`, all observable.
    pub fn water(bounds: Bounds, depth: u8) -> Self {
        Self::filled(bounds, depth)
    }

    fn filled(bounds: Bounds, depth: u8) -> Self {
        let n = bounds.area() as usize;
        Self {
            bounds,
            width: bounds.width() as usize,
            depths: vec![depth; n],
            observable: (0..n).map(|_| AtomicBool::new(true)).collect(),
        }
    }

    /// Parse a character map whose top-left cell is `origin`.  Rows run along
    /// +z, columns along +x.  All rows must have the same length.
    pub fn from_ascii(origin: Coord, map: &str) -> CoreResult<Self> {
        let rows: Vec<&str> = map
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.chars().count());
        if width == 0 {
            return Err(CoreError::Parse("empty surface map".into()));
        }

        let max = origin.offset(width as i32 - 1, height as i32 - 1);
        let mut grid = Self::land(Bounds::new(origin, max));
        for (dz, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(CoreError::Parse(format!(
                    "row {dz} has {} cells, expected {width}",
                    row.chars().count()
                )));
            }
            for (dx, ch) in row.chars().enumerate() {
                let at = origin.offset(dx as i32, dz as i32);
                let (depth, visible) = match ch {
                    '~' => (ASCII_DEEP, true),
                    ',' => (1, true),
                    '#' => (0, true),
                    '?' => (ASCII_DEEP, false),
                    other => {
                        return Err(CoreError::Parse(format!(
                            "unknown surface cell {other:?} at row {dz}, column {dx}"
                        )));
                    }
                };
                grid.set_depth(at, depth);
                if !visible {
                    grid.hide(Bounds::new(at, at));
                }
            }
        }
        Ok(grid)
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[inline]
    fn index(&self, at: Coord) -> Option<usize> {
        if !self.bounds.contains(at) {
            return None;
        }
        let dx = (at.x as i64 - self.bounds.min.x as i64) as usize;
        let dz = (at.z as i64 - self.bounds.min.z as i64) as usize;
        Some(dz * self.width + dx)
    }

    /// Set one cell's depth.  Ignored outside the grid.
    pub fn set_depth(&mut self, at: Coord, depth: u8) {
        if let Some(i) = self.index(at) {
            self.depths[i] = depth;
        }
    }

    pub fn fill_water(&mut self, region: Bounds, depth: u8) {
        for c in region.cells() {
            self.set_depth(c, depth);
        }
    }

    pub fn fill_land(&mut self, region: Bounds) {
        self.fill_water(region, 0);
    }

    /// Mark a region unobservable.
    pub fn hide(&mut self, region: Bounds) {
        self.set_observable(region, false);
    }

    /// Mark a region observable.  Takes `&self` so a shared surface can be
    /// revealed while other threads read it.
    pub fn reveal(&self, region: Bounds) {
        self.set_observable(region, true);
    }

    fn set_observable(&self, region: Bounds, visible: bool) {
        for c in region.cells() {
            if let Some(i) = self.index(c) {
                self.observable[i].store(visible, Ordering::Release);
            }
        }
    }

    /// Number of water cells.
    pub fn water_cells(&self) -> usize {
        self.depths.iter().filter(|&&d| d > 0).count()
    }
}

impl Surface for GridSurface {
    fn is_observable(&self, at: Coord) -> bool {
        match self.index(at) {
            Some(i) => self.observable[i].load(Ordering::Acquire),
            None => true,
        }
    }

    fn is_traversable(&self, at: Coord, _elevation: i32) -> bool {
        self.index(at).is_some_and(|i| self.depths[i] > 0)
    }

    fn depth(&self, at: Coord, _elevation: i32, max: u32) -> u32 {
        self.index(at).map_or(0, |i| u32::from(self.depths[i]).min(max))
    }
}
