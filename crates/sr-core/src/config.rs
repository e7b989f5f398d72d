//! Navigation configuration.
//!
//! `NavConfig` is a plain struct with public fields and a `Default` that
//! carries the engine's tuned constants.  Callers override the fields they
//! care about and call [`NavConfig::validate`] (the builder in `sr-engine`
//! does this for them).

use std::time::Duration;

use crate::{CoreError, CoreResult};

/// Cost stored for non-traversable cells.  Strictly greater than any cost the
/// cost model can assign to water.
pub const IMPASSABLE_COST: u16 = 100;

/// Cost assigned to traversable cells upgraded from a legacy cache file that
/// predates per-cell costs.
pub const LEGACY_TRAVERSABLE_COST: u16 = 1;

// ── UnknownCells ──────────────────────────────────────────────────────────────

/// How a search treats cells that are neither cached nor observable.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnknownCells {
    /// Unknown cells are walls.  Never routes through unseen terrain.
    Blocked,
    /// Unknown cells are passable at [`SearchConfig::unknown_cell_cost`].
    /// Reaches further in sparsely explored areas at the price of paths that
    /// may cross land once it is observed.
    Optimistic,
}

// ── CostConfig ────────────────────────────────────────────────────────────────

/// Cost model tuning.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostConfig {
    /// Ring radius of the shore scan and offset of the 8 long-range
    /// isolation probes.
    pub probe_radius:        i32,
    /// Fewer traversable long-range directions than this marks a dead end.
    pub min_open_directions: u8,
    /// Minimum cost of a dead-end cell.
    pub dead_end_floor:      u16,
    /// Cost of water with no shore inside `probe_radius`.
    pub open_water_cost:     u16,
    /// Extra cost per ring closer to shore.
    pub shore_step_cost:     u16,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            probe_radius:        5,
            min_open_directions: 4,
            dead_end_floor:      50,
            open_water_cost:     1,
            shore_step_cost:     1,
        }
    }
}

impl CostConfig {
    /// Largest cost the model can assign to a traversable cell.
    pub fn max_traversable_cost(&self) -> u32 {
        let near_shore = self.open_water_cost as u32
            + self.shore_step_cost as u32 * (self.probe_radius.max(1) as u32 - 1);
        near_shore.max(self.dead_end_floor as u32)
    }
}

// ── SearchConfig ──────────────────────────────────────────────────────────────

/// Path search tuning shared by both strategies.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchConfig {
    /// Lattice spacing of breadth-first expansion.
    pub grid_step:            i32,
    /// Node expansion budget of the breadth-first strategy.
    pub bfs_max_expansions:   usize,
    /// Node expansion budget of the weighted strategy.
    pub astar_max_expansions: usize,
    /// Endpoints closer than this try a straight segment before searching.
    pub direct_probe_range:   f64,
    /// `Auto` strategy picks breadth-first up to this separation.
    pub auto_breadth_range:   f64,
    /// Multiplier on cell cost in the weighted strategy's move cost.
    pub cell_cost_weight:     f64,
    /// Allow diagonal steps between two blocked orthogonal cells.
    pub allow_corner_cutting: bool,
    pub bfs_unknown:          UnknownCells,
    pub astar_unknown:        UnknownCells,
    /// Cost of an unknown cell under [`UnknownCells::Optimistic`].
    pub unknown_cell_cost:    u16,
    /// Optional wall-clock cap in addition to the expansion budget.
    pub max_search_time:      Option<Duration>,
    /// Expansions between progress reports.
    pub progress_interval:    usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            grid_step:            1,
            bfs_max_expansions:   50_000,
            astar_max_expansions: 250_000,
            direct_probe_range:   20.0,
            auto_breadth_range:   400.0,
            cell_cost_weight:     2.0,
            allow_corner_cutting: false,
            bfs_unknown:          UnknownCells::Blocked,
            astar_unknown:        UnknownCells::Optimistic,
            unknown_cell_cost:    3,
            max_search_time:      None,
            progress_interval:    10_000,
        }
    }
}

// ── AnchorConfig ──────────────────────────────────────────────────────────────

/// Navigable-anchor search and scoring.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnchorConfig {
    pub max_radius:               i32,
    pub ring_step:                i32,
    pub angle_step_deg:           u32,
    /// Half-width of the water-area sample window (5 → 11×11).
    pub area_half_width:          i32,
    pub min_water_area_pct:       u32,
    pub min_clear_directions:     u32,
    pub clear_direction_distance: i32,
    /// A candidate at or above this score is accepted.
    pub qualify_score:            u8,
    /// A candidate at or above this score ends the spiral early.
    pub excellent_score:          u8,
    /// Probe length of open-water direction scans.
    pub open_water_probe:         i32,
    pub open_water_min_run:       i32,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            max_radius:               50,
            ring_step:                5,
            angle_step_deg:           15,
            area_half_width:          5,
            min_water_area_pct:       70,
            min_clear_directions:     6,
            clear_direction_distance: 20,
            qualify_score:            60,
            excellent_score:          80,
            open_water_probe:         50,
            open_water_min_run:       10,
        }
    }
}

// ── OptimizerConfig ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizerConfig {
    /// Sample spacing of line-of-sight checks.
    pub los_step:           f64,
    /// Turns sharper than this get midpoints inserted by `smooth`.
    pub turn_threshold_deg: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self { los_step: 2.0, turn_threshold_deg: 30.0 }
    }
}

// ── NavConfig ─────────────────────────────────────────────────────────────────

/// Top-level engine configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavConfig {
    /// The single elevation used for every traversability decision (sea level).
    pub reference_elevation: i32,
    pub cost:                CostConfig,
    pub search:              SearchConfig,
    pub anchor:              AnchorConfig,
    pub optimizer:           OptimizerConfig,
    /// Travel speed in world units per second, for `Path::estimated_time`.
    pub travel_speed:        f64,
    /// Deepest water column the depth probe reports.
    pub depth_probe:         u32,
    /// Depth assumed for unobservable water.
    pub unobserved_depth:    u32,
    /// Sample stride of coverage reports.
    pub coverage_stride:     i32,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            reference_elevation: 62,
            cost:                CostConfig::default(),
            search:              SearchConfig::default(),
            anchor:              AnchorConfig::default(),
            optimizer:           OptimizerConfig::default(),
            // 0.35 units/tick at 20 ticks/s.
            travel_speed:        7.0,
            depth_probe:         10,
            unobserved_depth:    5,
            coverage_stride:     10,
        }
    }
}

impl NavConfig {
    /// Reference elevation as a world-space `y`.
    #[inline]
    pub fn elevation_y(&self) -> f64 {
        self.reference_elevation as f64
    }

    /// Reject settings that would break engine invariants.
    pub fn validate(&self) -> CoreResult<()> {
        let c = &self.cost;
        if c.probe_radius < 1 {
            return Err(CoreError::Config(format!(
                "cost.probe_radius must be >= 1, got {}",
                c.probe_radius
            )));
        }
        if c.min_open_directions > 8 {
            return Err(CoreError::Config(format!(
                "cost.min_open_directions must be <= 8, got {}",
                c.min_open_directions
            )));
        }
        if c.max_traversable_cost() >= IMPASSABLE_COST as u32 {
            return Err(CoreError::Config(format!(
                "traversable costs reach {} which is not below the impassable sentinel {}",
                c.max_traversable_cost(),
                IMPASSABLE_COST
            )));
        }

        let s = &self.search;
        if s.grid_step < 1 {
            return Err(CoreError::Config(format!(
                "search.grid_step must be >= 1, got {}",
                s.grid_step
            )));
        }
        if s.bfs_max_expansions == 0 || s.astar_max_expansions == 0 {
            return Err(CoreError::Config("search expansion budgets must be non-zero".into()));
        }
        if s.unknown_cell_cost >= IMPASSABLE_COST {
            return Err(CoreError::Config(format!(
                "search.unknown_cell_cost must be below {IMPASSABLE_COST}, got {}",
                s.unknown_cell_cost
            )));
        }
        if s.cell_cost_weight.is_nan() || s.cell_cost_weight < 0.0 {
            return Err(CoreError::Config("search.cell_cost_weight must be >= 0".into()));
        }

        let a = &self.anchor;
        if a.ring_step < 1 || a.angle_step_deg == 0 {
            return Err(CoreError::Config("anchor ring and angle steps must be non-zero".into()));
        }
        if a.qualify_score > a.excellent_score || a.excellent_score > 100 {
            return Err(CoreError::Config(format!(
                "anchor scores must satisfy qualify <= excellent <= 100, got {} / {}",
                a.qualify_score, a.excellent_score
            )));
        }

        if self.optimizer.los_step.is_nan() || self.optimizer.los_step <= 0.0 {
            return Err(CoreError::Config("optimizer.los_step must be > 0".into()));
        }
        if self.travel_speed.is_nan() || self.travel_speed <= 0.0 {
            return Err(CoreError::Config("travel_speed must be > 0".into()));
        }
        if self.coverage_stride < 1 {
            return Err(CoreError::Config("coverage_stride must be >= 1".into()));
        }
        Ok(())
    }
}
