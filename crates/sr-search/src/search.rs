//! Path search entry point and the pieces both strategies share.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info};
use rustc_hash::FxHashMap;

use sr_core::{Coord, SearchConfig, Surface, UnknownCells};
use sr_terrain::PathValidator;

use crate::observer::NoopSearchObserver;
use crate::{breadth, weighted, EndpointSide, SearchError, SearchObserver, SearchResult};

/// Sample spacing of the direct-segment probe.  Finer than a cell so a
/// diagonal segment cannot slip between two land cells.
const DIRECT_PROBE_STEP: f64 = 0.5;

/// How often the wall-clock cap is consulted, in expansions.
const TIME_CHECK_EVERY: usize = 256;

// ── SearchStrategy ────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchStrategy {
    /// Uniform-cost bidirectional breadth-first search.
    Breadth,
    /// Cost-weighted bidirectional A*.
    Weighted,
}

impl SearchStrategy {
    /// The other strategy, for callers that retry after a budget failure.
    pub fn other(self) -> Self {
        match self {
            SearchStrategy::Breadth => SearchStrategy::Weighted,
            SearchStrategy::Weighted => SearchStrategy::Breadth,
        }
    }
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchStrategy::Breadth => f.write_str("bfs"),
            SearchStrategy::Weighted => f.write_str("a*"),
        }
    }
}

// ── SearchOutcome ─────────────────────────────────────────────────────────────

/// A raw cell path from a successful search.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchOutcome {
    /// Start to goal inclusive.
    pub cells:      Vec<Coord>,
    pub strategy:   SearchStrategy,
    pub expansions: usize,
    /// Where the two frontiers met; `None` for trivial and direct paths.
    pub meeting:    Option<Coord>,
    /// `true` if the straight segment was used without searching.
    pub direct:     bool,
}

// ── PathSearch ────────────────────────────────────────────────────────────────

/// Bidirectional path search over the validator's view of the surface.
///
/// Cheap to share behind an `Arc`; every call keeps its frontier state
/// locally, so concurrent searches only contend on the cost cache shards.
pub struct PathSearch<S: Surface + ?Sized> {
    validator: Arc<PathValidator<S>>,
    config:    SearchConfig,
}

impl<S: Surface + ?Sized> PathSearch<S> {
    pub fn new(validator: Arc<PathValidator<S>>, config: SearchConfig) -> Self {
        Self { validator, config }
    }

    #[inline]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    #[inline]
    pub fn validator(&self) -> &PathValidator<S> {
        &self.validator
    }

    pub fn find(&self, start: Coord, goal: Coord, strategy: SearchStrategy) -> SearchResult<SearchOutcome> {
        self.find_observed(start, goal, strategy, &mut NoopSearchObserver)
    }

    pub fn find_observed<O: SearchObserver + ?Sized>(
        &self,
        start:    Coord,
        goal:     Coord,
        strategy: SearchStrategy,
        observer: &mut O,
    ) -> SearchResult<SearchOutcome> {
        let started = Instant::now();
        let result = self.run(start, goal, strategy, observer);
        match &result {
            Ok(outcome) => {
                info!(
                    "{strategy} {start} -> {goal}: {} cells, {} expansions in {:?}",
                    outcome.cells.len(),
                    outcome.expansions,
                    started.elapsed()
                );
                observer.on_found(outcome);
            }
            Err(e) => {
                debug!("{strategy} {start} -> {goal} failed: {e}");
                observer.on_failed(strategy, e);
            }
        }
        result
    }

    fn run<O: SearchObserver + ?Sized>(
        &self,
        start:    Coord,
        goal:     Coord,
        strategy: SearchStrategy,
        observer: &mut O,
    ) -> SearchResult<SearchOutcome> {
        if !self.validator.is_traversable(start) {
            return Err(SearchError::EndpointNotTraversable { side: EndpointSide::Start, at: start });
        }
        if !self.validator.is_traversable(goal) {
            return Err(SearchError::EndpointNotTraversable { side: EndpointSide::Goal, at: goal });
        }
        observer.on_start(strategy, start, goal);

        if start == goal {
            return Ok(SearchOutcome {
                cells: vec![start],
                strategy,
                expansions: 0,
                meeting: None,
                direct: true,
            });
        }
        if self.direct_segment_clear(start, goal) {
            debug!("{start} -> {goal}: direct segment is clear");
            return Ok(SearchOutcome {
                cells: vec![start, goal],
                strategy,
                expansions: 0,
                meeting: None,
                direct: true,
            });
        }

        match strategy {
            SearchStrategy::Breadth => breadth::search(self, start, goal, observer),
            SearchStrategy::Weighted => weighted::search(self, start, goal, observer),
        }
    }

    fn direct_segment_clear(&self, start: Coord, goal: Coord) -> bool {
        if start.distance(goal) >= self.config.direct_probe_range {
            return false;
        }
        let y = self.validator.elevation() as f64;
        self.validator
            .has_line_of_sight(start.center(y), goal.center(y), DIRECT_PROBE_STEP)
    }

    /// Whether the move from `from` by `(dx, dz) × step` may be taken, given
    /// that the destination itself is already known to be passable.  Checks
    /// the cells jumped over and, for diagonals, the two cells beside each
    /// unit of the move.
    pub(crate) fn step_allowed(
        &self,
        from:    Coord,
        dx:      i32,
        dz:      i32,
        step:    i32,
        unknown: UnknownCells,
    ) -> bool {
        let passable = |c: Coord| self.validator.is_passable(c, unknown);
        if (1..step).any(|k| !passable(from.offset(dx * k, dz * k))) {
            return false;
        }
        if dx != 0 && dz != 0 && !self.config.allow_corner_cutting {
            for k in 0..step {
                if !passable(from.offset(dx * (k + 1), dz * k))
                    || !passable(from.offset(dx * k, dz * (k + 1)))
                {
                    return false;
                }
            }
        }
        true
    }
}

// ── Shared helpers ────────────────────────────────────────────────────────────

/// Which limit stopped a search.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum LimitHit {
    Expansions(usize),
    Time { elapsed_ms: u64, expansions: usize },
}

impl LimitHit {
    pub(crate) fn into_error(self) -> SearchError {
        match self {
            LimitHit::Expansions(expansions) => SearchError::SearchBudgetExceeded { expansions },
            LimitHit::Time { elapsed_ms, expansions } => {
                SearchError::TimedOut { elapsed_ms, expansions }
            }
        }
    }
}

/// Expansion budget, optional wall-clock cap, and progress cadence.
#[derive(Copy, Clone)]
pub(crate) struct Limits {
    budget:   usize,
    max_time: Option<Duration>,
    started:  Instant,
    interval: usize,
}

impl Limits {
    pub(crate) fn new(budget: usize, config: &SearchConfig) -> Self {
        Self {
            budget,
            max_time: config.max_search_time,
            started:  Instant::now(),
            interval: config.progress_interval.max(1),
        }
    }

    pub(crate) fn check(&self, expansions: usize) -> Option<LimitHit> {
        if expansions > self.budget {
            return Some(LimitHit::Expansions(self.budget));
        }
        if let Some(max) = self.max_time {
            if expansions % TIME_CHECK_EVERY == 0 {
                let elapsed = self.started.elapsed();
                if elapsed > max {
                    return Some(LimitHit::Time {
                        elapsed_ms: elapsed.as_millis() as u64,
                        expansions,
                    });
                }
            }
        }
        None
    }

    #[inline]
    pub(crate) fn report_due(&self, expansions: usize) -> bool {
        expansions % self.interval == 0
    }
}

/// Join the two parent chains at `meeting`.  Each map sends its root to
/// itself.  The meeting cell appears once.
pub(crate) fn reconstruct(
    meeting:  Coord,
    forward:  &FxHashMap<Coord, Coord>,
    backward: &FxHashMap<Coord, Coord>,
) -> Vec<Coord> {
    let mut cells = vec![meeting];
    let mut cur = meeting;
    while let Some(&prev) = forward.get(&cur) {
        if prev == cur {
            break;
        }
        cells.push(prev);
        cur = prev;
    }
    cells.reverse();

    cur = meeting;
    while let Some(&next) = backward.get(&cur) {
        if next == cur {
            break;
        }
        cells.push(next);
        cur = next;
    }
    cells
}
