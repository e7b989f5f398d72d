//! Bidirectional breadth-first search.
//!
//! # State machine
//!
//! ```text
//!            ┌──────────────┐  frontier cell inserted that the other side
//!   start ──►│   Running    │──────────── already visited ──────────► Found(meeting)
//!            └──────┬───────┘
//!                   │ a side's next level is empty ──────────────────► Exhausted
//!                   │ expansions > budget ───────────────────────────► BudgetExceeded
//!                   └ wall-clock cap passed ─────────────────────────► TimedOut
//! ```
//!
//! Each call to [`BreadthSearch::advance`] expands one full level of the
//! forward side, then one full level of the backward side.  A side that runs
//! out of frontier has visited its whole connected water body without
//! touching the other side, which proves no path exists.
//!
//! # Grid step
//!
//! With `grid_step > 1` neighbours are `step` cells apart (intermediate cells
//! must still be passable).  The backward side is seeded on the start's
//! lattice at the cell nearest the goal, and a unit-step search joins that
//! cell to the true goal.  A lattice walk cannot enter passages narrower
//! than the step, so a coarse result that is blocked or exhausted is never
//! final: the search is repeated at unit step.  All phases share one
//! expansion budget and one wall clock.

use log::debug;
use rustc_hash::FxHashMap;

use sr_core::{Coord, Surface, UnknownCells, COMPASS};

use crate::search::{reconstruct, LimitHit, Limits};
use crate::{PathSearch, SearchError, SearchObserver, SearchOutcome, SearchResult, SearchStrategy};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BfsState {
    Running,
    Found(Coord),
    Exhausted,
    BudgetExceeded { expansions: usize },
    TimedOut { elapsed_ms: u64, expansions: usize },
}

impl From<LimitHit> for BfsState {
    fn from(hit: LimitHit) -> Self {
        match hit {
            LimitHit::Expansions(expansions) => BfsState::BudgetExceeded { expansions },
            LimitHit::Time { elapsed_ms, expansions } => BfsState::TimedOut { elapsed_ms, expansions },
        }
    }
}

struct Frontier {
    level:   Vec<Coord>,
    /// Visited cells and the cell each was reached from.  The root maps to
    /// itself.
    parents: FxHashMap<Coord, Coord>,
}

impl Frontier {
    fn rooted(at: Coord) -> Self {
        let mut parents = FxHashMap::default();
        parents.insert(at, at);
        Self { level: vec![at], parents }
    }
}

/// One bidirectional BFS between two passable cells.
pub struct BreadthSearch<'a, S: Surface + ?Sized> {
    search:     &'a PathSearch<S>,
    step:       i32,
    unknown:    UnknownCells,
    forward:    Frontier,
    backward:   Frontier,
    expansions: usize,
    limits:     Limits,
    state:      BfsState,
}

impl<'a, S: Surface + ?Sized> BreadthSearch<'a, S> {
    pub fn new(search: &'a PathSearch<S>, start: Coord, goal: Coord, step: i32) -> Self {
        let config = search.config();
        let limits = Limits::new(config.bfs_max_expansions, config);
        Self::resume(search, start, goal, step, limits, 0)
    }

    /// A search that continues counting against limits already partly spent.
    pub(crate) fn resume(
        search:     &'a PathSearch<S>,
        start:      Coord,
        goal:       Coord,
        step:       i32,
        limits:     Limits,
        expansions: usize,
    ) -> Self {
        let state = if start == goal { BfsState::Found(start) } else { BfsState::Running };
        Self {
            search,
            step: step.max(1),
            unknown: search.config().bfs_unknown,
            forward: Frontier::rooted(start),
            backward: Frontier::rooted(goal),
            expansions,
            limits,
            state,
        }
    }

    #[inline]
    pub fn state(&self) -> &BfsState {
        &self.state
    }

    #[inline]
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    /// Expand one level on each side.  No-op once the state is terminal.
    pub fn advance<O: SearchObserver + ?Sized>(&mut self, observer: &mut O) -> &BfsState {
        if self.state != BfsState::Running {
            return &self.state;
        }
        self.state = self.expand_level(true, observer);
        if self.state == BfsState::Running {
            self.state = self.expand_level(false, observer);
        }
        &self.state
    }

    /// Run to a terminal state.
    pub fn run<O: SearchObserver + ?Sized>(&mut self, observer: &mut O) -> &BfsState {
        while self.state == BfsState::Running {
            self.advance(observer);
        }
        &self.state
    }

    /// Cell path for a `Found` state.
    pub fn path(&self) -> Option<Vec<Coord>> {
        match self.state {
            BfsState::Found(meeting) => {
                Some(reconstruct(meeting, &self.forward.parents, &self.backward.parents))
            }
            _ => None,
        }
    }

    fn expand_level<O: SearchObserver + ?Sized>(&mut self, forward: bool, observer: &mut O) -> BfsState {
        let (side, other) = if forward {
            (&mut self.forward, &self.backward)
        } else {
            (&mut self.backward, &self.forward)
        };
        let search = self.search;
        let validator = search.validator();
        let step = self.step;

        let level = std::mem::take(&mut side.level);
        let mut next = Vec::with_capacity(level.len() * 2);

        for node in level {
            self.expansions += 1;
            if let Some(hit) = self.limits.check(self.expansions) {
                return hit.into();
            }
            if self.limits.report_due(self.expansions) {
                let (f, b) = if forward {
                    (next.len(), other.level.len())
                } else {
                    (other.level.len(), next.len())
                };
                observer.on_progress(SearchStrategy::Breadth, self.expansions, f, b);
            }

            for &(dx, dz) in &COMPASS {
                let n = node.offset(dx * step, dz * step);
                if side.parents.contains_key(&n) {
                    continue;
                }
                if !validator.is_passable(n, self.unknown)
                    || !search.step_allowed(node, dx, dz, step, self.unknown)
                {
                    continue;
                }
                side.parents.insert(n, node);
                if other.parents.contains_key(&n) {
                    return BfsState::Found(n);
                }
                next.push(n);
            }
        }

        side.level = next;
        if side.level.is_empty() { BfsState::Exhausted } else { BfsState::Running }
    }
}

/// The cell on `start`'s lattice (spacing `step`) nearest to `goal`.
pub fn snap_to_lattice(start: Coord, goal: Coord, step: i32) -> Coord {
    let snap = |origin: i32, target: i32| -> i32 {
        let delta = target as i64 - origin as i64;
        let k = (delta as f64 / step as f64).round() as i64;
        (origin as i64 + k * step as i64).clamp(i32::MIN as i64, i32::MAX as i64) as i32
    };
    Coord::new(snap(start.x, goal.x), snap(start.z, goal.z))
}

/// Result of the lattice phase.
enum Coarse {
    Found(SearchOutcome),
    /// No usable lattice route; carries the expansions spent finding out.
    Inconclusive(usize),
}

pub(crate) fn search<S, O>(
    ps:       &PathSearch<S>,
    start:    Coord,
    goal:     Coord,
    observer: &mut O,
) -> SearchResult<SearchOutcome>
where
    S: Surface + ?Sized,
    O: SearchObserver + ?Sized,
{
    let config = ps.config();
    let limits = Limits::new(config.bfs_max_expansions, config);
    let step = config.grid_step.max(1);

    let mut spent = 0;
    if step > 1 {
        match coarse(ps, start, goal, step, limits, observer)? {
            Coarse::Found(outcome) => return Ok(outcome),
            Coarse::Inconclusive(expansions) => {
                debug!("bfs: no route on the {step}-cell lattice from {start} to {goal}, retrying at unit step");
                spent = expansions;
            }
        }
    }

    let mut bfs = BreadthSearch::resume(ps, start, goal, 1, limits, spent);
    match bfs.run(observer).clone() {
        BfsState::Found(meeting) => Ok(SearchOutcome {
            cells: bfs.path().unwrap_or_default(),
            strategy: SearchStrategy::Breadth,
            expansions: bfs.expansions(),
            meeting: Some(meeting),
            direct: false,
        }),
        other => Err(failure(other, start, goal, bfs.expansions())),
    }
}

/// Search the start's lattice, then join the snapped goal to the true goal
/// at unit step.
fn coarse<S, O>(
    ps:       &PathSearch<S>,
    start:    Coord,
    goal:     Coord,
    step:     i32,
    limits:   Limits,
    observer: &mut O,
) -> SearchResult<Coarse>
where
    S: Surface + ?Sized,
    O: SearchObserver + ?Sized,
{
    let snapped = snap_to_lattice(start, goal, step);
    if snapped != goal && !ps.validator().is_passable(snapped, ps.config().bfs_unknown) {
        return Ok(Coarse::Inconclusive(0));
    }

    let mut lattice = BreadthSearch::resume(ps, start, snapped, step, limits, 0);
    let meeting = match lattice.run(observer).clone() {
        BfsState::Found(meeting) => meeting,
        BfsState::Exhausted => return Ok(Coarse::Inconclusive(lattice.expansions())),
        other => return Err(failure(other, start, goal, lattice.expansions())),
    };
    let mut cells = lattice.path().unwrap_or_default();
    let mut expansions = lattice.expansions();

    if snapped != goal {
        let mut tail = BreadthSearch::resume(ps, snapped, goal, 1, limits, expansions);
        match tail.run(observer).clone() {
            BfsState::Found(_) => {
                // The tail may double back over the lattice route; cut the loop.
                for c in tail.path().unwrap_or_default().into_iter().skip(1) {
                    match cells.iter().position(|&x| x == c) {
                        Some(i) => cells.truncate(i + 1),
                        None => cells.push(c),
                    }
                }
                expansions = tail.expansions();
            }
            BfsState::Exhausted => return Ok(Coarse::Inconclusive(tail.expansions())),
            other => return Err(failure(other, start, goal, tail.expansions())),
        }
    }

    Ok(Coarse::Found(SearchOutcome {
        cells,
        strategy: SearchStrategy::Breadth,
        expansions,
        meeting: Some(meeting),
        direct: false,
    }))
}

fn failure(state: BfsState, start: Coord, goal: Coord, expansions: usize) -> SearchError {
    match state {
        BfsState::Exhausted => SearchError::NoPathExists { start, goal },
        BfsState::TimedOut { elapsed_ms, expansions } => SearchError::TimedOut { elapsed_ms, expansions },
        BfsState::BudgetExceeded { expansions } => SearchError::SearchBudgetExceeded { expansions },
        // Only terminal states reach here.
        BfsState::Found(_) | BfsState::Running => SearchError::SearchBudgetExceeded { expansions },
    }
}
