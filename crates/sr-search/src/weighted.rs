//! Bidirectional cost-weighted A*.
//!
//! Each side keeps a binary heap ordered by `f = g + h` (ties go to the
//! smaller `h`, i.e. the node closer to its target), a closed set, a best-`g`
//! map, and a parent map.  Decrease-key is lazy: an improved `g` pushes a new
//! heap entry and stale entries are skipped when popped.
//!
//! Moving into a cell costs its Euclidean step length (1 or √2) plus
//! `cell_cost_weight × cell cost`.  `h` is the Manhattan distance to the
//! opposite endpoint.
//!
//! The sides alternate one pop at a time.  They meet when a side pops a node
//! the other side has already closed.  A side whose heap empties has closed
//! its whole reachable region without meeting, so no path exists.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::f64::consts::SQRT_2;

use rustc_hash::{FxHashMap, FxHashSet};

use sr_core::{Coord, Surface, COMPASS};

use crate::search::{reconstruct, LimitHit, Limits};
use crate::{PathSearch, SearchError, SearchObserver, SearchOutcome, SearchResult, SearchStrategy};

// ── Heap entry ────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug)]
struct OpenNode {
    f:  f64,
    h:  f64,
    g:  f64,
    at: Coord,
}

impl Ord for OpenNode {
    /// `BinaryHeap` is a max-heap: the smallest `f` (then smallest `h`) must
    /// compare greatest.  The coordinate makes the order total and
    /// deterministic.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.h.total_cmp(&self.h))
            .then_with(|| other.at.cmp(&self.at))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

// ── Side ──────────────────────────────────────────────────────────────────────

struct Side {
    open:    BinaryHeap<OpenNode>,
    closed:  FxHashSet<Coord>,
    best_g:  FxHashMap<Coord, f64>,
    parents: FxHashMap<Coord, Coord>,
    target:  Coord,
}

impl Side {
    fn new(root: Coord, target: Coord) -> Self {
        let h = root.manhattan(target) as f64;
        let mut open = BinaryHeap::new();
        open.push(OpenNode { f: h, h, g: 0.0, at: root });
        let mut best_g = FxHashMap::default();
        best_g.insert(root, 0.0);
        let mut parents = FxHashMap::default();
        parents.insert(root, root);
        Self { open, closed: FxHashSet::default(), best_g, parents, target }
    }

    /// Next non-stale entry.
    fn pop(&mut self) -> Option<OpenNode> {
        while let Some(node) = self.open.pop() {
            if self.closed.contains(&node.at) {
                continue;
            }
            if self.best_g.get(&node.at).is_some_and(|&g| node.g > g) {
                continue;
            }
            return Some(node);
        }
        None
    }
}

enum Expanded {
    Continue,
    Meet(Coord),
    Exhausted,
    Limit(LimitHit),
}

// ── Search ────────────────────────────────────────────────────────────────────

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
    let limits = Limits::new(config.astar_max_expansions, config);
    let mut forward = Side::new(start, goal);
    let mut backward = Side::new(goal, start);
    let mut expansions = 0usize;

    loop {
        for is_forward in [true, false] {
            let (side, other) = if is_forward {
                (&mut forward, &backward)
            } else {
                (&mut backward, &forward)
            };
            match expand_one(ps, side, other, &mut expansions, &limits) {
                Expanded::Continue => {}
                Expanded::Meet(meeting) => {
                    return Ok(SearchOutcome {
                        cells: reconstruct(meeting, &forward.parents, &backward.parents),
                        strategy: SearchStrategy::Weighted,
                        expansions,
                        meeting: Some(meeting),
                        direct: false,
                    });
                }
                Expanded::Exhausted => return Err(SearchError::NoPathExists { start, goal }),
                Expanded::Limit(hit) => return Err(hit.into_error()),
            }
            if limits.report_due(expansions) {
                observer.on_progress(
                    SearchStrategy::Weighted,
                    expansions,
                    forward.open.len(),
                    backward.open.len(),
                );
            }
        }
    }
}

fn expand_one<S: Surface + ?Sized>(
    ps:         &PathSearch<S>,
    side:       &mut Side,
    other:      &Side,
    expansions: &mut usize,
    limits:     &Limits,
) -> Expanded {
    let Some(node) = side.pop() else {
        return Expanded::Exhausted;
    };
    if other.closed.contains(&node.at) {
        return Expanded::Meet(node.at);
    }
    side.closed.insert(node.at);

    *expansions += 1;
    if let Some(hit) = limits.check(*expansions) {
        return Expanded::Limit(hit);
    }

    let config = ps.config();
    let validator = ps.validator();
    let unknown = config.astar_unknown;

    for &(dx, dz) in &COMPASS {
        let n = node.at.offset(dx, dz);
        if side.closed.contains(&n) {
            continue;
        }
        let Some(cost) = validator.traversal_cost(n, unknown) else {
            continue;
        };
        if !ps.step_allowed(node.at, dx, dz, 1, unknown) {
            continue;
        }
        let length = if dx != 0 && dz != 0 { SQRT_2 } else { 1.0 };
        let g = node.g + length + config.cell_cost_weight * cost as f64;
        if side.best_g.get(&n).is_none_or(|&best| g < best) {
            side.best_g.insert(n, g);
            side.parents.insert(n, node.at);
            let h = n.manhattan(side.target) as f64;
            side.open.push(OpenNode { f: g + h, h, g, at: n });
        }
    }
    Expanded::Continue
}
