//! Search progress hooks.

use sr_core::Coord;

use crate::{SearchError, SearchOutcome, SearchStrategy};

/// Callbacks invoked by [`PathSearch`][crate::PathSearch] while it runs.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — expansion counter
///
/// ```rust,ignore
/// struct Counter(usize);
///
/// impl SearchObserver for Counter {
///     fn on_progress(&mut self, _s: SearchStrategy, expansions: usize, _f: usize, _b: usize) {
///         self.0 = expansions;
///     }
/// }
/// ```
pub trait SearchObserver {
    /// Called once the endpoints have passed validation.
    fn on_start(&mut self, _strategy: SearchStrategy, _start: Coord, _goal: Coord) {}

    /// Called every `progress_interval` expansions with the current frontier
    /// sizes of the forward and backward sides.
    fn on_progress(
        &mut self,
        _strategy:   SearchStrategy,
        _expansions: usize,
        _forward:    usize,
        _backward:   usize,
    ) {}

    fn on_found(&mut self, _outcome: &SearchOutcome) {}

    fn on_failed(&mut self, _strategy: SearchStrategy, _error: &SearchError) {}
}

/// A [`SearchObserver`] that does nothing.
pub struct NoopSearchObserver;

impl SearchObserver for NoopSearchObserver {}
