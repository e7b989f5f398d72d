//! Search observers provided by the engine.

use log::{debug, info, warn};

use sr_core::Coord;
use sr_search::{SearchError, SearchObserver, SearchOutcome, SearchStrategy};

/// Writes every search event to the `log` facade.  Used for requests with
/// the debug flag set.
#[derive(Copy, Clone, Debug, Default)]
pub struct LogObserver;

impl SearchObserver for LogObserver {
    fn on_start(&mut self, strategy: SearchStrategy, start: Coord, goal: Coord) {
        info!("{strategy}: searching {start} -> {goal}");
    }

    fn on_progress(&mut self, strategy: SearchStrategy, expansions: usize, forward: usize, backward: usize) {
        debug!("{strategy}: {expansions} expansions, frontiers {forward}/{backward}");
    }

    fn on_found(&mut self, outcome: &SearchOutcome) {
        match outcome.meeting {
            Some(m) => info!(
                "{}: found {} cells after {} expansions, met at {m}",
                outcome.strategy,
                outcome.cells.len(),
                outcome.expansions
            ),
            None => info!("{}: found {} cells without searching", outcome.strategy, outcome.cells.len()),
        }
    }

    fn on_failed(&mut self, strategy: SearchStrategy, error: &SearchError) {
        warn!("{strategy}: {error}");
    }
}
