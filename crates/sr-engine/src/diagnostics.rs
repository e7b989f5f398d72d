use std::fmt;

use sr_cache::CacheStats;
use sr_terrain::ObserverTotals;

/// Point-in-time engine health snapshot.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Diagnostics {
    pub cache:           CacheStats,
    pub observer:        ObserverTotals,
    /// Regions queued with the observer but not yet classified.
    pub pending_regions: usize,
    /// Routes held by the route store; 0 without one.
    pub stored_routes:   usize,
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.cache;
        write!(
            f,
            "cache: {} cells ({} water), {:.1}% hit rate, ~{} KiB | observer: {} regions, {} cells, {} pending | routes: {}",
            c.records,
            c.traversable,
            c.hit_rate,
            c.memory_bytes / 1024,
            self.observer.regions,
            self.observer.cells,
            self.pending_regions,
            self.stored_routes
        )
    }
}
