//! Background cache population.
//!
//! When the host reports that a region has become observable (a chunk loaded,
//! a sensor sweep finished), [`RegionObserver::on_region_observable`] queues a
//! task on the Rayon global pool that classifies every not-yet-cached cell
//! in the region.  The caller's thread does no per-cell work.
//!
//! Population is additive: cached cells are skipped, and writes use
//! `put_if_absent`, so overlapping or repeated signals are cheap and never
//! overwrite a record a search already wrote back.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::{debug, info};
use parking_lot::{Condvar, Mutex};

use sr_cache::{CellRecord, CostCache};
use sr_core::{Bounds, Surface};

use crate::CostModel;

/// Regions between progress log lines.
const LOG_EVERY_REGIONS: u64 = 10;

/// Result of populating one region.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RegionReport {
    /// Cells inspected (cached, unobservable, and new).
    pub scanned: u64,
    /// Cells written to the cache.
    pub added:   u64,
}

/// Cumulative counters since the observer was created.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ObserverTotals {
    pub regions: u64,
    pub cells:   u64,
}

struct Shared<S: ?Sized> {
    cache:   Arc<CostCache>,
    surface: Arc<S>,
    model:   CostModel,
    pending: Mutex<usize>,
    idle:    Condvar,
    regions: AtomicU64,
    cells:   AtomicU64,
}

/// Fills the cost cache from observable regions off the caller's thread.
///
/// Cheap to clone; clones share the queue and counters.
pub struct RegionObserver<S: Surface + ?Sized + 'static> {
    shared: Arc<Shared<S>>,
}

impl<S: Surface + ?Sized + 'static> Clone for RegionObserver<S> {
    fn clone(&self) -> Self {
        Self { shared: Arc::clone(&self.shared) }
    }
}

impl<S: Surface + ?Sized + 'static> RegionObserver<S> {
    pub fn new(cache: Arc<CostCache>, surface: Arc<S>, model: CostModel) -> Self {
        Self {
            shared: Arc::new(Shared {
                cache,
                surface,
                model,
                pending: Mutex::new(0),
                idle:    Condvar::new(),
                regions: AtomicU64::new(0),
                cells:   AtomicU64::new(0),
            }),
        }
    }

    /// Queue background population of `region`.  Returns immediately.
    pub fn on_region_observable(&self, region: Bounds) {
        *self.shared.pending.lock() += 1;
        let shared = Arc::clone(&self.shared);
        rayon::spawn(move || {
            shared.populate(region);
            let mut pending = shared.pending.lock();
            *pending -= 1;
            if *pending == 0 {
                shared.idle.notify_all();
            }
        });
    }

    /// Populate `region` on the current thread.
    pub fn populate(&self, region: Bounds) -> RegionReport {
        self.shared.populate(region)
    }

    /// Block until every queued region has been processed.
    pub fn wait_idle(&self) {
        let mut pending = self.shared.pending.lock();
        while *pending > 0 {
            self.shared.idle.wait(&mut pending);
        }
    }

    /// Regions queued but not yet finished.
    pub fn pending(&self) -> usize {
        *self.shared.pending.lock()
    }

    pub fn totals(&self) -> ObserverTotals {
        ObserverTotals {
            regions: self.shared.regions.load(Ordering::Relaxed),
            cells:   self.shared.cells.load(Ordering::Relaxed),
        }
    }
}

impl<S: Surface + ?Sized> Shared<S> {
    fn populate(&self, region: Bounds) -> RegionReport {
        let elevation = self.model.elevation();
        let surface = &*self.surface;
        let mut report = RegionReport::default();

        for at in region.cells() {
            report.scanned += 1;
            if self.cache.contains(at) || !surface.is_observable(at) {
                continue;
            }
            let traversable = surface.is_traversable(at, elevation);
            let cost = self.model.compute_cost(at, traversable, &self.cache, surface);
            if self.cache.put_if_absent(at, CellRecord::new(traversable, cost)) {
                report.added += 1;
            }
        }

        let regions = self.regions.fetch_add(1, Ordering::Relaxed) + 1;
        let cells = self.cells.fetch_add(report.added, Ordering::Relaxed) + report.added;
        debug!("region {region}: {} of {} cells added", report.added, report.scanned);
        if regions % LOG_EVERY_REGIONS == 0 {
            info!("region observer: {regions} regions processed, {cells} cells cached");
        }
        report
    }
}
