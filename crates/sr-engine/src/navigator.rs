//! The navigation service.

use std::path::Path as FsPath;
use std::sync::mpsc;
use std::sync::Arc;

use log::{debug, info};

use sr_cache::{CostCache, LoadReport};
use sr_core::{Bounds, Coord, NavConfig, Surface, WorldPoint};
use sr_routes::{Endpoint, RouteStore};
use sr_search::{
    Anchor, AnchorFinder, NoopSearchObserver, Path, PathOptimizer, PathSearch, SearchObserver,
};
use sr_terrain::{PathValidator, RegionObserver, RegionReport};

use crate::{Diagnostics, LogObserver, NavError, NavResult, PathRequest, PendingPath};

/// Owns the cost cache, the region observer, and every search component.
/// Built by [`NavigatorBuilder`](crate::NavigatorBuilder).
///
/// All methods take `&self`; share one navigator behind an `Arc` across
/// threads.
pub struct Navigator<S: Surface + ?Sized + 'static> {
    pub(crate) config:    NavConfig,
    pub(crate) surface:   Arc<S>,
    pub(crate) cache:     Arc<CostCache>,
    pub(crate) validator: Arc<PathValidator<S>>,
    pub(crate) observer:  RegionObserver<S>,
    pub(crate) search:    Arc<PathSearch<S>>,
    pub(crate) anchors:   AnchorFinder<S>,
    pub(crate) optimizer: PathOptimizer<S>,
    pub(crate) routes:    Option<Arc<RouteStore>>,
}

impl<S: Surface + ?Sized + 'static> Navigator<S> {
    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    #[inline]
    pub fn surface(&self) -> &Arc<S> {
        &self.surface
    }

    #[inline]
    pub fn cache(&self) -> &Arc<CostCache> {
        &self.cache
    }

    #[inline]
    pub fn validator(&self) -> &Arc<PathValidator<S>> {
        &self.validator
    }

    #[inline]
    pub fn region_observer(&self) -> &RegionObserver<S> {
        &self.observer
    }

    #[inline]
    pub fn anchor_finder(&self) -> &AnchorFinder<S> {
        &self.anchors
    }

    #[inline]
    pub fn optimizer(&self) -> &PathOptimizer<S> {
        &self.optimizer
    }

    pub fn route_store(&self) -> Option<&RouteStore> {
        self.routes.as_deref()
    }

    // ── Observation ───────────────────────────────────────────────────────

    /// Host signal: `region` can now be observed.  Classification runs in
    /// the background.
    pub fn on_region_observable(&self, region: Bounds) {
        self.observer.on_region_observable(region);
    }

    /// Classify `region` on the calling thread.
    pub fn populate_region(&self, region: Bounds) -> RegionReport {
        self.observer.populate(region)
    }

    // ── Path requests ─────────────────────────────────────────────────────

    /// Raw cell-centre path between two points with the default request.
    pub fn find_path(&self, start: WorldPoint, end: WorldPoint) -> NavResult<Path> {
        self.find_path_with(start, end, PathRequest::default())
    }

    pub fn find_path_with(&self, start: WorldPoint, end: WorldPoint, request: PathRequest) -> NavResult<Path> {
        run_request(&self.search, &self.config, start.cell(), end.cell(), request)
    }

    /// [`find_path`](Self::find_path) on the rayon pool.
    pub fn find_path_async(&self, start: WorldPoint, end: WorldPoint) -> PendingPath {
        self.find_path_async_with(start, end, PathRequest::default())
    }

    pub fn find_path_async_with(
        &self,
        start:   WorldPoint,
        end:     WorldPoint,
        request: PathRequest,
    ) -> PendingPath {
        let (tx, rx) = mpsc::channel();
        let search = Arc::clone(&self.search);
        let config = self.config.clone();
        rayon::spawn(move || {
            let result = run_request(&search, &config, start.cell(), end.cell(), request);
            // The caller may have stopped listening.
            let _ = tx.send(result);
        });
        PendingPath::new(rx)
    }

    /// Anchor both endpoints in open water, search between the anchors,
    /// simplify, and store the result when a route store is attached.
    pub fn plan_route(&self, from: &Endpoint, to: &Endpoint) -> NavResult<Path> {
        self.plan_route_with(from, to, PathRequest::default())
    }

    pub fn plan_route_with(&self, from: &Endpoint, to: &Endpoint, request: PathRequest) -> NavResult<Path> {
        let a = self.anchor_for(from)?;
        let b = self.anchor_for(to)?;
        debug!(
            "planning {} -> {} between anchors {} (score {}) and {} (score {})",
            from.name, to.name, a.cell, a.score, b.cell, b.score
        );

        let raw = run_request(&self.search, &self.config, a.cell, b.cell, request)?;
        let path = self.optimizer.simplify(&raw);
        info!(
            "route {} -> {}: {} waypoints ({} raw), {:.0} units",
            from.name,
            to.name,
            path.waypoint_count(),
            raw.waypoint_count(),
            path.distance()
        );

        if let Some(store) = &self.routes {
            store.save(&from.name, &to.name, path.points())?;
        }
        Ok(path)
    }

    /// Stored route between two endpoint names, oriented `from → to`.
    pub fn stored_route(&self, from: &str, to: &str) -> Option<Path> {
        self.routes
            .as_ref()?
            .load(from, to)?
            .oriented_path(from, to, self.config.travel_speed)
    }

    fn anchor_for(&self, endpoint: &Endpoint) -> NavResult<Anchor> {
        let cell = endpoint
            .navigation_cell()
            .ok_or_else(|| NavError::MissingNavigationPoint(endpoint.name.clone()))?;
        self.anchors
            .find_anchor(cell, self.config.anchor.max_radius)
            .ok_or_else(|| NavError::NoAnchor { endpoint: endpoint.name.clone(), at: cell })
    }

    // ── Diagnostics and persistence ───────────────────────────────────────

    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            cache:           self.cache.stats(),
            observer:        self.observer.totals(),
            pending_regions: self.observer.pending(),
            stored_routes:   self.routes.as_ref().map_or(0, |r| r.len()),
        }
    }

    /// Percentage of sampled cells in the box spanned by `a` and `b` that
    /// are cached, at the configured coverage stride.
    pub fn coverage_between(&self, a: Coord, b: Coord) -> f64 {
        let bounds = Bounds::new(a, b);
        self.cache.coverage_percent(bounds.min, bounds.max, self.config.coverage_stride)
    }

    pub fn save_cache(&self, path: &FsPath) -> NavResult<usize> {
        Ok(self.cache.save(path)?)
    }

    /// Merge a saved cache into the live one.  Live entries win.
    pub fn load_cache(&self, path: &FsPath) -> NavResult<LoadReport> {
        Ok(self.cache.load(path)?)
    }
}

/// One search plus conversion to a world-space path.  Shared by the
/// blocking and the background entry points.
fn run_request<S: Surface + ?Sized>(
    search:  &PathSearch<S>,
    config:  &NavConfig,
    start:   Coord,
    goal:    Coord,
    request: PathRequest,
) -> NavResult<Path> {
    let strategy = request
        .strategy
        .resolve(start.distance(goal), config.search.auto_breadth_range);
    let mut observer: Box<dyn SearchObserver> = if request.debug {
        Box::new(LogObserver)
    } else {
        Box::new(NoopSearchObserver)
    };
    let outcome = search.find_observed(start, goal, strategy, observer.as_mut())?;
    Ok(Path::from_cells(&outcome.cells, config.elevation_y(), config.travel_speed))
}
