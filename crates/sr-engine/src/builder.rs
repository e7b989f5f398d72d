//! Fluent builder for constructing a [`Navigator`].

use std::sync::Arc;

use sr_cache::CostCache;
use sr_core::{NavConfig, Surface};
use sr_routes::RouteStore;
use sr_search::{AnchorFinder, PathOptimizer, PathSearch};
use sr_terrain::{PathValidator, RegionObserver};

use crate::{NavResult, Navigator};

/// Fluent builder for [`Navigator<S>`].
///
/// # Required inputs
///
/// - [`NavConfig`]: costs, search budgets, anchor and optimizer tuning
/// - `Arc<S: Surface>`: the host world
///
/// # Optional inputs (have defaults)
///
/// | Method               | Default                              |
/// |----------------------|--------------------------------------|
/// | `.cache(c)`          | A fresh, empty `CostCache`           |
/// | `.route_store(s)`    | None: planned routes are not stored  |
///
/// # Example
///
/// ```rust,ignore
/// let nav = NavigatorBuilder::new(NavConfig::default(), Arc::new(world))
///     .cache(Arc::new(cache))
///     .route_store(RouteStore::open("routes.csv")?)
///     .build()?;
/// let path = nav.find_path(start, end)?;
/// ```
pub struct NavigatorBuilder<S: Surface + ?Sized + 'static> {
    config:  NavConfig,
    surface: Arc<S>,
    cache:   Option<Arc<CostCache>>,
    routes:  Option<Arc<RouteStore>>,
}

impl<S: Surface + ?Sized + 'static> NavigatorBuilder<S> {
    pub fn new(config: NavConfig, surface: Arc<S>) -> Self {
        Self { config, surface, cache: None, routes: None }
    }

    /// Share an existing (possibly pre-loaded) cost cache.
    pub fn cache(mut self, cache: Arc<CostCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Store every planned route here.
    pub fn route_store(mut self, store: impl Into<Arc<RouteStore>>) -> Self {
        self.routes = Some(store.into());
        self
    }

    /// Validate the configuration and wire the components together.
    pub fn build(self) -> NavResult<Navigator<S>> {
        self.config.validate()?;

        let cache = self.cache.unwrap_or_else(|| Arc::new(CostCache::new()));
        let validator = Arc::new(PathValidator::new(
            Arc::clone(&cache),
            Arc::clone(&self.surface),
            &self.config,
        ));
        let observer = RegionObserver::new(
            Arc::clone(&cache),
            Arc::clone(&self.surface),
            validator.model().clone(),
        );

        Ok(Navigator {
            search:    Arc::new(PathSearch::new(Arc::clone(&validator), self.config.search.clone())),
            anchors:   AnchorFinder::new(Arc::clone(&validator), self.config.anchor.clone()),
            optimizer: PathOptimizer::new(Arc::clone(&validator), self.config.optimizer.clone()),
            observer,
            validator,
            cache,
            surface:   self.surface,
            routes:    self.routes,
            config:    self.config,
        })
    }
}
