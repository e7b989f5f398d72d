//! Tests for the navigator service.

#[cfg(test)]
mod fixtures {
    use std::sync::Arc;

    use sr_core::{Bounds, Coord, GridSurface, NavConfig};
    use sr_routes::RouteStore;

    use crate::{Navigator, NavigatorBuilder};

    pub const Y: f64 = 62.0;

    /// Sea over z < 120 (x = 0..=200), land beyond, and a 3-wide inlet at
    /// x = 99..=101 reaching inland to z = 150.
    pub fn harbor() -> GridSurface {
        let mut s = GridSurface::land(Bounds::new(Coord::new(0, 0), Coord::new(200, 170)));
        s.fill_water(Bounds::new(Coord::new(0, 0), Coord::new(200, 119)), 8);
        s.fill_water(Bounds::new(Coord::new(99, 120), Coord::new(101, 150)), 8);
        s
    }

    /// A 5×5 pond with no way out.
    pub fn pond() -> GridSurface {
        let mut s = GridSurface::land(Bounds::new(Coord::new(0, 0), Coord::new(200, 200)));
        s.fill_water(Bounds::around(Coord::new(100, 100), 2), 8);
        s
    }

    pub fn navigator(surface: GridSurface) -> Navigator<GridSurface> {
        match NavigatorBuilder::new(NavConfig::default(), Arc::new(surface)).build() {
            Ok(n) => n,
            Err(e) => panic!("default navigator: {e}"),
        }
    }

    pub fn navigator_with_store(surface: GridSurface) -> Navigator<GridSurface> {
        match NavigatorBuilder::new(NavConfig::default(), Arc::new(surface))
            .route_store(RouteStore::in_memory())
            .build()
        {
            Ok(n) => n,
            Err(e) => panic!("navigator with store: {e}"),
        }
    }
}

#[cfg(test)]
mod builder {
    use std::sync::Arc;

    use sr_cache::CostCache;
    use sr_core::{Coord, NavConfig, SearchConfig};

    use super::fixtures::harbor;
    use crate::{NavError, NavigatorBuilder};

    #[test]
    fn invalid_config_is_rejected() {
        let config = NavConfig {
            search: SearchConfig { grid_step: 0, ..SearchConfig::default() },
            ..NavConfig::default()
        };
        let err = NavigatorBuilder::new(config, Arc::new(harbor())).build().err().unwrap();
        assert!(matches!(err, NavError::Config(_)));
        assert_eq!(err.reason(), "invalid navigator configuration");
    }

    #[test]
    fn shares_a_supplied_cache() {
        let cache = Arc::new(CostCache::new());
        cache.put(Coord::new(-50, -50), true, 1);
        let nav = NavigatorBuilder::new(NavConfig::default(), Arc::new(harbor()))
            .cache(Arc::clone(&cache))
            .build()
            .unwrap();
        assert!(Arc::ptr_eq(nav.cache(), &cache));
        assert!(nav.validator().is_traversable(Coord::new(-50, -50)));
        assert!(nav.route_store().is_none());
    }
}

#[cfg(test)]
mod requests {
    use std::sync::mpsc;
    use std::time::Duration;

    use sr_core::{Coord, WorldPoint};
    use sr_search::{EndpointSide, SearchError, SearchStrategy};

    use super::fixtures::{harbor, navigator, Y};
    use crate::{NavError, PathRequest, PendingPath, StrategyChoice};

    fn p(x: f64, z: f64) -> WorldPoint {
        WorldPoint::new(x, Y, z)
    }

    #[test]
    fn auto_picks_by_separation() {
        assert_eq!(StrategyChoice::Auto.resolve(400.0, 400.0), SearchStrategy::Breadth);
        assert_eq!(StrategyChoice::Auto.resolve(400.1, 400.0), SearchStrategy::Weighted);
        assert_eq!(StrategyChoice::Breadth.resolve(1e9, 400.0), SearchStrategy::Breadth);
        assert_eq!(StrategyChoice::Weighted.resolve(1.0, 400.0), SearchStrategy::Weighted);
        assert_eq!(PathRequest::default().strategy, StrategyChoice::Auto);
        assert!(!PathRequest::default().debug);
    }

    #[test]
    fn open_water_path() {
        let nav = navigator(harbor());
        let path = nav.find_path(p(10.2, 10.7), p(80.5, 60.5)).unwrap();
        assert_eq!(path.start(), Some(Coord::new(10, 10).center(Y)));
        assert_eq!(path.end(), Some(Coord::new(80, 60).center(Y)));
        assert!(path.distance() >= Coord::new(10, 10).distance(Coord::new(80, 60)) - 1e-9);
        assert!(path.points().iter().all(|q| q.y == Y));
        assert!(path.estimated_secs() > 0.0);
    }

    #[test]
    fn explicit_weighted_with_logging() {
        let nav = navigator(harbor());
        let req = PathRequest::new(SearchStrategy::Weighted).debug(true);
        let path = nav.find_path_with(p(10.5, 10.5), p(80.5, 60.5), req).unwrap();
        assert_eq!(path.end(), Some(p(80.5, 60.5)));
    }

    #[test]
    fn land_endpoint() {
        let nav = navigator(harbor());
        let err = nav.find_path(p(10.5, 10.5), p(50.5, 160.5)).unwrap_err();
        assert!(matches!(
            err,
            NavError::Search(SearchError::EndpointNotTraversable { side: EndpointSide::Goal, .. })
        ));
        assert!(!err.is_retryable());
    }

    #[test]
    fn background_request_matches_blocking_one() {
        let nav = navigator(harbor());
        let (a, b) = (p(10.5, 10.5), p(80.5, 60.5));
        let pending = nav.find_path_async(a, b);
        let background = pending.wait_timeout(Duration::from_secs(60)).unwrap().unwrap();
        let blocking = nav.find_path(a, b).unwrap();
        assert_eq!(background, blocking);
    }

    #[test]
    fn background_failure_is_delivered() {
        let nav = navigator(harbor());
        let result = nav.find_path_async(p(50.5, 160.5), p(10.5, 10.5)).wait();
        assert!(matches!(result, Err(NavError::Search(_))));
    }

    #[test]
    fn lost_worker_is_reported() {
        let (tx, rx) = mpsc::channel();
        let pending = PendingPath::new(rx);
        assert!(pending.try_get().is_none());
        assert!(pending.wait_timeout(Duration::from_millis(1)).is_none());
        drop(tx);
        let err = pending.wait().unwrap_err();
        assert!(matches!(err, NavError::WorkerLost));
        assert!(err.is_retryable());
        assert_eq!(err.reason(), "internal error: see the log for details");
    }
}

#[cfg(test)]
mod routes {
    use sr_core::WorldPoint;
    use sr_routes::Endpoint;

    use super::fixtures::{harbor, navigator, navigator_with_store, pond, Y};
    use crate::NavError;

    fn endpoint(name: &str, x: f64, z: f64) -> Endpoint {
        Endpoint::new(name).with_navigation_point(WorldPoint::new(x, Y, z))
    }

    #[test]
    fn planned_route_is_simplified_and_stored() {
        let nav = navigator_with_store(harbor());
        let inlet = endpoint("inlet", 100.5, 145.5);
        let sea = endpoint("sea", 40.5, 30.5);

        let path = nav.plan_route(&inlet, &sea).unwrap();
        assert!(path.waypoint_count() >= 2);
        // The inlet endpoint is moved out to open water first.
        let start = path.start().unwrap().cell();
        assert!(nav.anchor_finder().navigability_score(start) >= 60);
        // Sea endpoint is already navigable and is used as is.
        assert_eq!(path.end(), Some(WorldPoint::new(40.5, Y, 30.5)));

        let stored = nav.stored_route("inlet", "sea").unwrap();
        assert_eq!(stored.points(), path.points());
        let back = nav.stored_route("sea", "inlet").unwrap();
        assert_eq!(back.start(), path.end());
        assert_eq!(back.end(), path.start());
        assert_eq!(nav.diagnostics().stored_routes, 1);
    }

    #[test]
    fn no_store_means_nothing_is_stored() {
        let nav = navigator(harbor());
        nav.plan_route(&endpoint("a", 40.5, 30.5), &endpoint("b", 150.5, 90.5)).unwrap();
        assert!(nav.stored_route("a", "b").is_none());
    }

    #[test]
    fn endpoint_without_navigation_point() {
        let nav = navigator(harbor());
        let err = nav.plan_route(&Endpoint::new("bare"), &endpoint("sea", 40.5, 30.5)).unwrap_err();
        assert!(matches!(err, NavError::MissingNavigationPoint(ref n) if n == "bare"));
        assert_eq!(err.reason(), "endpoint has no navigation point set");
    }

    #[test]
    fn landlocked_endpoint_has_no_anchor() {
        let nav = navigator(pond());
        let err = nav
            .plan_route(&endpoint("pond", 100.5, 100.5), &endpoint("pond2", 101.5, 101.5))
            .unwrap_err();
        assert!(matches!(err, NavError::NoAnchor { ref endpoint, .. } if endpoint == "pond"));
    }
}

#[cfg(test)]
mod diagnostics {
    use sr_core::{Bounds, Coord};

    use super::fixtures::{harbor, navigator};

    #[test]
    fn background_observation_fills_the_cache() {
        let nav = navigator(harbor());
        let region = Bounds::new(Coord::new(0, 0), Coord::new(63, 63));
        assert_eq!(nav.coverage_between(region.min, region.max), 0.0);

        nav.on_region_observable(region);
        nav.on_region_observable(Bounds::chunk(5, 5));
        nav.region_observer().wait_idle();

        let d = nav.diagnostics();
        assert_eq!(d.pending_regions, 0);
        assert_eq!(d.observer.regions, 2);
        assert!(d.cache.records >= region.area());
        assert_eq!(d.stored_routes, 0);
        assert_eq!(nav.coverage_between(region.max, region.min), 100.0);
        assert!(d.to_string().contains("routes: 0"));
    }

    #[test]
    fn cache_survives_a_restart() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("cache.csv");

        let first = navigator(harbor());
        first.populate_region(Bounds::new(Coord::new(0, 0), Coord::new(31, 31)));
        let saved = first.save_cache(&file).unwrap();
        assert_eq!(saved as u64, first.diagnostics().cache.records);

        let second = navigator(harbor());
        let report = second.load_cache(&file).unwrap();
        assert_eq!(report.loaded, saved);
        assert_eq!(report.added, saved);
        assert_eq!(second.coverage_between(Coord::new(0, 0), Coord::new(31, 31)), 100.0);
    }
}
