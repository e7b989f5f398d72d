//! Tests for path search, anchor discovery, and path optimization.

#[cfg(test)]
mod fixtures {
    use std::sync::Arc;

    use sr_cache::CostCache;
    use sr_core::{Bounds, Coord, GridSurface, NavConfig, SearchConfig};
    use sr_terrain::PathValidator;

    use crate::PathSearch;

    pub fn validator(surface: GridSurface) -> Arc<PathValidator<GridSurface>> {
        Arc::new(PathValidator::new(
            Arc::new(CostCache::new()),
            Arc::new(surface),
            &NavConfig::default(),
        ))
    }

    pub fn searcher(surface: GridSurface, config: SearchConfig) -> PathSearch<GridSurface> {
        PathSearch::new(validator(surface), config)
    }

    /// A 50-wide east-west channel (z = 0..=49) from x = 0 to x = 130,
    /// with land on both banks.
    pub fn channel() -> GridSurface {
        let mut s = GridSurface::land(Bounds::new(Coord::new(-5, -5), Coord::new(135, 54)));
        s.fill_water(Bounds::new(Coord::new(0, 0), Coord::new(130, 49)), 8);
        s
    }

    /// Open water split by a solid north-south wall at x = 60..=61.
    pub fn walled() -> GridSurface {
        let mut s = GridSurface::water(Bounds::new(Coord::new(0, 0), Coord::new(120, 60)), 8);
        s.fill_land(Bounds::new(Coord::new(60, 0), Coord::new(61, 60)));
        s
    }

    /// Two water blocks that touch only at a diagonal corner.
    pub fn corner() -> GridSurface {
        let map = "
            ~~~~#####
            ~~~~#####
            ~~~~#####
            ~~~~#####
            ####~~~~~
            ####~~~~~
            ####~~~~~
            ####~~~~~
        ";
        match GridSurface::from_ascii(Coord::new(0, 0), map) {
            Ok(s) => s,
            Err(e) => panic!("fixture map: {e}"),
        }
    }

    /// Sea over z < 120, land from z = 120 on, and a 3-wide inlet at
    /// x = 99..=101 running inland to z = 150.
    pub fn inlet() -> GridSurface {
        let mut s = GridSurface::land(Bounds::new(Coord::new(0, 0), Coord::new(200, 170)));
        s.fill_water(Bounds::new(Coord::new(0, 0), Coord::new(200, 119)), 8);
        s.fill_water(Bounds::new(Coord::new(99, 120), Coord::new(101, 150)), 8);
        s
    }

    /// A 5×5 pond surrounded by land.
    pub fn pond() -> GridSurface {
        let mut s = GridSurface::land(Bounds::new(Coord::new(0, 0), Coord::new(200, 200)));
        s.fill_water(Bounds::around(Coord::new(100, 100), 2), 8);
        s
    }
}

#[cfg(test)]
mod search {
    use sr_core::{Bounds, Coord, GridSurface, SearchConfig, UnknownCells};

    use super::fixtures::{channel, corner, searcher, walled};
    use crate::{EndpointSide, SearchError, SearchObserver, SearchOutcome, SearchStrategy};

    const BOTH: [SearchStrategy; 2] = [SearchStrategy::Breadth, SearchStrategy::Weighted];

    fn assert_connected(cells: &[Coord], step: u64) {
        for w in cells.windows(2) {
            assert!(w[0] != w[1], "repeated cell {}", w[0]);
            assert!(w[0].chebyshev(w[1]) <= step, "{} -> {} is not a single step", w[0], w[1]);
        }
    }

    #[test]
    fn channel_is_crossed_by_both_strategies() {
        let ps = searcher(channel(), SearchConfig::default());
        let (start, goal) = (Coord::new(10, 25), Coord::new(110, 25));
        for strategy in BOTH {
            let out = ps.find(start, goal, strategy).unwrap();
            assert_eq!(out.strategy, strategy);
            assert!(!out.direct);
            assert!(out.meeting.is_some());
            assert_eq!(out.cells.first(), Some(&start));
            assert_eq!(out.cells.last(), Some(&goal));
            assert_connected(&out.cells, 1);
            assert!(out.cells.iter().all(|&c| ps.validator().is_traversable(c)));
            // Never shorter than the straight-line cell count.
            assert!(out.cells.len() >= 101, "{strategy}: {} cells", out.cells.len());
        }
    }

    #[test]
    fn wall_means_no_path() {
        let ps = searcher(walled(), SearchConfig::default());
        let (start, goal) = (Coord::new(10, 30), Coord::new(110, 30));
        for strategy in BOTH {
            let err = ps.find(start, goal, strategy).unwrap_err();
            assert_eq!(err, SearchError::NoPathExists { start, goal }, "{strategy}");
            assert!(!err.is_retryable());
        }
    }

    #[test]
    fn nearby_clear_endpoints_take_the_direct_segment() {
        let ps = searcher(channel(), SearchConfig::default());
        let (start, goal) = (Coord::new(10, 25), Coord::new(20, 25));
        for strategy in BOTH {
            let out = ps.find(start, goal, strategy).unwrap();
            assert!(out.direct);
            assert_eq!(out.cells, vec![start, goal]);
            assert_eq!(out.expansions, 0);
            assert_eq!(out.meeting, None);
        }
    }

    #[test]
    fn identical_endpoints() {
        let ps = searcher(channel(), SearchConfig::default());
        let at = Coord::new(40, 20);
        let out = ps.find(at, at, SearchStrategy::Weighted).unwrap();
        assert_eq!(out.cells, vec![at]);
    }

    #[test]
    fn land_endpoints_are_rejected() {
        let ps = searcher(channel(), SearchConfig::default());
        let water = Coord::new(10, 25);
        let land = Coord::new(10, 52);
        for strategy in BOTH {
            assert_eq!(
                ps.find(land, water, strategy).unwrap_err(),
                SearchError::EndpointNotTraversable { side: EndpointSide::Start, at: land }
            );
            assert_eq!(
                ps.find(water, land, strategy).unwrap_err(),
                SearchError::EndpointNotTraversable { side: EndpointSide::Goal, at: land }
            );
        }
    }

    #[test]
    fn tiny_budget_gives_up() {
        let config = SearchConfig {
            bfs_max_expansions: 10,
            astar_max_expansions: 10,
            ..SearchConfig::default()
        };
        let ps = searcher(channel(), config);
        for strategy in BOTH {
            let err = ps.find(Coord::new(10, 25), Coord::new(110, 25), strategy).unwrap_err();
            assert_eq!(err, SearchError::SearchBudgetExceeded { expansions: 10 });
            assert!(err.is_retryable());
        }
    }

    #[test]
    fn diagonal_pinch_needs_corner_cutting() {
        let (start, goal) = (Coord::new(0, 0), Coord::new(8, 7));
        for strategy in BOTH {
            let strict = searcher(corner(), SearchConfig::default());
            assert!(matches!(
                strict.find(start, goal, strategy),
                Err(SearchError::NoPathExists { .. })
            ));

            let loose = searcher(
                corner(),
                SearchConfig { allow_corner_cutting: true, ..SearchConfig::default() },
            );
            let out = loose.find(start, goal, strategy).unwrap();
            assert!(!out.direct);
            assert!(out.cells.contains(&Coord::new(3, 3)));
            assert!(out.cells.contains(&Coord::new(4, 4)));
        }
    }

    #[test]
    fn unknown_water_is_crossed_only_optimistically() {
        let mut s = GridSurface::water(Bounds::new(Coord::new(0, 0), Coord::new(60, 10)), 8);
        s.fill_land(Bounds::new(Coord::new(0, 0), Coord::new(60, 0)));
        s.fill_land(Bounds::new(Coord::new(0, 10), Coord::new(60, 10)));
        s.hide(Bounds::new(Coord::new(28, 0), Coord::new(32, 10)));
        let ps = searcher(s, SearchConfig::default());
        let (start, goal) = (Coord::new(5, 5), Coord::new(55, 5));

        assert!(matches!(
            ps.find(start, goal, SearchStrategy::Breadth),
            Err(SearchError::NoPathExists { .. })
        ));
        let out = ps.find(start, goal, SearchStrategy::Weighted).unwrap();
        assert!(out.cells.iter().any(|c| c.x == 30));
    }

    #[test]
    fn coarse_grid_step_still_ends_at_goal() {
        let config = SearchConfig { grid_step: 2, ..SearchConfig::default() };
        let ps = searcher(channel(), config);
        let (start, goal) = (Coord::new(10, 25), Coord::new(111, 26));
        let out = ps.find(start, goal, SearchStrategy::Breadth).unwrap();
        assert_eq!(out.cells.first(), Some(&start));
        assert_eq!(out.cells.last(), Some(&goal));
        assert_connected(&out.cells, 2);
        // Everything but the joining tail lies on the start's lattice.
        let lattice = &out.cells[..out.cells.len() - 1];
        assert!(lattice.iter().all(|c| (c.x - start.x) % 2 == 0 && (c.z - start.z) % 2 == 0));
    }

    /// Every cell on every hop, including cells jumped over, is water.
    fn assert_afloat(ps: &crate::PathSearch<GridSurface>, cells: &[Coord]) {
        for w in cells.windows(2) {
            let (a, b) = (w[0], w[1]);
            let n = a.chebyshev(b) as i32;
            let (dx, dz) = ((b.x - a.x) / n.max(1), (b.z - a.z) / n.max(1));
            for i in 0..=n {
                let c = a.offset(dx * i, dz * i);
                assert!(ps.validator().is_traversable(c), "hop {a} -> {b} crosses land at {c}");
            }
        }
    }

    #[test]
    fn coarse_step_joins_a_walled_off_goal_over_water() {
        // Land at x = 41 and x = 43 for z <= 30; the goal sits between them,
        // so its lattice neighbour (44, 20) is a short hop away through land.
        let mut s = GridSurface::water(Bounds::new(Coord::new(0, 0), Coord::new(80, 40)), 8);
        s.fill_land(Bounds::new(Coord::new(41, 0), Coord::new(41, 30)));
        s.fill_land(Bounds::new(Coord::new(43, 0), Coord::new(43, 30)));
        let config = SearchConfig { grid_step: 4, ..SearchConfig::default() };
        let ps = searcher(s, config);
        let (start, goal) = (Coord::new(0, 20), Coord::new(42, 20));

        let out = ps.find(start, goal, SearchStrategy::Breadth).unwrap();
        assert_eq!(out.cells.first(), Some(&start));
        assert_eq!(out.cells.last(), Some(&goal));
        assert_afloat(&ps, &out.cells);
        let mut seen = std::collections::HashSet::new();
        assert!(out.cells.iter().all(|c| seen.insert(*c)), "path revisits a cell");
        // The only way into the gap is round the top of the walls.
        assert!(out.cells.iter().any(|c| c.x == 42 && c.z > 30));
    }

    #[test]
    fn coarse_step_falls_back_for_narrow_passages() {
        // Two basins joined by a 1-wide channel on an odd row: a 2-cell
        // lattice rooted on an even row can never enter it.
        let basins = || {
            let mut s = GridSurface::land(Bounds::new(Coord::new(-1, -1), Coord::new(61, 21)));
            s.fill_water(Bounds::new(Coord::new(0, 0), Coord::new(20, 20)), 8);
            s.fill_water(Bounds::new(Coord::new(40, 0), Coord::new(60, 20)), 8);
            s.fill_water(Bounds::new(Coord::new(21, 11), Coord::new(39, 11)), 8);
            s
        };
        let (start, goal) = (Coord::new(2, 2), Coord::new(58, 2));

        for grid_step in [1, 2] {
            let config = SearchConfig { grid_step, ..SearchConfig::default() };
            let ps = searcher(basins(), config);
            let out = ps.find(start, goal, SearchStrategy::Breadth).unwrap();
            assert_eq!(out.cells.last(), Some(&goal));
            assert!(out.cells.iter().any(|c| c.z == 11 && c.x == 30));
            assert_afloat(&ps, &out.cells);
        }
    }

    #[derive(Default)]
    struct Recorder {
        started:  usize,
        progress: Vec<usize>,
        found:    Option<SearchOutcome>,
        failed:   Option<SearchError>,
    }

    impl SearchObserver for Recorder {
        fn on_start(&mut self, _s: SearchStrategy, _start: Coord, _goal: Coord) {
            self.started += 1;
        }

        fn on_progress(&mut self, _s: SearchStrategy, expansions: usize, _f: usize, _b: usize) {
            self.progress.push(expansions);
        }

        fn on_found(&mut self, outcome: &SearchOutcome) {
            self.found = Some(outcome.clone());
        }

        fn on_failed(&mut self, _s: SearchStrategy, error: &SearchError) {
            self.failed = Some(error.clone());
        }
    }

    #[test]
    fn observer_sees_progress_and_result() {
        let config = SearchConfig { progress_interval: 100, ..SearchConfig::default() };
        let ps = searcher(channel(), config);
        for strategy in BOTH {
            let mut rec = Recorder::default();
            let out = ps
                .find_observed(Coord::new(10, 25), Coord::new(110, 25), strategy, &mut rec)
                .unwrap();
            assert_eq!(rec.started, 1);
            assert!(!rec.progress.is_empty(), "{strategy}");
            assert!(rec.progress.iter().all(|e| e % 100 == 0));
            assert!(rec.progress.windows(2).all(|w| w[0] < w[1]));
            assert_eq!(rec.found, Some(out));
            assert!(rec.failed.is_none());
        }
    }

    #[test]
    fn observer_sees_failure() {
        let ps = searcher(walled(), SearchConfig::default());
        let mut rec = Recorder::default();
        let _ = ps.find_observed(
            Coord::new(10, 30),
            Coord::new(110, 30),
            SearchStrategy::Breadth,
            &mut rec,
        );
        assert!(matches!(rec.failed, Some(SearchError::NoPathExists { .. })));
        assert!(rec.found.is_none());
    }

    #[test]
    fn strategy_names_and_swap() {
        assert_eq!(SearchStrategy::Breadth.to_string(), "bfs");
        assert_eq!(SearchStrategy::Weighted.to_string(), "a*");
        assert_eq!(SearchStrategy::Breadth.other(), SearchStrategy::Weighted);
        assert_eq!(SearchStrategy::Weighted.other(), SearchStrategy::Breadth);
    }

    #[test]
    fn unknown_policy_is_per_strategy() {
        let c = SearchConfig::default();
        assert_eq!(c.bfs_unknown, UnknownCells::Blocked);
        assert_eq!(c.astar_unknown, UnknownCells::Optimistic);
    }
}

#[cfg(test)]
mod breadth {
    use sr_core::{Coord, SearchConfig};

    use super::fixtures::{channel, searcher, walled};
    use crate::breadth::snap_to_lattice;
    use crate::{BfsState, BreadthSearch, NoopSearchObserver};

    #[test]
    fn advances_level_by_level_to_found() {
        let ps = searcher(channel(), SearchConfig::default());
        let mut bfs = BreadthSearch::new(&ps, Coord::new(10, 25), Coord::new(110, 25), 1);
        assert_eq!(bfs.state(), &BfsState::Running);
        assert!(bfs.path().is_none());

        bfs.advance(&mut NoopSearchObserver);
        assert_eq!(bfs.state(), &BfsState::Running);
        let after_one = bfs.expansions();
        assert!(after_one >= 2);

        let state = bfs.run(&mut NoopSearchObserver).clone();
        assert!(matches!(state, BfsState::Found(_)));
        assert!(bfs.expansions() > after_one);
        let cells = bfs.path().unwrap();
        assert_eq!(cells.first(), Some(&Coord::new(10, 25)));
        assert_eq!(cells.last(), Some(&Coord::new(110, 25)));

        // Terminal states are sticky.
        let expansions = bfs.expansions();
        bfs.advance(&mut NoopSearchObserver);
        assert_eq!(bfs.expansions(), expansions);
    }

    #[test]
    fn separated_bodies_exhaust() {
        let ps = searcher(walled(), SearchConfig::default());
        let mut bfs = BreadthSearch::new(&ps, Coord::new(10, 30), Coord::new(110, 30), 1);
        assert_eq!(bfs.run(&mut NoopSearchObserver), &BfsState::Exhausted);
        assert!(bfs.path().is_none());
    }

    #[test]
    fn budget_state() {
        let config = SearchConfig { bfs_max_expansions: 5, ..SearchConfig::default() };
        let ps = searcher(channel(), config);
        let mut bfs = BreadthSearch::new(&ps, Coord::new(10, 25), Coord::new(110, 25), 1);
        assert_eq!(bfs.run(&mut NoopSearchObserver), &BfsState::BudgetExceeded { expansions: 5 });
    }

    #[test]
    fn lattice_snapping() {
        let start = Coord::new(10, 25);
        assert_eq!(snap_to_lattice(start, Coord::new(110, 25), 2), Coord::new(110, 25));
        assert_eq!(snap_to_lattice(start, Coord::new(111, 26), 2), Coord::new(112, 27));
        assert_eq!(snap_to_lattice(start, Coord::new(13, 25), 4), Coord::new(14, 25));
        assert_eq!(snap_to_lattice(start, Coord::new(7, 20), 3), Coord::new(7, 19));
        assert_eq!(snap_to_lattice(start, Coord::new(42, -9), 1), Coord::new(42, -9));
    }
}

#[cfg(test)]
mod anchor {
    use sr_core::{AnchorConfig, Coord};

    use super::fixtures::{channel, inlet, pond, validator};
    use crate::AnchorFinder;

    #[test]
    fn open_sea_scores_full_marks_and_anchors_in_place() {
        let finder = AnchorFinder::new(validator(inlet()), AnchorConfig::default());
        let sea = Coord::new(100, 50);
        assert_eq!(finder.navigability_score(sea), 100);
        let anchor = finder.find_anchor(sea, 50).unwrap();
        assert_eq!(anchor.cell, sea);
        assert_eq!(anchor.score, 100);
    }

    #[test]
    fn land_scores_zero() {
        let finder = AnchorFinder::new(validator(inlet()), AnchorConfig::default());
        assert_eq!(finder.navigability_score(Coord::new(50, 150)), 0);
    }

    #[test]
    fn inlet_endpoint_moves_out_to_sea() {
        let v = validator(inlet());
        let finder = AnchorFinder::new(v.clone(), AnchorConfig::default());
        let nominal = Coord::new(100, 145);
        let here = finder.navigability_score(nominal);
        assert!(here < 60, "inlet scored {here}");

        let anchor = finder.find_anchor(nominal, 50).unwrap();
        assert!(anchor.score >= 60);
        assert!(anchor.score > here);
        assert!(anchor.cell.chebyshev(nominal) <= 50);
        assert!(v.is_traversable(anchor.cell));
        assert_eq!(anchor.point, anchor.cell.center(62.0));
    }

    #[test]
    fn enclosed_pond_has_no_anchor() {
        let finder = AnchorFinder::new(validator(pond()), AnchorConfig::default());
        let centre = Coord::new(100, 100);
        assert!(finder.navigability_score(centre) < 60);
        assert!(finder.find_anchor(centre, 50).is_none());
    }

    #[test]
    fn open_water_direction() {
        let finder = AnchorFinder::new(validator(inlet()), AnchorConfig::default());
        // The inlet opens northwards (towards smaller z).
        assert_eq!(finder.direction_to_open_water(Coord::new(100, 145)), Some((0, -1)));

        let pond_finder = AnchorFinder::new(validator(pond()), AnchorConfig::default());
        assert_eq!(pond_finder.direction_to_open_water(Coord::new(100, 100)), None);
    }

    #[test]
    fn narrow_channel_scores_between() {
        // 50-wide channel: plenty of area and reach but some shore in view.
        let finder = AnchorFinder::new(validator(channel()), AnchorConfig::default());
        let mid = finder.navigability_score(Coord::new(60, 25));
        let edge = finder.navigability_score(Coord::new(60, 1));
        assert_eq!(mid, 100);
        assert!(edge < mid);
    }
}

#[cfg(test)]
mod optimizer {
    use sr_core::{Bounds, Coord, OptimizerConfig, SearchConfig, WorldPoint};

    use super::fixtures::{channel, validator, walled};
    use crate::optimizer::turn_angle_deg;
    use crate::{Path, PathOptimizer, PathSearch, SearchStrategy};

    const Y: f64 = 62.0;

    fn pt(x: f64, z: f64) -> WorldPoint {
        WorldPoint::new(x, Y, z)
    }

    fn is_subsequence(sub: &[WorldPoint], of: &[WorldPoint]) -> bool {
        let mut it = of.iter();
        sub.iter().all(|p| it.any(|q| q == p))
    }

    #[test]
    fn straight_run_collapses_to_endpoints() {
        let v = validator(channel());
        let cells: Vec<Coord> = (10..=60).map(|x| Coord::new(x, 25)).collect();
        let raw = Path::from_cells(&cells, Y, 7.0);
        let opt = PathOptimizer::new(v, OptimizerConfig::default());
        let simple = opt.simplify(&raw);
        assert_eq!(simple.points(), &[raw.start().unwrap(), raw.end().unwrap()]);
        assert!((simple.distance() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn detour_keeps_line_of_sight_between_waypoints() {
        let mut surface = walled();
        // Open a gap at the far end of the wall.
        surface.fill_water(Bounds::new(Coord::new(60, 50), Coord::new(61, 60)), 8);
        let v = validator(surface);
        let ps = PathSearch::new(v.clone(), SearchConfig::default());
        let out = ps.find(Coord::new(40, 5), Coord::new(80, 5), SearchStrategy::Breadth).unwrap();
        let raw = Path::from_cells(&out.cells, Y, 7.0);

        let config = OptimizerConfig::default();
        let simple = PathOptimizer::new(v.clone(), config.clone()).simplify(&raw);
        assert!(simple.waypoint_count() >= 3, "the wall forces at least one turn");
        assert!(simple.waypoint_count() < raw.waypoint_count());
        assert_eq!(simple.start(), raw.start());
        assert_eq!(simple.end(), raw.end());
        assert!(is_subsequence(simple.points(), raw.points()));
        for w in simple.points().windows(2) {
            assert!(v.has_line_of_sight(w[0], w[1], config.los_step));
        }
        assert!(simple.distance() <= raw.distance());
    }

    #[test]
    fn smoothing_widens_sharp_turns_only() {
        let opt = PathOptimizer::new(validator(channel()), OptimizerConfig::default());

        let square = Path::new(vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0)], 7.0);
        let smooth = opt.smooth(&square);
        assert_eq!(
            smooth.points(),
            &[pt(0.0, 0.0), pt(5.0, 0.0), pt(10.0, 0.0), pt(10.0, 5.0), pt(10.0, 10.0)]
        );

        let gentle = Path::new(vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(20.0, 2.0)], 7.0);
        assert_eq!(opt.smooth(&gentle), gentle);
    }

    #[test]
    fn decimation_keeps_every_nth_and_both_ends() {
        let opt = PathOptimizer::new(validator(channel()), OptimizerConfig::default());
        let raw = Path::new((0..10).map(|i| pt(i as f64, 0.0)).collect(), 7.0);
        let xs: Vec<f64> = opt.decimate(&raw, 3).points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 3.0, 6.0, 9.0]);

        let xs: Vec<f64> = opt.decimate(&raw, 4).points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 4.0, 8.0, 9.0]);

        assert_eq!(opt.decimate(&raw, 1), raw);
    }

    #[test]
    fn turn_angles() {
        let a = pt(0.0, 0.0);
        let b = pt(10.0, 0.0);
        assert!((turn_angle_deg(a, b, pt(20.0, 0.0))).abs() < 1e-9);
        assert!((turn_angle_deg(a, b, pt(10.0, 10.0)) - 90.0).abs() < 1e-9);
        assert!((turn_angle_deg(a, b, pt(10.0, -10.0)) + 90.0).abs() < 1e-9);
        assert!((turn_angle_deg(a, b, pt(0.0, 0.0)).abs() - 180.0).abs() < 1e-9);
    }
}

#[cfg(test)]
mod path {
    use std::time::Duration;

    use sr_core::{Coord, WorldPoint};

    use crate::Path;

    #[test]
    fn metrics() {
        let p = Path::new(
            vec![WorldPoint::new(0.0, 62.0, 0.0), WorldPoint::new(3.0, 62.0, 4.0), WorldPoint::new(3.0, 62.0, 18.0)],
            7.0,
        );
        assert_eq!(p.waypoint_count(), 3);
        assert!((p.distance() - 19.0).abs() < 1e-9);
        assert!((p.estimated_secs() - 19.0 / 7.0).abs() < 1e-9);

        let rev = p.reversed();
        assert_eq!(rev.start(), p.end());
        assert_eq!(rev.end(), p.start());
        assert!((rev.distance() - p.distance()).abs() < 1e-9);
    }

    #[test]
    fn from_cells_uses_centres() {
        let p = Path::from_cells(&[Coord::new(0, 0), Coord::new(7, 0)], 62.0, 7.0);
        assert_eq!(p.start(), Some(WorldPoint::new(0.5, 62.0, 0.5)));
        assert_eq!(p.estimated_time(), Duration::from_secs(1));
    }

    #[test]
    fn empty_and_stationary() {
        let empty = Path::new(Vec::new(), 7.0);
        assert!(empty.is_empty());
        assert_eq!(empty.distance(), 0.0);
        assert_eq!(empty.start(), None);

        let parked = Path::new(vec![WorldPoint::new(1.0, 62.0, 1.0); 2], 0.0);
        assert_eq!(parked.estimated_secs(), 0.0);
    }
}

#[cfg(test)]
mod errors {
    use sr_core::Coord;

    use crate::{EndpointSide, SearchError};

    #[test]
    fn reasons_and_retry() {
        let no_path = SearchError::NoPathExists { start: Coord::new(0, 0), goal: Coord::new(1, 1) };
        assert_eq!(no_path.reason(), "no water route possible");
        assert!(!no_path.is_retryable());

        for e in [
            SearchError::SearchBudgetExceeded { expansions: 10 },
            SearchError::TimedOut { elapsed_ms: 5, expansions: 10 },
        ] {
            assert!(e.is_retryable());
            assert_eq!(e.reason(), "search gave up: try again later or use the other strategy");
        }

        let land = SearchError::EndpointNotTraversable { side: EndpointSide::Goal, at: Coord::new(3, 4) };
        assert!(land.to_string().starts_with("goal"));
        assert!(!land.is_retryable());
    }
}
