//! Unit tests for sr-core primitives.

#[cfg(test)]
mod coord {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use crate::{Bounds, Coord, WorldPoint};

    #[test]
    fn pack_roundtrip_extremes() {
        for &(x, z) in &[
            (0, 0),
            (-1, -1),
            (i32::MIN, i32::MAX),
            (i32::MAX, i32::MIN),
            (-30_000_000, 29_999_999),
        ] {
            let c = Coord::new(x, z);
            assert_eq!(Coord::unpack(c.pack()), c, "({x}, {z})");
        }
    }

    #[test]
    fn pack_roundtrip_random() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let c = Coord::new(rng.r#gen(), rng.r#gen());
            assert_eq!(Coord::unpack(c.pack()), c);
        }
    }

    #[test]
    fn pack_layout_high_x_low_z() {
        assert_eq!(Coord::new(1, 2).pack(), (1u64 << 32) | 2);
        assert_eq!(Coord::new(0, -1).pack(), 0xFFFF_FFFF);
        assert_ne!(Coord::new(1, 0).pack(), Coord::new(0, 1).pack());
    }

    #[test]
    fn distances() {
        let a = Coord::new(0, 0);
        let b = Coord::new(3, -4);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(a.manhattan(b), 7);
        assert_eq!(a.chebyshev(b), 4);
    }

    #[test]
    fn center_and_cell() {
        let p = Coord::new(-3, 7).center(62.0);
        assert_eq!(p, WorldPoint::new(-2.5, 62.0, 7.5));
        assert_eq!(p.cell(), Coord::new(-3, 7));
    }

    #[test]
    fn bounds_normalise_and_iterate() {
        let b = Bounds::new(Coord::new(2, 5), Coord::new(0, 3));
        assert_eq!(b.min, Coord::new(0, 3));
        assert_eq!(b.max, Coord::new(2, 5));
        assert_eq!(b.area(), 9);
        assert_eq!(b.cells().count(), 9);
        assert!(b.cells().all(|c| b.contains(c)));
        assert_eq!(b.sample(2).count(), 4);
    }

    #[test]
    fn chunk_bounds() {
        let b = Bounds::chunk(-1, 2);
        assert_eq!(b.min, Coord::new(-16, 32));
        assert_eq!(b.max, Coord::new(-1, 47));
    }
}

#[cfg(test)]
mod config {
    use crate::{CoreError, NavConfig};

    #[test]
    fn defaults_validate() {
        NavConfig::default().validate().unwrap();
    }

    #[test]
    fn defaults_match_tuned_constants() {
        let c = NavConfig::default();
        assert_eq!(c.reference_elevation, 62);
        assert_eq!(c.cost.probe_radius, 5);
        assert_eq!(c.search.bfs_max_expansions, 50_000);
        assert_eq!(c.anchor.qualify_score, 60);
        assert!((c.travel_speed - 7.0).abs() < 1e-9);
    }

    #[test]
    fn dead_end_floor_must_stay_below_impassable() {
        let mut c = NavConfig::default();
        c.cost.dead_end_floor = 100;
        assert!(matches!(c.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn shore_costs_must_stay_below_impassable() {
        let mut c = NavConfig::default();
        c.cost.shore_step_cost = 30;
        assert!(c.validate().is_err());
    }

    #[test]
    fn zero_grid_step_rejected() {
        let mut c = NavConfig::default();
        c.search.grid_step = 0;
        assert!(c.validate().is_err());
    }
}

#[cfg(test)]
mod surface {
    use crate::{Bounds, Coord, GridSurface, Surface};

    #[test]
    fn ascii_map_parses() {
        let s = GridSurface::from_ascii(
            Coord::new(10, 20),
            "
            ~~#
            ,?#
            ",
        )
        .unwrap();
        assert_eq!(s.bounds().min, Coord::new(10, 20));
        assert_eq!(s.bounds().max, Coord::new(12, 21));
        assert!(s.is_traversable(Coord::new(10, 20), 62));
        assert!(!s.is_traversable(Coord::new(12, 20), 62));
        assert_eq!(s.depth(Coord::new(10, 21), 62, 10), 1);
        assert!(!s.is_observable(Coord::new(11, 21)));
        assert_eq!(s.water_cells(), 4);
    }

    #[test]
    fn ragged_map_rejected() {
        assert!(GridSurface::from_ascii(Coord::new(0, 0), "~~\n~").is_err());
        assert!(GridSurface::from_ascii(Coord::new(0, 0), "~x").is_err());
    }

    #[test]
    fn outside_is_observable_land() {
        let s = GridSurface::water(Bounds::new(Coord::new(0, 0), Coord::new(3, 3)), 4);
        let out = Coord::new(-1, 0);
        assert!(s.is_observable(out));
        assert!(!s.is_traversable(out, 62));
        assert_eq!(s.depth(out, 62, 10), 0);
    }

    #[test]
    fn reveal_through_shared_reference() {
        let mut s = GridSurface::water(Bounds::new(Coord::new(0, 0), Coord::new(9, 9)), 4);
        let region = Bounds::new(Coord::new(2, 2), Coord::new(4, 4));
        s.hide(region);
        assert!(!s.is_observable(Coord::new(3, 3)));

        let shared = std::sync::Arc::new(s);
        shared.reveal(region);
        assert!(shared.is_observable(Coord::new(3, 3)));
    }

    #[test]
    fn depth_is_capped() {
        let s = GridSurface::water(Bounds::new(Coord::new(0, 0), Coord::new(1, 1)), 30);
        assert_eq!(s.depth(Coord::new(0, 0), 62, 10), 10);
    }
}
