//! Seeded synthetic archipelago.
//!
//! ```text
//!  z=0 ┌──────────────────────────────────────────┐
//!      │  ~  ~  ●  ~  ~  ~  ●●  ~  ~  ~  ~ │▓▓▓▓▓ │
//!      │  ~  ●●  ~  ~  ~  ~  ~  ~  ●  ~  ~ │▓▓▓▓▓ │
//!      │  ~  ~  ~  ~  ●  ~  ~  ~  ~  ~  ~  ════H  │  inlet to the harbour
//!      │  ~  ~  ●●●  ~  ~  ~  ~  ●  ~  ~  ~ │▓▓▓▓▓ │
//!      │  ~  ~  ~  ~  ~  ~  ~  ~  ~  ~  ●  ~│▓▓▓▓▓ │
//!  z=383└──────────────────────────────────────────┘
//!      x=0                         x=340 mainland  x=383
//! ```
//!
//! Islands are discs of land ringed by a shallow shelf.  The mainland
//! occupies x ≥ 340 and is cut by a 3-wide inlet leading to the harbour.
//! Discs of open water are carved around every listed mooring so each
//! endpoint is guaranteed to be afloat.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use sr_core::{Bounds, Coord, GridSurface};

pub const WORLD_SIZE: i32 = 384;
pub const MAINLAND_X: i32 = 340;
pub const INLET_Z:    i32 = 190;

const ISLANDS:     usize = 45;
const DEEP:        u8    = 9;
const SHELF:       u8    = 2;
const SHELF_WIDTH: i32   = 3;
const MOORING_CLEARANCE: i32 = 8;

pub fn world_bounds() -> Bounds {
    Bounds::new(Coord::new(0, 0), Coord::new(WORLD_SIZE - 1, WORLD_SIZE - 1))
}

/// Build the archipelago.  `moorings` are kept in open water.
pub fn build_archipelago(seed: u64, moorings: &[Coord]) -> GridSurface {
    let bounds = world_bounds();
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut surface = GridSurface::water(bounds, DEEP);

    for _ in 0..ISLANDS {
        let centre = Coord::new(rng.gen_range(10..MAINLAND_X - 20), rng.gen_range(10..WORLD_SIZE - 10));
        let radius = rng.gen_range(4..18);
        disc(&mut surface, centre, radius + SHELF_WIDTH, SHELF);
        disc(&mut surface, centre, radius, 0);
    }

    surface.fill_land(Bounds::new(Coord::new(MAINLAND_X, 0), bounds.max));
    surface.fill_water(
        Bounds::new(Coord::new(MAINLAND_X, INLET_Z - 1), Coord::new(WORLD_SIZE - 10, INLET_Z + 1)),
        DEEP,
    );

    for &m in moorings {
        if m.x < MAINLAND_X {
            disc(&mut surface, m, MOORING_CLEARANCE, DEEP);
        }
    }
    surface
}

fn disc(surface: &mut GridSurface, centre: Coord, radius: i32, depth: u8) {
    let r2 = (radius as i64) * (radius as i64);
    for c in Bounds::around(centre, radius).cells() {
        let dx = (c.x - centre.x) as i64;
        let dz = (c.z - centre.z) as i64;
        if dx * dx + dz * dz <= r2 {
            surface.set_depth(c, depth);
        }
    }
}
