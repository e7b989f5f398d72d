//! Grid coordinates and world-space points.
//!
//! The navigable surface is a 2D grid of integer cells.  A [`Coord`] packs
//! into a single `u64` (x in the high 32 bits, z in the low 32 bits) so the
//! cost cache can key its maps on one integer.  [`WorldPoint`] is the
//! fractional position used in finished paths; cell centres sit at
//! `coord + 0.5`.

use std::fmt;

/// The eight compass directions, clockwise from north.
///
/// Shared by neighbour expansion, long-range isolation sampling, and the
/// anchor scorer so all three agree on direction order.
pub const COMPASS: [(i32, i32); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

// ── Coord ─────────────────────────────────────────────────────────────────────

/// An integer grid cell on the horizontal plane.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    pub x: i32,
    pub z: i32,
}

impl Coord {
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Pack into a 64-bit key.  Negative values keep their two's-complement
    /// bit pattern so `unpack(pack(c)) == c` for every `i32` pair.
    #[inline(always)]
    pub const fn pack(self) -> u64 {
        ((self.x as u32 as u64) << 32) | (self.z as u32 as u64)
    }

    #[inline(always)]
    pub const fn unpack(key: u64) -> Self {
        Self {
            x: (key >> 32) as u32 as i32,
            z: key as u32 as i32,
        }
    }

    /// The cell `(dx, dz)` away.  Saturates at the `i32` edges.
    #[inline]
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            z: self.z.saturating_add(dz),
        }
    }

    /// Euclidean distance between cell indices.
    #[inline]
    pub fn distance(self, other: Coord) -> f64 {
        let dx = other.x as f64 - self.x as f64;
        let dz = other.z as f64 - self.z as f64;
        (dx * dx + dz * dz).sqrt()
    }

    #[inline]
    pub fn manhattan(self, other: Coord) -> u64 {
        (self.x as i64 - other.x as i64).unsigned_abs()
            + (self.z as i64 - other.z as i64).unsigned_abs()
    }

    /// Ring distance: the largest of the axis deltas.
    #[inline]
    pub fn chebyshev(self, other: Coord) -> u64 {
        let dx = (self.x as i64 - other.x as i64).unsigned_abs();
        let dz = (self.z as i64 - other.z as i64).unsigned_abs();
        dx.max(dz)
    }

    /// World-space centre of this cell at the given elevation.
    #[inline]
    pub fn center(self, elevation: f64) -> WorldPoint {
        WorldPoint::new(self.x as f64 + 0.5, elevation, self.z as f64 + 0.5)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

// ── WorldPoint ────────────────────────────────────────────────────────────────

/// A fractional world-space position.  `y` is the vertical axis and is held
/// at the reference elevation for every point the engine produces.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl WorldPoint {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The grid cell containing this point.
    #[inline]
    pub fn cell(self) -> Coord {
        Coord::new(self.x.floor() as i32, self.z.floor() as i32)
    }

    pub fn distance(self, other: WorldPoint) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Horizontal distance, ignoring `y`.
    pub fn distance_xz(self, other: WorldPoint) -> f64 {
        let dx = other.x - self.x;
        let dz = other.z - self.z;
        (dx * dx + dz * dz).sqrt()
    }

    /// Linear interpolation; `t = 0` is `self`, `t = 1` is `other`.
    #[inline]
    pub fn lerp(self, other: WorldPoint, t: f64) -> WorldPoint {
        WorldPoint {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    #[inline]
    pub fn midpoint(self, other: WorldPoint) -> WorldPoint {
        self.lerp(other, 0.5)
    }
}

impl fmt::Display for WorldPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

// ── Bounds ────────────────────────────────────────────────────────────────────

/// An inclusive axis-aligned rectangle of cells.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub min: Coord,
    pub max: Coord,
}

impl Bounds {
    /// Build from any two opposite corners.
    pub fn new(a: Coord, b: Coord) -> Self {
        Self {
            min: Coord::new(a.x.min(b.x), a.z.min(b.z)),
            max: Coord::new(a.x.max(b.x), a.z.max(b.z)),
        }
    }

    /// The square of half-width `radius` centred on `center`.
    pub fn around(center: Coord, radius: i32) -> Self {
        let r = radius.max(0);
        Self::new(center.offset(-r, -r), center.offset(r, r))
    }

    /// The 16×16 column of cells with chunk index `(cx, cz)`.
    pub fn chunk(cx: i32, cz: i32) -> Self {
        let min = Coord::new(cx.saturating_mul(16), cz.saturating_mul(16));
        Self::new(min, min.offset(15, 15))
    }

    #[inline]
    pub fn contains(&self, c: Coord) -> bool {
        c.x >= self.min.x && c.x <= self.max.x && c.z >= self.min.z && c.z <= self.max.z
    }

    #[inline]
    pub fn width(&self) -> u64 {
        (self.max.x as i64 - self.min.x as i64 + 1) as u64
    }

    #[inline]
    pub fn depth(&self) -> u64 {
        (self.max.z as i64 - self.min.z as i64 + 1) as u64
    }

    /// Number of cells covered.
    #[inline]
    pub fn area(&self) -> u64 {
        self.width() * self.depth()
    }

    /// Every cell, row by row (z outer, x inner).
    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        (self.min.z..=self.max.z)
            .flat_map(move |z| (self.min.x..=self.max.x).map(move |x| Coord::new(x, z)))
    }

    /// Cells on a lattice of spacing `stride`, anchored at `min`.
    pub fn sample(&self, stride: i32) -> impl Iterator<Item = Coord> + '_ {
        let step = stride.max(1) as usize;
        (self.min.z..=self.max.z).step_by(step).flat_map(move |z| {
            (self.min.x..=self.max.x)
                .step_by(step)
                .map(move |x| Coord::new(x, z))
        })
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} .. {}]", self.min, self.max)
    }
}
