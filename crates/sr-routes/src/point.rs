//! Text form of a world point.
//!
//! `world;x;y;z` with two decimals, e.g. `overworld;104.50;62.00;-31.50`.
//! The world tag is informational: points are parsed regardless of which
//! world they name, and a bare `x;y;z` is accepted too.

use sr_core::WorldPoint;

use crate::{RouteResult, RouteStoreError};

/// Separator between the parts of one point.
pub const PART_SEPARATOR: char = ';';

/// Separator between points in a route's `path` column.
pub const POINT_SEPARATOR: char = '|';

pub fn format_point(world: &str, p: WorldPoint) -> String {
    format!("{world};{:.2};{:.2};{:.2}", p.x, p.y, p.z)
}

pub fn parse_point(s: &str) -> RouteResult<WorldPoint> {
    let parts: Vec<&str> = s.trim().split(PART_SEPARATOR).collect();
    let coords = match parts.len() {
        4 => &parts[1..],
        3 => &parts[..],
        n => {
            return Err(RouteStoreError::CorruptPersistedData(format!(
                "point {s:?} has {n} parts, expected 3 or 4"
            )));
        }
    };
    let num = |v: &str| {
        v.trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .ok_or_else(|| RouteStoreError::CorruptPersistedData(format!("bad number {v:?} in point {s:?}")))
    };
    Ok(WorldPoint::new(num(coords[0])?, num(coords[1])?, num(coords[2])?))
}

/// `|`-joined list of formatted points.
pub fn format_points(world: &str, points: &[WorldPoint]) -> String {
    let mut out = String::with_capacity(points.len() * 32);
    for (i, &p) in points.iter().enumerate() {
        if i > 0 {
            out.push(POINT_SEPARATOR);
        }
        out.push_str(&format_point(world, p));
    }
    out
}
