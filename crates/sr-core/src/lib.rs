//! `sr-core` — foundational types for the `searoute` routing engine.
//!
//! Every other `sr-*` crate depends on this one.  It has no `sr-*`
//! dependencies and only `thiserror` externally (plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`coord`]       | `Coord` (packed grid cell), `WorldPoint`, `Bounds`    |
//! | [`config`]      | `NavConfig` and its per-component sections            |
//! | [`surface`]     | `Surface` host trait, in-memory `GridSurface`         |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to coordinates and config.  |

pub mod config;
pub mod coord;
pub mod error;
pub mod surface;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{
    AnchorConfig, CostConfig, NavConfig, OptimizerConfig, SearchConfig, UnknownCells,
    IMPASSABLE_COST, LEGACY_TRAVERSABLE_COST,
};
pub use coord::{Bounds, Coord, WorldPoint, COMPASS};
pub use error::{CoreError, CoreResult};
pub use surface::{GridSurface, Surface};
