//! `sr-engine` — the navigation service a host embeds.
//!
//! # Request flow
//!
//! ```text
//! host ──on_region_observable(bounds)──► RegionObserver ──(rayon)──► CostCache
//!
//! find_path(start, end)
//!   ① cells   — world points to grid cells
//!   ② choose  — Auto: breadth-first up to auto_breadth_range, else weighted
//!   ③ search  — PathSearch (endpoint checks, direct probe, bidirectional)
//!   ④ path    — cell centres at the reference elevation
//!
//! plan_route(from, to)
//!   ① anchor  — move each navigation point to open water (AnchorFinder)
//!   ② search  — as above, between the anchors
//!   ③ simplify — PathOptimizer line-of-sight reduction
//!   ④ store   — RouteStore, when one is attached
//! ```
//!
//! The engine never retries on its own: a budget failure comes back as a
//! retryable [`NavError`] and the caller decides what to do next.
//!
//! | Module            | Contents                                            |
//! |-------------------|-----------------------------------------------------|
//! | [`navigator`]     | `Navigator`: the service object                     |
//! | [`builder`]       | `NavigatorBuilder`                                  |
//! | [`request`]       | `PathRequest`, `StrategyChoice`                     |
//! | [`pending`]       | `PendingPath`: handle to a background search        |
//! | [`observer`]      | `LogObserver`                                       |
//! | [`diagnostics`]   | `Diagnostics` snapshot                              |
//! | [`error`]         | `NavError`, `NavResult`                             |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sr_core::{GridSurface, NavConfig, WorldPoint};
//! use sr_engine::NavigatorBuilder;
//!
//! let nav = NavigatorBuilder::new(NavConfig::default(), Arc::new(world)).build()?;
//! nav.on_region_observable(bounds);
//! let path = nav.find_path(WorldPoint::new(10.5, 62.0, 4.5), WorldPoint::new(300.5, 62.0, -80.5))?;
//! ```

pub mod builder;
pub mod diagnostics;
pub mod error;
pub mod navigator;
pub mod observer;
pub mod pending;
pub mod request;

#[cfg(test)]
mod tests;

pub use builder::NavigatorBuilder;
pub use diagnostics::Diagnostics;
pub use error::{NavError, NavResult};
pub use navigator::Navigator;
pub use observer::LogObserver;
pub use pending::PendingPath;
pub use request::{PathRequest, StrategyChoice};

pub use sr_search::{NoopSearchObserver, SearchObserver};
