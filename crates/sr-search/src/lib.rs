//! `sr-search` — finding, anchoring, and cleaning up water paths.
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`search`]      | `PathSearch`, `SearchStrategy`, `SearchOutcome`       |
//! | [`breadth`]     | Bidirectional breadth-first state machine             |
//! | [`weighted`]    | Bidirectional cost-weighted A*                        |
//! | [`anchor`]      | `AnchorFinder`: navigability scoring and spiral scan  |
//! | [`optimizer`]   | `PathOptimizer`: simplify, smooth, decimate           |
//! | [`path`]        | Immutable `Path` of world points                      |
//! | [`observer`]    | `SearchObserver` progress hooks                       |
//! | [`error`]       | `SearchError`, `SearchResult`                         |
//!
//! # Strategies
//!
//! Both strategies share the validator, endpoint checks, the direct-segment
//! shortcut, and parent-map reconstruction.  They differ in frontier order
//! and in what a step costs:
//!
//! | Strategy   | Frontier              | Step cost                         | Unknown cells |
//! |------------|-----------------------|-----------------------------------|---------------|
//! | `Breadth`  | FIFO, level by level  | uniform                           | blocked       |
//! | `Weighted` | binary heap on f = g+h | length + weight × cell cost      | optimistic    |
//!
//! The unknown-cell column shows the defaults; both are configurable.

pub mod anchor;
pub mod breadth;
pub mod error;
pub mod observer;
pub mod optimizer;
pub mod path;
pub mod search;
pub mod weighted;

#[cfg(test)]
mod tests;

pub use anchor::{Anchor, AnchorFinder};
pub use breadth::{BfsState, BreadthSearch};
pub use error::{EndpointSide, SearchError, SearchResult};
pub use observer::{NoopSearchObserver, SearchObserver};
pub use optimizer::PathOptimizer;
pub use path::Path;
pub use search::{PathSearch, SearchOutcome, SearchStrategy};
