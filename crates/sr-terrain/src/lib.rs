//! `sr-terrain` — turning the live surface into cached cell costs.
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`model`]       | `CostModel`: shore distance and dead-end penalties    |
//! | [`observer`]    | `RegionObserver`: background cache population         |
//! | [`validator`]   | `PathValidator`: read-through traversability queries  |
//!
//! All three share one `Arc<CostCache>` and one `Arc<S: Surface>`.  The
//! observer writes ahead of searches; the validator fills whatever the
//! observer has not reached yet.

pub mod model;
pub mod observer;
pub mod validator;


pub use model::CostModel;
pub use observer::{ObserverTotals, RegionObserver, RegionReport};
pub use validator::{Lookup, PathValidator};
