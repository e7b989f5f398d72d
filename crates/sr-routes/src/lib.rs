//! `sr-routes` — planned routes and the endpoints they connect.
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`store`]       | `RouteStore`, `StoredRoute`: CSV-backed route cache   |
//! | [`key`]         | `RouteKey`: direction-independent route identity      |
//! | [`endpoint`]    | `Endpoint` and its CSV loader (legacy migration)      |
//! | [`point`]       | `world;x;y;z` point codec                             |
//! | [`error`]       | `RouteStoreError`, `RouteResult`                      |

pub mod endpoint;
pub mod error;
pub mod key;
pub mod point;
pub mod store;


pub use endpoint::{load_endpoints_csv, load_endpoints_reader, write_endpoints, write_endpoints_csv, Endpoint};
pub use error::{RouteResult, RouteStoreError};
pub use key::{RouteKey, KEY_SEPARATOR};
pub use store::{read_routes, RouteStore, StoredRoute, DEFAULT_WORLD, ROUTE_FORMAT_VERSION};
