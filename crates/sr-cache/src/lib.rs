//! `sr-cache` — the lazily filled traversability and cost grid.
//!
//! Every cell the engine has ever classified lives here as a
//! [`CellRecord`].  The cache is shared by the background region observer
//! (writer), every running search (readers and write-back), and the
//! persistence layer (snapshot reader).
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`cache`]       | `CostCache`, `CellRecord`, `CacheStats`               |
//! | [`persist`]     | Versioned chunked save/load, legacy upgrade           |
//! | [`error`]       | `CacheError`, `CacheResult`                           |

pub mod cache;
pub mod error;
pub mod persist;


pub use cache::{CacheStats, CellRecord, CostCache, BYTES_PER_RECORD, SHARD_COUNT};
pub use error::{CacheError, CacheResult};
pub use persist::{LoadReport, CHUNK_SIZE, FORMAT_VERSION};
