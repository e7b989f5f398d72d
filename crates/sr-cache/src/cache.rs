//! Sharded concurrent cost cache.
//!
//! # Layout
//!
//! Records are spread across [`SHARD_COUNT`] independent
//! `RwLock<FxHashMap<u64, CellRecord>>` shards keyed by the packed
//! coordinate.  A write locks one shard only, so the background observer
//! filling a region never stalls a search reading elsewhere, and a snapshot
//! for persistence holds each shard's read lock only while copying it.
//!
//! Hit/miss counters are relaxed atomics.  They are diagnostics, not
//! synchronisation.

use std::collections::hash_map::Entry;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use sr_core::{Bounds, Coord};

/// Number of lock shards.  Power of two.
pub const SHARD_COUNT: usize = 64;

/// Estimated heap bytes per record, for diagnostics.
pub const BYTES_PER_RECORD: u64 = 20;

// ── CellRecord ────────────────────────────────────────────────────────────────

/// What the engine knows about one cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRecord {
    pub traversable: bool,
    /// Traversal cost; lower is cheaper.  `IMPASSABLE_COST` for land.
    pub cost:        u16,
}

impl CellRecord {
    #[inline]
    pub const fn new(traversable: bool, cost: u16) -> Self {
        Self { traversable, cost }
    }
}

// ── CacheStats ────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CacheStats {
    pub records:      u64,
    pub traversable:  u64,
    pub hits:         u64,
    pub misses:       u64,
    /// `hits / (hits + misses)` as a percentage; 0 before any lookup.
    pub hit_rate:     f64,
    pub memory_bytes: u64,
}

// ── CostCache ─────────────────────────────────────────────────────────────────

/// Unbounded `Coord → CellRecord` map, safe to share behind an `Arc`.
pub struct CostCache {
    shards: Vec<RwLock<FxHashMap<u64, CellRecord>>>,
    hits:   AtomicU64,
    misses: AtomicU64,
}

impl Default for CostCache {
    fn default() -> Self {
        Self::new()
    }
}

#[inline(always)]
fn shard_of(key: u64) -> usize {
    // Fibonacci hashing: top bits of the product spread neighbouring cells
    // across shards.
    (key.wrapping_mul(0x9E37_79B9_7F4A_7C15) >> (64 - SHARD_COUNT.trailing_zeros())) as usize
}

impl CostCache {
    pub fn new() -> Self {
        Self {
            shards: (0..SHARD_COUNT).map(|_| RwLock::new(FxHashMap::default())).collect(),
            hits:   AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    #[inline]
    fn shard(&self, key: u64) -> &RwLock<FxHashMap<u64, CellRecord>> {
        &self.shards[shard_of(key)]
    }

    /// Look up a cell, counting a hit or miss.  `None` means unknown, which
    /// is distinct from a cached non-traversable record.
    pub fn get(&self, at: Coord) -> Option<CellRecord> {
        let found = self.peek(at);
        match found {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        found
    }

    /// Look up a cell without touching the counters.
    #[inline]
    pub fn peek(&self, at: Coord) -> Option<CellRecord> {
        let key = at.pack();
        self.shard(key).read().get(&key).copied()
    }

    #[inline]
    pub fn contains(&self, at: Coord) -> bool {
        let key = at.pack();
        self.shard(key).read().contains_key(&key)
    }

    /// Insert or overwrite.  Last write wins.
    pub fn put(&self, at: Coord, traversable: bool, cost: u16) {
        self.insert(at, CellRecord::new(traversable, cost));
    }

    pub fn insert(&self, at: Coord, record: CellRecord) {
        let key = at.pack();
        self.shard(key).write().insert(key, record);
    }

    /// Insert only if the cell is unknown.  Returns `true` if it was added.
    pub fn put_if_absent(&self, at: Coord, record: CellRecord) -> bool {
        let key = at.pack();
        let mut shard = self.shard(key).write();
        if shard.contains_key(&key) {
            return false;
        }
        shard.insert(key, record);
        true
    }

    /// Bulk insert of records the cache does not already hold, taking each
    /// shard's lock once.  Live records win over the incoming ones.  Returns
    /// the number added.
    pub fn absorb<I>(&self, records: I) -> usize
    where
        I: IntoIterator<Item = (Coord, CellRecord)>,
    {
        let mut batches: Vec<Vec<(u64, CellRecord)>> = vec![Vec::new(); SHARD_COUNT];
        for (at, rec) in records {
            let key = at.pack();
            batches[shard_of(key)].push((key, rec));
        }
        let mut added = 0;
        for (i, batch) in batches.into_iter().enumerate() {
            if batch.is_empty() {
                continue;
            }
            let mut shard = self.shards[i].write();
            for (key, rec) in batch {
                if let Entry::Vacant(slot) = shard.entry(key) {
                    slot.insert(rec);
                    added += 1;
                }
            }
        }
        added
    }

    /// Remove every record and reset the counters.
    pub fn clear(&self) {
        for shard in &self.shards {
            shard.write().clear();
        }
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub fn size(&self) -> usize {
        self.shards.iter().map(|s| s.read().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|s| s.read().is_empty())
    }

    /// Percentage of lattice points in the box that are cached, sampled
    /// every `stride` cells.  0.0 for an empty sample.
    pub fn coverage_percent(&self, box_min: Coord, box_max: Coord, stride: i32) -> f64 {
        let region = Bounds::new(box_min, box_max);
        let mut sampled = 0u64;
        let mut known = 0u64;
        for c in region.sample(stride) {
            sampled += 1;
            if self.contains(c) {
                known += 1;
            }
        }
        if sampled == 0 {
            0.0
        } else {
            known as f64 * 100.0 / sampled as f64
        }
    }

    /// Copy out every record.  Each shard is read-locked only while it is
    /// being copied.
    pub fn snapshot(&self) -> Vec<(Coord, CellRecord)> {
        let mut out = Vec::with_capacity(self.size());
        for shard in &self.shards {
            let guard = shard.read();
            out.extend(guard.iter().map(|(&k, &r)| (Coord::unpack(k), r)));
        }
        out
    }

    pub fn stats(&self) -> CacheStats {
        let mut records = 0u64;
        let mut traversable = 0u64;
        for shard in &self.shards {
            let guard = shard.read();
            records += guard.len() as u64;
            traversable += guard.values().filter(|r| r.traversable).count() as u64;
        }
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;
        CacheStats {
            records,
            traversable,
            hits,
            misses,
            hit_rate: if lookups == 0 { 0.0 } else { hits as f64 * 100.0 / lookups as f64 },
            memory_bytes: records * BYTES_PER_RECORD,
        }
    }
}
