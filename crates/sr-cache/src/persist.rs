//! Cache persistence.
//!
//! # File format
//!
//! A header-less CSV file with flexible row lengths.  The first column tags
//! the row:
//!
//! ```csv
//! meta,version,2
//! meta,records,3
//! meta,saved_unix_ms,1760000000000
//! chunk,0,10:-4:1:3;11:-4:1:2;12:-4:0:100
//! ```
//!
//! Each `chunk` row holds up to [`CHUNK_SIZE`] `;`-separated entries.  A
//! version-2 entry is `x:z:t:c` (t ∈ {0,1}, c = cost).  Water costs lie below
//! [`IMPASSABLE_COST`] and land carries exactly that cost; anything else is
//! corrupt.  Rows may come in any order: the version row governs every
//! chunk in the file.
//!
//! # Legacy files
//!
//! Version 1 files (or files with no version row) predate per-cell costs.
//! Their entries are `x:z` (a traversable cell) or `x:z:t`, and `,` is also
//! accepted as the separator.  On load they are upgraded:
//! [`LEGACY_TRAVERSABLE_COST`] for water, [`IMPASSABLE_COST`] for land.
//!
//! # Corruption
//!
//! Malformed entries and unknown rows are skipped and counted in
//! [`LoadReport::skipped`]; a load never fails because of a bad entry.  A
//! version row that is unparsable or newer than [`FORMAT_VERSION`] is an
//! error, since nothing after it can be trusted.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use log::{debug, info, warn};

use sr_core::{Coord, IMPASSABLE_COST, LEGACY_TRAVERSABLE_COST};

use crate::{CacheError, CacheResult, CellRecord, CostCache};

/// Version written by [`CostCache::save`].
pub const FORMAT_VERSION: u32 = 2;

/// Entries per `chunk` row.
pub const CHUNK_SIZE: usize = 10_000;

/// Outcome of a load.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct LoadReport {
    pub version: u32,
    /// Entries parsed from the file.
    pub loaded:  usize,
    /// Entries added to the cache (parsed minus those already present).
    pub added:   usize,
    /// Malformed entries and rows that were ignored.
    pub skipped: usize,
}

impl CostCache {
    /// Snapshot the cache and write it to `path`.  The file is written to a
    /// sibling temp file first and renamed into place.
    pub fn save(&self, path: &Path) -> CacheResult<usize> {
        let tmp = path.with_extension("tmp");
        let written = {
            let file = File::create(&tmp)?;
            self.save_to(file)?
        };
        std::fs::rename(&tmp, path)?;
        info!("saved {written} cache records to {}", path.display());
        Ok(written)
    }

    /// Like [`save`](Self::save) but accepts any `Write` sink.
    pub fn save_to<W: Write>(&self, sink: W) -> CacheResult<usize> {
        // Locks are released before any I/O happens.
        let mut records = self.snapshot();
        records.sort_unstable_by_key(|(c, _)| (c.x, c.z));

        let saved_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);

        let mut w = WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(sink);
        w.write_record(["meta", "version", &FORMAT_VERSION.to_string()])?;
        w.write_record(["meta", "records", &records.len().to_string()])?;
        w.write_record(["meta", "saved_unix_ms", &saved_ms.to_string()])?;

        let mut entries = String::new();
        for (idx, chunk) in records.chunks(CHUNK_SIZE).enumerate() {
            entries.clear();
            for (i, (c, r)) in chunk.iter().enumerate() {
                if i > 0 {
                    entries.push(';');
                }
                entries.push_str(&format!("{}:{}:{}:{}", c.x, c.z, r.traversable as u8, r.cost));
            }
            w.write_record(["chunk", &idx.to_string(), &entries])?;
        }
        w.flush()?;
        Ok(records.len())
    }

    /// Load records from `path` into the cache.  Records already present in
    /// the cache are kept.
    pub fn load(&self, path: &Path) -> CacheResult<LoadReport> {
        let file = File::open(path)?;
        let report = self.load_from(file)?;
        info!(
            "loaded cache v{} from {}: {} records ({} new, {} skipped)",
            report.version,
            path.display(),
            report.loaded,
            report.added,
            report.skipped
        );
        Ok(report)
    }

    /// Like [`load`](Self::load) but accepts any `Read` source.
    pub fn load_from<R: Read>(&self, source: R) -> CacheResult<LoadReport> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(source);

        let mut report = LoadReport { version: 1, ..LoadReport::default() };
        let mut declared: Option<usize> = None;
        let mut chunks: Vec<String> = Vec::new();

        for (row_no, row) in rdr.records().enumerate() {
            let row = match row {
                Ok(r) => r,
                Err(e) => {
                    warn!("cache row {row_no}: unreadable ({e}), skipping");
                    report.skipped += 1;
                    continue;
                }
            };
            match row.get(0) {
                Some("meta") => {
                    apply_meta(&row, &mut report, &mut declared)?;
                }
                Some("chunk") => {
                    // Unquoted legacy `x,z` entries spill across columns.
                    chunks.push(row.iter().skip(2).collect::<Vec<_>>().join(","));
                }
                other => {
                    debug!("cache row {row_no}: unknown tag {other:?}, skipping");
                    report.skipped += 1;
                }
            }
        }

        // Chunks are parsed once the whole file is read, so the version row
        // applies wherever it appears.
        let mut parsed: Vec<(Coord, CellRecord)> = Vec::new();
        for entries in &chunks {
            parse_chunk(entries, report.version, &mut parsed, &mut report.skipped);
        }

        if report.skipped > 0 {
            warn!("skipped {} corrupt cache entries", report.skipped);
        }
        if let Some(n) = declared {
            if n != parsed.len() {
                warn!("cache header declares {n} records but {} were readable", parsed.len());
            }
        }

        report.loaded = parsed.len();
        report.added = self.absorb(parsed);
        Ok(report)
    }
}

// ── Parsing helpers ───────────────────────────────────────────────────────────

fn apply_meta(
    row:      &StringRecord,
    report:   &mut LoadReport,
    declared: &mut Option<usize>,
) -> CacheResult<()> {
    let value = row.get(2).unwrap_or("").trim();
    match row.get(1) {
        Some("version") => {
            let v: u32 = value.parse().map_err(|_| {
                CacheError::CorruptPersistedData(format!("invalid version {value:?}"))
            })?;
            if v == 0 || v > FORMAT_VERSION {
                return Err(CacheError::UnsupportedVersion(v));
            }
            report.version = v;
        }
        Some("records") => {
            *declared = value.parse().ok();
        }
        _ => {}
    }
    Ok(())
}

fn parse_chunk(
    entries: &str,
    version: u32,
    out:     &mut Vec<(Coord, CellRecord)>,
    skipped: &mut usize,
) {
    for entry in entries.split(';').map(str::trim).filter(|e| !e.is_empty()) {
        match parse_entry(entry, version) {
            Some(parsed) => out.push(parsed),
            None => {
                debug!("corrupt cache entry {entry:?}");
                *skipped += 1;
            }
        }
    }
}

/// Parse one entry.  `None` for anything malformed.
fn parse_entry(entry: &str, version: u32) -> Option<(Coord, CellRecord)> {
    let parts: Vec<&str> = if version >= 2 {
        entry.split(':').collect()
    } else {
        entry.split([':', ',']).collect()
    };
    let x: i32 = parts.first()?.trim().parse().ok()?;
    let z: i32 = parts.get(1)?.trim().parse().ok()?;
    let at = Coord::new(x, z);

    match (version, parts.len()) {
        (2, 4) => {
            let traversable = parse_flag(parts[2])?;
            let cost: u16 = parts[3].trim().parse().ok()?;
            // Land carries exactly the sentinel; water stays strictly below it.
            let valid = if traversable { cost < IMPASSABLE_COST } else { cost == IMPASSABLE_COST };
            if !valid {
                return None;
            }
            Some((at, CellRecord::new(traversable, cost)))
        }
        (1, 2) => Some((at, legacy_record(true))),
        (1, 3) => Some((at, legacy_record(parse_flag(parts[2])?))),
        _ => None,
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

fn legacy_record(traversable: bool) -> CellRecord {
    if traversable {
        CellRecord::new(true, LEGACY_TRAVERSABLE_COST)
    } else {
        CellRecord::new(false, IMPASSABLE_COST)
    }
}
