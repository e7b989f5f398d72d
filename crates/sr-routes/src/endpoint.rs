//! Named route endpoints and their CSV form.
//!
//! # CSV format
//!
//! ```csv
//! name,navigation_point
//! north,world;120.50;62.00;-340.50
//! south,
//! ```
//!
//! An endpoint with an empty `navigation_point` has none set yet and cannot
//! be routed.
//!
//! # Legacy columns
//!
//! Older files carry `convergence` and `split` columns instead of (or next
//! to) `navigation_point`.  When `navigation_point` is empty or unreadable,
//! the loader takes the `convergence` point, then the `split` point.  The
//! writer only emits the current columns, so a load-then-write cycle drops
//! the legacy ones.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use sr_core::{Coord, WorldPoint};

use crate::point::{format_point, parse_point};
use crate::RouteResult;

#[derive(Clone, Debug, PartialEq)]
pub struct Endpoint {
    pub name:             String,
    /// Where routes to and from this endpoint start.
    pub navigation_point: Option<WorldPoint>,
}

impl Endpoint {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), navigation_point: None }
    }

    pub fn with_navigation_point(mut self, point: WorldPoint) -> Self {
        self.navigation_point = Some(point);
        self
    }

    pub fn navigation_cell(&self) -> Option<Coord> {
        self.navigation_point.map(WorldPoint::cell)
    }
}

// ── CSV rows ──────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct EndpointRecord {
    name:             String,
    #[serde(default)]
    navigation_point: Option<String>,
    #[serde(default)]
    convergence:      Option<String>,
    #[serde(default)]
    split:            Option<String>,
}

#[derive(Serialize)]
struct EndpointOut<'a> {
    name:             &'a str,
    navigation_point: String,
}

// ── Public API ────────────────────────────────────────────────────────────────

pub fn load_endpoints_csv(path: &Path) -> RouteResult<Vec<Endpoint>> {
    load_endpoints_reader(File::open(path)?)
}

/// Like [`load_endpoints_csv`] but accepts any `Read` source.
pub fn load_endpoints_reader<R: Read>(reader: R) -> RouteResult<Vec<Endpoint>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut endpoints = Vec::new();
    let mut migrated = 0usize;

    for (row_no, result) in rdr.deserialize::<EndpointRecord>().enumerate() {
        let rec = match result {
            Ok(r) => r,
            Err(e) => {
                warn!("skipping unreadable endpoint row {row_no}: {e}");
                continue;
            }
        };
        if rec.name.is_empty() {
            warn!("skipping endpoint row {row_no}: empty name");
            continue;
        }

        let mut point = field_point(&rec.name, "navigation_point", rec.navigation_point.as_deref());
        if point.is_none() {
            point = field_point(&rec.name, "convergence", rec.convergence.as_deref())
                .or_else(|| field_point(&rec.name, "split", rec.split.as_deref()));
            if point.is_some() {
                migrated += 1;
            }
        }
        endpoints.push(Endpoint { name: rec.name, navigation_point: point });
    }

    if migrated > 0 {
        info!("migrated {migrated} legacy endpoint points to navigation points");
    }
    Ok(endpoints)
}

pub fn write_endpoints_csv(path: &Path, endpoints: &[Endpoint], world: &str) -> RouteResult<()> {
    write_endpoints(File::create(path)?, endpoints, world)
}

/// Like [`write_endpoints_csv`] but accepts any `Write` sink.
pub fn write_endpoints<W: Write>(sink: W, endpoints: &[Endpoint], world: &str) -> RouteResult<()> {
    let mut w = csv::Writer::from_writer(sink);
    for e in endpoints {
        w.serialize(EndpointOut {
            name:             &e.name,
            navigation_point: e.navigation_point.map(|p| format_point(world, p)).unwrap_or_default(),
        })?;
    }
    w.flush()?;
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn field_point(name: &str, column: &str, raw: Option<&str>) -> Option<WorldPoint> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    match parse_point(raw) {
        Ok(p) => Some(p),
        Err(e) => {
            warn!("endpoint {name}: ignoring {column}: {e}");
            None
        }
    }
}
