//! Persistent route store.
//!
//! # File format
//!
//! One CSV row per route, keyed by [`RouteKey`]:
//!
//! ```csv
//! version,key,from,to,waypoints,created_unix_ms,path
//! 1,north_to_south,south,north,3,1760000000000,world;10.50;62.00;4.50|world;30.50;62.00;40.50|world;31.50;62.00;90.50
//! ```
//!
//! `from`/`to` record the direction the route was planned in; the key is
//! direction-independent.  `waypoints` is informational and recomputed on
//! load.
//!
//! # Consistency
//!
//! The in-memory map is the read path.  A mutation is applied to a copy of
//! the map, the copy is written out (temp file plus rename), and only then
//! does it replace the live map.  A failed write leaves memory and file as
//! they were.  Mutations are serialised; readers never wait on I/O.
//!
//! Rows that fail to parse, rows from a newer format, and individual bad
//! points are skipped with a warning.  A row left with no points is dropped.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path as FsPath, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use sr_core::WorldPoint;
use sr_search::Path;

use crate::point::{format_points, parse_point, POINT_SEPARATOR};
use crate::{RouteKey, RouteResult, RouteStoreError};

/// Version written in every row.
pub const ROUTE_FORMAT_VERSION: u32 = 1;

/// World tag written with each point unless the store is given another.
pub const DEFAULT_WORLD: &str = "world";

// ── StoredRoute ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct StoredRoute {
    pub key:             RouteKey,
    pub from:            String,
    pub to:              String,
    /// Waypoints in the `from → to` direction.
    pub points:          Vec<WorldPoint>,
    pub created_unix_ms: u64,
}

impl StoredRoute {
    #[inline]
    pub fn waypoint_count(&self) -> usize {
        self.points.len()
    }

    /// Waypoints for travelling `from → to`, reversed if the route was
    /// stored the other way round.  `None` if the names are not this route's
    /// endpoints.
    pub fn oriented(&self, from: &str, to: &str) -> Option<Vec<WorldPoint>> {
        if from == self.from && to == self.to {
            Some(self.points.clone())
        } else if from == self.to && to == self.from {
            let mut points = self.points.clone();
            points.reverse();
            Some(points)
        } else {
            None
        }
    }

    /// [`oriented`](Self::oriented) as a [`Path`].
    pub fn oriented_path(&self, from: &str, to: &str, speed: f64) -> Option<Path> {
        self.oriented(from, to).map(|points| Path::new(points, speed))
    }
}

// ── CSV row ───────────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct RouteRow {
    version:         u32,
    key:             String,
    from:            String,
    to:              String,
    waypoints:       usize,
    created_unix_ms: u64,
    path:            String,
}

// ── RouteStore ────────────────────────────────────────────────────────────────

pub struct RouteStore {
    file:   Option<PathBuf>,
    world:  String,
    routes: RwLock<BTreeMap<RouteKey, StoredRoute>>,
    /// Serialises mutations and file rewrites.
    io:     Mutex<()>,
}

impl RouteStore {
    /// A store with no backing file.
    pub fn in_memory() -> Self {
        Self {
            file:   None,
            world:  DEFAULT_WORLD.to_owned(),
            routes: RwLock::new(BTreeMap::new()),
            io:     Mutex::new(()),
        }
    }

    /// A store backed by `path`.  Existing routes are loaded; a missing file
    /// is created on the first mutation.
    pub fn open(path: impl Into<PathBuf>) -> RouteResult<Self> {
        let store = Self { file: Some(path.into()), ..Self::in_memory() };
        store.load_all()?;
        Ok(store)
    }

    /// World tag for points written from now on.
    pub fn with_world(mut self, world: impl Into<String>) -> Self {
        self.world = world.into();
        self
    }

    pub fn file(&self) -> Option<&FsPath> {
        self.file.as_deref()
    }

    pub fn world(&self) -> &str {
        &self.world
    }

    /// Store (or replace) the route between `from` and `to`.
    pub fn save(&self, from: &str, to: &str, points: &[WorldPoint]) -> RouteResult<StoredRoute> {
        let key = RouteKey::new(from, to);
        if points.is_empty() {
            return Err(RouteStoreError::EmptyRoute(key));
        }
        let route = StoredRoute {
            key:             key.clone(),
            from:            from.to_owned(),
            to:              to.to_owned(),
            points:          points.to_vec(),
            created_unix_ms: now_unix_ms(),
        };
        self.commit(|map| {
            map.insert(key.clone(), route.clone());
        })?;
        info!("saved route {key} ({} waypoints)", points.len());
        Ok(route)
    }

    pub fn load(&self, from: &str, to: &str) -> Option<StoredRoute> {
        self.routes.read().get(&RouteKey::new(from, to)).cloned()
    }

    pub fn contains(&self, from: &str, to: &str) -> bool {
        self.routes.read().contains_key(&RouteKey::new(from, to))
    }

    /// Replace the in-memory map with the file's contents.  Returns the
    /// number of routes loaded; a store without a file (or whose file does
    /// not exist yet) loads nothing.
    pub fn load_all(&self) -> RouteResult<usize> {
        let Some(path) = self.file.as_deref() else {
            return Ok(0);
        };
        let _guard = self.io.lock();
        if !path.exists() {
            debug!("route file {} does not exist yet", path.display());
            self.routes.write().clear();
            return Ok(0);
        }
        let routes = read_routes(File::open(path)?)?;
        let n = routes.len();
        let mut map = self.routes.write();
        map.clear();
        for route in routes {
            map.insert(route.key.clone(), route);
        }
        info!("loaded {n} routes from {}", path.display());
        Ok(n)
    }

    /// Remove one route.  Returns whether it existed.
    pub fn delete(&self, from: &str, to: &str) -> RouteResult<bool> {
        let key = RouteKey::new(from, to);
        if !self.routes.read().contains_key(&key) {
            return Ok(false);
        }
        let existed = self.commit(|map| map.remove(&key).is_some())?;
        if existed {
            info!("deleted route {key}");
        }
        Ok(existed)
    }

    /// Remove every route.  Returns how many there were.
    pub fn delete_all(&self) -> RouteResult<usize> {
        let n = self.commit(|map| {
            let n = map.len();
            map.clear();
            n
        })?;
        info!("deleted all {n} routes");
        Ok(n)
    }

    /// Keys in lexicographic order.
    pub fn keys(&self) -> Vec<RouteKey> {
        self.routes.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.routes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.read().is_empty()
    }

    /// Write every route as CSV to any sink.
    pub fn write_to<W: Write>(&self, sink: W) -> RouteResult<usize> {
        let routes = self.routes.read().clone();
        self.write_map(&routes, sink)
    }

    fn write_map<W: Write>(&self, routes: &BTreeMap<RouteKey, StoredRoute>, sink: W) -> RouteResult<usize> {
        let mut w = csv::Writer::from_writer(sink);
        for r in routes.values() {
            w.serialize(RouteRow {
                version:         ROUTE_FORMAT_VERSION,
                key:             r.key.to_string(),
                from:            r.from.clone(),
                to:              r.to.clone(),
                waypoints:       r.points.len(),
                created_unix_ms: r.created_unix_ms,
                path:            format_points(&self.world, &r.points),
            })?;
        }
        w.flush()?;
        Ok(routes.len())
    }

    /// Apply `change` to a copy of the map, write the copy, then install it.
    fn commit<T>(&self, change: impl FnOnce(&mut BTreeMap<RouteKey, StoredRoute>) -> T) -> RouteResult<T> {
        let _guard = self.io.lock();
        let mut staged = self.routes.read().clone();
        let out = change(&mut staged);
        self.persist(&staged)?;
        *self.routes.write() = staged;
        Ok(out)
    }

    fn persist(&self, routes: &BTreeMap<RouteKey, StoredRoute>) -> RouteResult<()> {
        let Some(path) = self.file.as_deref() else {
            return Ok(());
        };
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let tmp = path.with_extension("tmp");
        let written = self.write_map(routes, File::create(&tmp)?)?;
        std::fs::rename(&tmp, path)?;
        debug!("wrote {written} routes to {}", path.display());
        Ok(())
    }
}

/// Parse a route CSV from any source, skipping bad rows and points.
pub fn read_routes<R: Read>(source: R) -> RouteResult<Vec<StoredRoute>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(source);
    let mut routes = Vec::new();

    for (row_no, result) in rdr.deserialize::<RouteRow>().enumerate() {
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                warn!("skipping unreadable route row {row_no}: {e}");
                continue;
            }
        };
        if row.version > ROUTE_FORMAT_VERSION {
            warn!("skipping route {} written by newer format v{}", row.key, row.version);
            continue;
        }

        let key = RouteKey::new(&row.from, &row.to);
        if key.as_str() != row.key {
            debug!("route key {:?} rewritten as {key}", row.key);
        }

        let mut points = Vec::with_capacity(row.waypoints);
        for raw in row.path.split(POINT_SEPARATOR).filter(|s| !s.trim().is_empty()) {
            match parse_point(raw) {
                Ok(p) => points.push(p),
                Err(e) => warn!("route {key}: skipping point: {e}"),
            }
        }
        if points.is_empty() {
            warn!("skipping route {key}: no valid waypoints");
            continue;
        }

        routes.push(StoredRoute {
            key,
            from: row.from,
            to: row.to,
            points,
            created_unix_ms: row.created_unix_ms,
        });
    }
    Ok(routes)
}

fn now_unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
