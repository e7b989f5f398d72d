//! harbor — plans sea routes between moorings on a synthetic archipelago.
//!
//! The world starts unobserved.  Chunks are revealed one by one, the way a
//! host streams terrain in, and each reveal is forwarded to the navigator.
//! Once the map is classified every pair of endpoints is routed, stored, and
//! summarised.  Set `RUST_LOG=debug` for search progress.

mod world;

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{info, warn};

use sr_core::{Bounds, NavConfig, Surface, WorldPoint};
use sr_engine::{NavResult, Navigator, NavigatorBuilder, PathRequest};
use sr_routes::{load_endpoints_reader, write_endpoints_csv, Endpoint, RouteStore};
use sr_search::{Path as SeaPath, SearchStrategy};

use world::{build_archipelago, world_bounds, WORLD_SIZE};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:       u64  = 7;
const OUTPUT_DIR: &str = "output/harbor";

// Older endpoint files only have `convergence`/`split` points; the loader
// migrates them.  `drifter` has no point at all and cannot be routed.
const ENDPOINTS_CSV: &str = "\
name,navigation_point,convergence,split
harbor,world;365.50;62.00;190.50,,
north_cove,,world;60.50;62.00;40.50,
south_reef,,,world;80.50;62.00;330.50
lighthouse,world;200.50;62.00;200.50,,
drifter,,,
";

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Plan with the default request; on a budget failure try once more with
/// the weighted strategy.  The retry is this caller's policy: the engine
/// itself never retries.
fn plan_with_fallback<S: Surface + ?Sized + 'static>(
    nav:  &Navigator<S>,
    from: &Endpoint,
    to:   &Endpoint,
) -> NavResult<SeaPath> {
    match nav.plan_route(from, to) {
        Err(e) if e.is_retryable() => {
            warn!("{} -> {}: {e}; retrying with a*", from.name, to.name);
            nav.plan_route_with(from, to, PathRequest::new(SearchStrategy::Weighted))
        }
        other => other,
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    println!("=== harbor — searoute engine demo ===");
    println!("World: {WORLD_SIZE}×{WORLD_SIZE}  |  Seed: {SEED}");
    println!();

    // 1. Endpoints (with legacy columns migrated).
    let endpoints = load_endpoints_reader(Cursor::new(ENDPOINTS_CSV))?;
    let moorings: Vec<_> = endpoints.iter().filter_map(Endpoint::navigation_cell).collect();
    println!("Endpoints: {} ({} with navigation points)", endpoints.len(), moorings.len());

    // 2. World, hidden until streamed in.
    let mut surface = build_archipelago(SEED, &moorings);
    let bounds = world_bounds();
    surface.hide(bounds);
    println!("Water cells: {}", surface.water_cells());
    let surface = Arc::new(surface);

    // 3. Navigator with a file-backed route store.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let out = Path::new(OUTPUT_DIR);
    let store = RouteStore::open(out.join("routes.csv")).context("opening route store")?;
    let nav = NavigatorBuilder::new(NavConfig::default(), Arc::clone(&surface))
        .route_store(store)
        .build()?;

    // 4. Stream chunks in.
    let t0 = Instant::now();
    let chunks = WORLD_SIZE / 16;
    for cz in 0..chunks {
        for cx in 0..chunks {
            let chunk = Bounds::chunk(cx, cz);
            surface.reveal(chunk);
            nav.on_region_observable(chunk);
        }
    }
    nav.region_observer().wait_idle();
    println!("Classified {} chunks in {:.2} s", chunks * chunks, t0.elapsed().as_secs_f64());
    println!("  {}", nav.diagnostics());
    println!(
        "  coverage: {:.1}%",
        nav.coverage_between(bounds.min, bounds.max)
    );
    println!();

    // 5. A quick background request between two open-water points.
    let pending = nav.find_path_async(WorldPoint::new(40.5, 62.0, 200.5), WorldPoint::new(120.5, 62.0, 220.5));
    match pending.wait_timeout(Duration::from_secs(60)) {
        Some(Ok(path)) => println!(
            "Background path: {} cells, {:.0} units, ~{:.0} s at cruise speed",
            path.waypoint_count(),
            path.distance(),
            path.estimated_secs()
        ),
        Some(Err(e)) => println!("Background path failed: {}", e.reason()),
        None => println!("Background path still running after 60 s"),
    }
    println!();

    // 6. Route every pair.
    println!("{:<12} {:<12} {:>9} {:>9} {:>8}", "From", "To", "Waypoints", "Distance", "Time(s)");
    println!("{}", "-".repeat(54));
    let t1 = Instant::now();
    for (i, from) in endpoints.iter().enumerate() {
        for to in &endpoints[i + 1..] {
            match plan_with_fallback(&nav, from, to) {
                Ok(path) => println!(
                    "{:<12} {:<12} {:>9} {:>9.0} {:>8.0}",
                    from.name,
                    to.name,
                    path.waypoint_count(),
                    path.distance(),
                    path.estimated_secs()
                ),
                Err(e) => println!("{:<12} {:<12} {}", from.name, to.name, e.reason()),
            }
        }
    }
    println!("Planned in {:.2} s", t1.elapsed().as_secs_f64());
    println!();

    // 7. Stored routes come back oriented for the caller.
    if let Some(back) = nav.stored_route("harbor", "north_cove") {
        println!(
            "Stored harbor -> north_cove starts at ({:.1}, {:.1})",
            back.start().map_or(0.0, |p| p.x),
            back.start().map_or(0.0, |p| p.z)
        );
    }

    // 8. Persist the classified map and the migrated endpoint list.
    let saved = nav.save_cache(&out.join("cache.csv"))?;
    write_endpoints_csv(&out.join("endpoints.csv"), &endpoints, "world")?;
    info!("wrote {saved} cache records and {} endpoints", endpoints.len());
    println!("  {}", nav.diagnostics());
    println!("Output written to {OUTPUT_DIR}/");

    Ok(())
}
