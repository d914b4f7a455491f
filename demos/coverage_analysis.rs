//! End-to-end coverage analysis session: build the hydrant and station
//! indexes, precompute address distances, then classify a zone.
//!
//! Run with `cargo run --example coverage_analysis`.

use firegrid::{
    Coord, Engine, EngineConfig, StationRecord, ZoneClass, ZonePolygon,
};
use serde_json::json;

fn main() -> Result<(), firegrid::FiregridError> {
    env_logger::init();

    let mut engine = Engine::new(EngineConfig::default());

    // Hydrants on a 20x20 lattice roughly 720 ft apart.
    let hydrants: Vec<_> = (0..400)
        .map(|i| {
            json!({
                "lat": 38.55 + (i / 20) as f64 * 0.002,
                "lon": -121.50 + (i % 20) as f64 * 0.002,
                "id": format!("H-{i:03}"),
            })
        })
        .collect();
    let ack = engine.build_hydrant_index(&hydrants)?;
    println!("Indexed {} hydrants in {:.1} ms", ack.count, ack.elapsed_ms);

    engine.set_stations(vec![
        StationRecord::new(38.555, -121.495, json!({"name": "Station 4"})),
        StationRecord::new(38.575, -121.475, json!({"name": "Station 17"})),
    ]);

    // Addresses offset from the lattice so every lookup does real work.
    let addresses: Vec<_> = (0..2_500)
        .map(|i| {
            json!({
                "lat": 38.5503 + (i / 50) as f64 * 0.0008,
                "lon": -121.4997 + (i % 50) as f64 * 0.0008,
            })
        })
        .collect();
    let ack = engine.precompute_addresses(&addresses, |current, total| {
        println!("  precompute {current}/{total}");
    })?;
    let summary = &ack.summary;
    println!(
        "Coverage: {:.1}% within 500 ft, {:.1}% within 1000 ft, {:.1}% underserved",
        summary.pct_within_500ft, summary.pct_within_1000ft, summary.pct_underserved
    );

    let zone = ZonePolygon::single(vec![
        Coord { x: -121.50, y: 38.55 },
        Coord { x: -121.47, y: 38.55 },
        Coord { x: -121.47, y: 38.58 },
        Coord { x: -121.50, y: 38.58 },
    ]);
    let report = engine.analyze_zone(&zone);
    let stats = &report.stats;
    println!(
        "Zone: {} addresses, {} hydrants, {} stations, {:.2} sq mi",
        stats.address_count, stats.hydrant_count, stats.station_count, stats.area_sq_miles
    );
    println!(
        "Classified {:?} ({:.0} addresses / sq mi)",
        stats.classification, stats.address_density
    );
    if stats.classification == ZoneClass::Rural {
        if let Some(advisory) = &stats.advisory {
            println!("Advisory: {advisory}");
        }
    }

    Ok(())
}
