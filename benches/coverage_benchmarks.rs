use criterion::{Criterion, black_box, criterion_group, criterion_main};
use firegrid::{Coord, Engine, EngineConfig, GridIndex, ZonePolygon};
use serde_json::json;

fn hydrant_lattice(n_side: usize) -> Vec<(f64, f64)> {
    (0..n_side * n_side)
        .map(|i| {
            (
                38.40 + (i / n_side) as f64 * 0.002,
                -121.70 + (i % n_side) as f64 * 0.002,
            )
        })
        .collect()
}

fn benchmark_grid_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_index");

    let points = hydrant_lattice(100);

    group.bench_function("insert_10k", |b| {
        b.iter(|| {
            let mut index = GridIndex::new(0.005);
            for &(lat, lon) in &points {
                index.insert(black_box(lat), black_box(lon), ());
            }
            index
        })
    });

    let mut index = GridIndex::new(0.005);
    for &(lat, lon) in &points {
        index.insert(lat, lon, ());
    }

    group.bench_function("find_nearest", |b| {
        let mut i = 0usize;
        b.iter(|| {
            i = (i + 1) % points.len();
            let (lat, lon) = points[i];
            index.find_nearest(black_box(lat + 0.0003), black_box(lon - 0.0004))
        })
    });

    group.finish();
}

fn benchmark_coverage_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("coverage_pipeline");
    group.sample_size(20);

    let hydrants: Vec<_> = hydrant_lattice(40)
        .into_iter()
        .map(|(lat, lon)| json!({"lat": lat, "lon": lon}))
        .collect();
    let addresses: Vec<_> = (0..10_000)
        .map(|i| {
            json!({
                "lat": 38.4001 + (i / 100) as f64 * 0.0007,
                "lon": -121.6999 + (i % 100) as f64 * 0.0007,
            })
        })
        .collect();

    group.bench_function("precompute_10k_addresses", |b| {
        let mut engine = Engine::new(EngineConfig::default());
        engine.build_hydrant_index(&hydrants).unwrap();
        b.iter(|| engine.precompute_addresses(black_box(&addresses), |_, _| {}).unwrap())
    });

    let mut engine = Engine::new(EngineConfig::default());
    engine.build_hydrant_index(&hydrants).unwrap();
    engine.precompute_addresses(&addresses, |_, _| {}).unwrap();

    let zone = ZonePolygon::single(vec![
        Coord { x: -121.70, y: 38.40 },
        Coord { x: -121.62, y: 38.40 },
        Coord { x: -121.62, y: 38.48 },
        Coord { x: -121.70, y: 38.48 },
    ]);

    group.bench_function("analyze_zone_10k_table", |b| {
        b.iter(|| engine.analyze_zone(black_box(&zone)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_grid_index, benchmark_coverage_pipeline);
criterion_main!(benches);
