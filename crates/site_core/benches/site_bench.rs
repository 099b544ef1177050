//! Site evaluation benchmarks
//!
//! - single evaluation on an elevation grid
//! - parallel batch evaluation

use chrono::DateTime;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use site_core::engine::config::EngineConfig;
use site_core::engine::validation::{BaselineReading, VegetationBaselines};
use site_core::models::WindObservation;
use site_core::terrain::{ElevationGrid, FeatureKind, TerrainFeature, TerrainSource};
use site_core::{SiteEngine, SiteRequest};

const SIZE: usize = 41;
const CELL_M: f64 = 30.0;

/// Ridge running east-west through the grid centre.
fn ridge_grid() -> ElevationGrid {
    let mut elevations = Vec::with_capacity(SIZE * SIZE);
    for r in 0..SIZE {
        for c in 0..SIZE {
            let dr = r as f64 - SIZE as f64 / 2.0;
            let dc = c as f64 - SIZE as f64 / 2.0;
            elevations.push(500.0 - dr.abs() * 6.0 + (dc * 0.3).sin() * 4.0);
        }
    }
    ElevationGrid {
        origin_latitude: 44.01,
        origin_longitude: -72.01,
        cell_size_m: CELL_M,
        rows: SIZE,
        cols: SIZE,
        elevations_m: elevations,
    }
}

fn request(grid: &ElevationGrid, offset_cells: usize) -> SiteRequest {
    let (latitude, longitude) = grid.cell_center(SIZE / 2 + 4, SIZE / 2 + offset_cells % 5);
    let feature = |kind, r, c| {
        let (latitude, longitude) = grid.cell_center(r, c);
        TerrainFeature { kind, latitude, longitude, label: None }
    };
    SiteRequest {
        schema_version: 1,
        latitude,
        longitude,
        timestamp: DateTime::parse_from_rfc3339("2024-11-08T07:30:00-05:00").expect("valid timestamp"),
        season: None,
        weather: None,
        terrain: TerrainSource::Grid(grid.clone()),
        wind: Some(WindObservation { bearing_degrees: 310.0, speed_mph: 9.0 }),
        temperature_f: 34.0,
        thermal: None,
        deer_movement_bearing: None,
        baselines: VegetationBaselines {
            slow: Some(BaselineReading::new(78.0)),
            fast: Some(BaselineReading::new(70.0)),
        },
        features: vec![
            feature(FeatureKind::Water, 30, 18),
            feature(FeatureKind::Food, 28, 25),
            feature(FeatureKind::Edge, 26, 22),
            feature(FeatureKind::Edge, 27, 17),
            feature(FeatureKind::Trail, 26, 21),
        ],
        categories: Vec::new(),
        roles: Vec::new(),
    }
}

fn bench_single(c: &mut Criterion) {
    let engine = SiteEngine::new(EngineConfig::default()).expect("default config is valid");
    let grid = ridge_grid();
    let req = request(&grid, 0);

    c.bench_function("evaluate_single", |b| {
        b.iter(|| engine.evaluate(black_box(&req)).expect("evaluation succeeds"))
    });
}

fn bench_batch(c: &mut Criterion) {
    let engine = SiteEngine::new(EngineConfig::default()).expect("default config is valid");
    let grid = ridge_grid();
    let mut group = c.benchmark_group("evaluate_batch");

    for size in [8usize, 64] {
        let requests: Vec<SiteRequest> = (0..size).map(|i| request(&grid, i)).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &requests, |b, reqs| {
            b.iter(|| engine.evaluate_batch(black_box(reqs)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single, bench_batch);
criterion_main!(benches);
