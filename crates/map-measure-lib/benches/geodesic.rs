//! Performance benchmarks for the geodesic measurement math
//!
//! Run with: cargo bench --package map-measure-lib

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use geo::Point;
use map_measure_lib::{haversine_distance, lat_lng, path_length, ring_area, ring_perimeter};

/// Generate a wandering polyline with the specified number of points.
fn generate_path(num_points: usize, base_lat: f64, base_lng: f64) -> Vec<Point<f64>> {
    (0..num_points)
        .map(|i| {
            let t = i as f64 / num_points as f64;
            lat_lng(
                base_lat + t * 0.1 + (t * 50.0).sin() * 0.001,
                base_lng + t * 0.1 + (t * 30.0).cos() * 0.001,
            )
        })
        .collect()
}

/// Generate a closed ring approximating a circle of the given radius (meters).
fn generate_ring(num_points: usize, center_lat: f64, center_lng: f64, radius_m: f64) -> Vec<Point<f64>> {
    let dlat = radius_m / 111_320.0;
    let dlng = dlat / center_lat.to_radians().cos();
    (0..num_points)
        .map(|i| {
            let angle = i as f64 / num_points as f64 * std::f64::consts::TAU;
            lat_lng(
                center_lat + angle.sin() * dlat,
                center_lng + angle.cos() * dlng,
            )
        })
        .collect()
}

fn bench_distance(c: &mut Criterion) {
    let london = lat_lng(51.5074, -0.1278);
    let paris = lat_lng(48.8566, 2.3522);

    c.bench_function("haversine_distance", |b| {
        b.iter(|| haversine_distance(std::hint::black_box(london), std::hint::black_box(paris)))
    });
}

fn bench_path_length(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_length");
    for num_points in [10, 1_000, 100_000] {
        let path = generate_path(num_points, 51.5, -0.1);
        group.throughput(Throughput::Elements(num_points as u64));
        group.bench_with_input(BenchmarkId::from_parameter(num_points), &path, |b, path| {
            b.iter(|| path_length(std::hint::black_box(path)))
        });
    }
    group.finish();
}

fn bench_ring(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring");
    for num_points in [4, 100, 10_000] {
        let ring = generate_ring(num_points, 45.0, 7.0, 1_000.0);
        group.bench_with_input(
            BenchmarkId::new("area", num_points),
            &ring,
            |b, ring| b.iter(|| ring_area(std::hint::black_box(ring))),
        );
        group.bench_with_input(
            BenchmarkId::new("perimeter", num_points),
            &ring,
            |b, ring| b.iter(|| ring_perimeter(std::hint::black_box(ring))),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_distance, bench_path_length, bench_ring);
criterion_main!(benches);
