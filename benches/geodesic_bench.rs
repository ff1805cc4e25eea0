use criterion::{black_box, criterion_group, criterion_main, Criterion};

use geodesic::{Caps, Ellipsoid, GeodesicLine, PolygonArea};

fn make_test_points(n: usize) -> Vec<(f64, f64)> {
    // deterministic pseudo-random scatter over the globe
    let mut points = Vec::with_capacity(n);
    let mut x: u64 = 0x9e3779b97f4a7c15;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let lat = (x >> 11) as f64 / (1u64 << 53) as f64 * 180.0 - 90.0;
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let lon = (x >> 11) as f64 / (1u64 << 53) as f64 * 360.0 - 180.0;
        points.push((lat, lon));
    }
    points
}

fn bench_direct(c: &mut Criterion) {
    let g = Ellipsoid::wgs84();
    let points = make_test_points(256);

    c.bench_function("direct", |b| {
        let mut i = 0;
        b.iter(|| {
            let (lat1, lon1) = points[i % points.len()];
            i += 1;
            black_box(g.direct(lat1, lon1, 45.0, 10_000_000.0))
        });
    });
}

fn bench_line_positions(c: &mut Criterion) {
    let g = Ellipsoid::wgs84();
    let line = GeodesicLine::new(&g, 40.0, -75.0, 45.0, Caps::STANDARD | Caps::DISTANCE_IN);

    // one line, many waypoints: the series setup is amortized
    c.bench_function("line_100_positions", |b| {
        b.iter(|| {
            for k in 0..100 {
                black_box(line.position(k as f64 * 100_000.0));
            }
        });
    });
}

fn bench_inverse(c: &mut Criterion) {
    let g = Ellipsoid::wgs84();
    let points = make_test_points(256);

    c.bench_function("inverse", |b| {
        let mut i = 0;
        b.iter(|| {
            let (lat1, lon1) = points[i % points.len()];
            let (lat2, lon2) = points[(i + 1) % points.len()];
            i += 1;
            black_box(g.inverse(lat1, lon1, lat2, lon2))
        });
    });
}

fn bench_inverse_antipodal(c: &mut Criterion) {
    let g = Ellipsoid::wgs84();

    // worst case: astroid bootstrap plus the longest Newton runs
    c.bench_function("inverse_near_antipodal", |b| {
        let mut k = 0u32;
        b.iter(|| {
            let dlat = (k % 100) as f64 * 1e-7;
            k += 1;
            black_box(g.inverse(-30.0, 0.0, 30.0 - dlat, 179.99))
        });
    });
}

fn bench_polygon(c: &mut Criterion) {
    let g = Ellipsoid::wgs84();

    // a 1024-gon approximating a circle of radius ~1000 km
    let n = 1024;
    let vertices: Vec<(f64, f64)> = (0..n)
        .map(|k| {
            let azi = 360.0 * k as f64 / n as f64 - 180.0;
            let (lat, lon, _) = g.direct(45.0, 0.0, azi, 1_000_000.0);
            (lat, lon)
        })
        .collect();

    c.bench_function("polygon_area_1024", |b| {
        b.iter(|| {
            let mut p = PolygonArea::new(&g, false);
            for &(lat, lon) in &vertices {
                p.add_point(lat, lon);
            }
            black_box(p.compute(false, true))
        });
    });
}

criterion_group!(
    benches,
    bench_direct,
    bench_line_positions,
    bench_inverse,
    bench_inverse_antipodal,
    bench_polygon
);
criterion_main!(benches);
