//! Benchmarks for choropleth rasterization and PNG encoding.
//!
//! Run with: cargo bench --package renderer --bench choropleth_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use geo::{LineString, MultiPolygon, Polygon};
use renderer::{png, render_choropleth, MapFeature, RenderConfig};
use tract_common::{CategoryScheme, GeoId};

/// Grid of square tracts with ranks cycling 1..=3.
fn tract_grid(side: usize) -> Vec<MapFeature> {
    let size = 0.01;
    let mut features = Vec::with_capacity(side * side);
    for row in 0..side {
        for col in 0..side {
            let x = -83.3 + col as f64 * size;
            let y = 42.2 + row as f64 * size;
            let ring = LineString::from(vec![(x, y), (x + size, y), (x + size, y + size), (x, y + size), (x, y)]);
            features.push(MapFeature {
                geoid: GeoId::new(format!("26163{:06}", row * side + col)),
                category: ((row + col) % 3 + 1).to_string(),
                geometry: MultiPolygon::new(vec![Polygon::new(ring, vec![])]),
            });
        }
    }
    features
}

fn config(dpi: u32) -> RenderConfig {
    RenderConfig {
        dpi,
        ..RenderConfig::default()
    }
}

// =============================================================================
// RASTERIZATION BENCHMARKS
// =============================================================================

fn bench_render_choropleth(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_choropleth");
    group.sample_size(10);
    let scheme = CategoryScheme::opportunity();

    for side in [10usize, 30, 60] {
        let features = tract_grid(side);
        group.throughput(Throughput::Elements(features.len() as u64));
        group.bench_with_input(BenchmarkId::new("tracts_72dpi", features.len()), &features, |b, features| {
            b.iter(|| render_choropleth(black_box(features), &scheme, "Benchmark", &config(72)));
        });
    }

    group.finish();
}

// =============================================================================
// PNG ENCODING BENCHMARKS
// =============================================================================

fn bench_encode_figure(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_figure");
    group.sample_size(10);
    let scheme = CategoryScheme::opportunity();
    let features = tract_grid(30);

    for dpi in [72u32, 150] {
        let figure = match render_choropleth(&features, &scheme, "Benchmark", &config(dpi)) {
            Ok(figure) => figure,
            Err(e) => panic!("render failed: {}", e),
        };
        group.bench_with_input(BenchmarkId::new("png", dpi), &figure, |b, figure| {
            b.iter(|| figure.encode_png(black_box(0.1)));
        });
    }

    group.finish();
}

fn bench_png_auto(c: &mut Criterion) {
    let mut group = c.benchmark_group("png_auto");

    for size in [256usize, 1024] {
        let pixels: Vec<u8> = (0..size * size)
            .flat_map(|i| {
                let band = ((i % size) / 32 % 3) as u8;
                [46 + band * 80, 204 - band * 60, 113, 255]
            })
            .collect();
        group.throughput(Throughput::Bytes(pixels.len() as u64));
        group.bench_with_input(BenchmarkId::new("flat_fill", size), &pixels, |b, pixels| {
            b.iter(|| png::create_png_auto(black_box(pixels), size, size, Some(300)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_render_choropleth, bench_encode_figure, bench_png_auto);
criterion_main!(benches);
