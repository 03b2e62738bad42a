//! Benchmarks comparing the refinement, decimation, and racing converters

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use terratin_conversion::{combined_convert, fjallstrom_convert, lee_convert};
use terratin_generate::generate_correlated_raster;

fn bench_conversion(c: &mut Criterion) {
    let raster = generate_correlated_raster(16, 500).expect("raster generation");
    let bounds = [0.05, 0.3, 0.8];

    let mut group = c.benchmark_group("conversion");

    for &max_error in &bounds {
        group.bench_with_input(
            BenchmarkId::new("fjallstrom", max_error),
            &max_error,
            |b, &max_error| {
                b.iter(|| fjallstrom_convert(black_box(&raster), black_box(max_error)))
            },
        );
        group.bench_with_input(
            BenchmarkId::new("lee", max_error),
            &max_error,
            |b, &max_error| b.iter(|| lee_convert(black_box(&raster), black_box(max_error))),
        );
        group.bench_with_input(
            BenchmarkId::new("combined", max_error),
            &max_error,
            |b, &max_error| b.iter(|| combined_convert(black_box(&raster), black_box(max_error))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_conversion);
criterion_main!(benches);
