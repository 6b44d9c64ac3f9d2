//! Generation and validation benchmarks.
//!
//! Run with: cargo bench --bench generation_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use soc_synth::output::{pools_table, timeseries_table};
use soc_synth::prelude::*;

/// Full pipeline across horizon lengths.
fn bench_generate_dataset(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_dataset");
    group.sample_size(100);
    group.confidence_level(0.95);

    for years in [25, 100, 500].iter() {
        let config = ScenarioConfig::builder().seed(42).years(2000, 2000 + years).build();
        group.bench_with_input(BenchmarkId::new("years", years), &config, |b, cfg| {
            b.iter(|| black_box(SyntheticDataset::generate(cfg)));
        });
    }

    group.finish();
}

/// CSV rendering of a default dataset.
fn bench_render_csv(c: &mut Criterion) {
    let dataset = SyntheticDataset::generate(&ScenarioConfig::default());
    c.bench_function("render_csv", |b| {
        b.iter(|| black_box(dataset.to_csv_strings()));
    });
}

/// Pool consistency over a default dataset.
fn bench_pool_consistency(c: &mut Criterion) {
    let dataset = SyntheticDataset::generate(&ScenarioConfig::default());
    let timeseries = timeseries_table(&dataset.timeseries);
    let pools = pools_table(&dataset.pools);
    c.bench_function("pool_consistency_check", |b| {
        b.iter(|| black_box(pool_consistency_check(&pools, &timeseries)));
    });
}

criterion_group!(
    benches,
    bench_generate_dataset,
    bench_render_csv,
    bench_pool_consistency
);
criterion_main!(benches);
