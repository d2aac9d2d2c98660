//! Simulation benchmarks for siege_core.
//!
//! Run with: `cargo bench -p siege_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use siege_core::simulation::Simulation;
use siege_test_utils::fixtures::{economy_scenario, raid_scenario};

/// Tick throughput for raids of increasing size.
pub fn tick_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");
    for (structures, units) in [(9, 20), (25, 100), (100, 500)] {
        let base = raid_scenario(structures, units);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{structures}x{units}")),
            &base,
            |b, base| {
                b.iter_batched(
                    || base.clone(),
                    |mut sim: Simulation| {
                        for _ in 0..60 {
                            black_box(sim.tick());
                        }
                        sim
                    },
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }
    group.finish();
}

/// Cost of hashing and snapshotting a populated battlefield.
pub fn view_benchmark(c: &mut Criterion) {
    let sim = raid_scenario(100, 500);
    c.bench_function("state_hash", |b| b.iter(|| black_box(sim.state_hash())));
    c.bench_function("snapshot", |b| b.iter(|| black_box(sim.snapshot())));

    let mut economy = economy_scenario();
    c.bench_function("accrue_resources", |b| {
        b.iter(|| black_box(economy.accrue_resources()));
    });
}

criterion_group!(benches, tick_benchmark, view_benchmark);
criterion_main!(benches);
