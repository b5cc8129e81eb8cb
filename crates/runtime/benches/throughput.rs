use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use core_sim::SimulationConfig;
use runtime::run_batch;

const BENCH_RUNS: u64 = 1_000;

fn bench_batch_throughput(c: &mut Criterion) {
    let config = SimulationConfig::default();
    let seeds: Vec<u64> = (0..BENCH_RUNS).collect();

    let mut group = c.benchmark_group("batch_throughput");
    group.throughput(Throughput::Elements(BENCH_RUNS));

    group.bench_function(BenchmarkId::new("run_batch", BENCH_RUNS), |b| {
        b.iter(|| run_batch(&config, &seeds).expect("default config should be valid"));
    });

    group.finish();
}

criterion_group!(benches, bench_batch_throughput);
criterion_main!(benches);
