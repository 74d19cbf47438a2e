//! Criterion benchmarks for the workloads and dispatch paths
//!
//! The single-shot binaries measure one run each; these repeat the same units
//! under criterion to show their variance.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use runtime_bench::{
    cli::Cli,
    config::ConfigParser,
    executor::{Dispatcher, PoolConfig},
    logging::DispatchLogger,
    models::{Config, Measurement, SpawnConfig, WorkerResult},
    output::{measurement_line, OutputFormatterFactory},
    workloads::{self, MICRO_SUITE},
};
use clap::Parser;
use std::hint::black_box;

fn quiet_dispatcher() -> Dispatcher {
    Dispatcher::new(DispatchLogger::new(&Config::plain()))
}

/// Each micro workload on its own
fn benchmark_micro_suite(c: &mut Criterion) {
    let mut group = c.benchmark_group("micro_suite");

    for workload in MICRO_SUITE.iter() {
        group.bench_function(workload.label, |b| {
            b.iter(|| black_box((workload.run)()));
        });
    }

    group.finish();
}

/// The CPU worker body at a few loop lengths
fn benchmark_cpu_worker(c: &mut Criterion) {
    let mut group = c.benchmark_group("cpu_worker");

    for iterations in [1_000u64, 100_000, 1_000_000] {
        group.bench_with_input(BenchmarkId::from_parameter(iterations), &iterations, |b, &n| {
            b.iter(|| black_box(workloads::cpu_worker(1, black_box(n))));
        });
    }

    group.finish();
}

/// Pool creation, submission and collection, with small worker bodies
fn benchmark_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    group.sample_size(20);

    for workers in [100u32, 1000] {
        group.bench_with_input(BenchmarkId::new("spawn", workers), &workers, |b, &n| {
            let config = SpawnConfig { workers: n, iterations: 1_000 };
            b.iter(|| black_box(quiet_dispatcher().spawn(&config).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("submit_only", workers), &workers, |b, &n| {
            let config = SpawnConfig { workers: n, iterations: 1_000 };
            b.iter(|| black_box(quiet_dispatcher().spawn_submit_only(&config).unwrap()));
        });
    }

    group.bench_function("empty_async_units", |b| {
        b.iter(|| {
            let report = quiet_dispatcher()
                .run_async(
                    PoolConfig::io(100),
                    100,
                    |id| async move { WorkerResult::requests(id, Vec::new()) },
                    false,
                )
                .unwrap();
            black_box(report);
        });
    });

    group.finish();
}

/// Result line formatting and argument parsing
fn benchmark_reporting(c: &mut Criterion) {
    let mut group = c.benchmark_group("reporting");

    group.bench_function("measurement_line", |b| {
        let measurement = Measurement::from_millis("Spawn and complete 1000 workers", 812.437);
        b.iter(|| black_box(measurement_line(black_box(&measurement))));
    });

    group.bench_function("colored_measurement", |b| {
        let formatter = OutputFormatterFactory::create_formatter(true);
        let measurement = Measurement::from_millis("Wait for completion", 5034.2);
        b.iter(|| black_box(formatter.format_measurement(black_box(&measurement)).unwrap()));
    });

    group.bench_function("parse_cli_args", |b| {
        let args = vec!["rtbench", "fetch-lite", "--no-color", "--verbose"];
        b.iter(|| {
            let cli = Cli::try_parse_from(black_box(&args)).unwrap();
            let config = ConfigParser::new(&cli).parse().unwrap();
            black_box(config);
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_micro_suite,
    benchmark_cpu_worker,
    benchmark_dispatch,
    benchmark_reporting
);

criterion_main!(benches);
