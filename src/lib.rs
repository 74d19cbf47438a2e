//! Runtime Bench
//!
//! Micro-benchmarks and worker-spawn benchmarks used to compare language
//! runtimes: six single-threaded workloads, CPU-bound pools of 1000 workers,
//! and I/O-bound pools hitting a delay endpoint.

pub mod app;
pub mod cli;
pub mod config;
pub mod client;
pub mod error;
pub mod executor;
pub mod harness;
pub mod logging;
pub mod memory;
pub mod output;
pub mod models;
pub mod timing;
pub mod types;
pub mod workloads;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{Config, FetchConfig, SpawnConfig, Measurement, WorkerResult};
pub use executor::{Dispatcher, DispatchReport, SubmitReport};
pub use output::{OutputFormatter, ColoredFormatter, PlainFormatter, OutputCoordinator, OutputFormatterFactory};
pub use types::{BenchmarkKind, PoolKind};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Fixed workload parameters
pub mod defaults {
    use std::time::Duration;

    pub const ARITHMETIC_ITERATIONS: u64 = 1_000_000;
    pub const ARRAY_PUSH_COUNT: u64 = 100_000;
    pub const NESTED_LOOP_SIZE: u64 = 100;
    pub const STRING_CONCAT_COUNT: u64 = 10_000;
    pub const FIB_N: u64 = 25;
    pub const FUNCTIONAL_RANGE: u64 = 10_000;

    pub const SPAWN_WORKERS: u32 = 1000;
    pub const CPU_WORKER_ITERATIONS: u64 = 1_000_000;

    pub const FETCH_WORKERS: u32 = 1000;
    pub const FETCH_LITE_WORKERS: u32 = 100;
    pub const FETCH_ATTEMPTS: u32 = 5;
    pub const DELAY_ENDPOINT: &str = "https://httpbin.org/delay/1";
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

    pub const MAX_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);
    pub const MAX_WORKERS: u32 = 10_000;
}
