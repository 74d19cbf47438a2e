//! Type definitions and aliases

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// The benchmark programs shipped by this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BenchmarkKind {
    /// Six single-threaded micro workloads, timed one after another
    Micro,
    /// 1000 CPU-bound workers, submit and complete
    Spawn,
    /// 1000 CPU-bound workers, submit time only
    SpawnOnly,
    /// 1000 I/O-bound workers against the delay endpoint
    Fetch,
    /// 100 I/O-bound workers against the delay endpoint
    FetchLite,
    /// 100 I/O-bound workers with peak memory tracking
    FetchLiteMemory,
}

impl BenchmarkKind {
    /// Banner printed as the first line of the benchmark's output
    pub fn title(&self) -> &'static str {
        match self {
            Self::Micro => "=== Rust Benchmarks ===",
            Self::Spawn => "=== Rust Spawn Benchmark ===",
            Self::SpawnOnly => "=== Rust Spawn Benchmark (spawn time only) ===",
            Self::Fetch => "=== Rust I/O-Bound Benchmark ===",
            Self::FetchLite | Self::FetchLiteMemory => "=== Rust I/O-Bound Benchmark (100 workers) ===",
        }
    }

    /// Name of the standalone binary that runs this benchmark
    pub fn binary_name(&self) -> &'static str {
        match self {
            Self::Micro => "bench",
            Self::Spawn => "spawn-bench",
            Self::SpawnOnly => "spawn-bench-spawn-only",
            Self::Fetch => "spawn-bench-fetch",
            Self::FetchLite => "spawn-bench-fetch-lite",
            Self::FetchLiteMemory => "spawn-bench-fetch-lite-memory",
        }
    }

    /// Which kind of pool the benchmark dispatches onto, if any
    pub fn pool_kind(&self) -> Option<PoolKind> {
        match self {
            Self::Micro => None,
            Self::Spawn | Self::SpawnOnly => Some(PoolKind::Cpu),
            Self::Fetch | Self::FetchLite | Self::FetchLiteMemory => Some(PoolKind::Io),
        }
    }
}

/// Concurrency facility a dispatcher runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolKind {
    /// OS threads for CPU-bound work, capped at the logical CPU count
    Cpu,
    /// Async tasks for I/O-bound work, admitted up to the worker count
    Io,
}

impl PoolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Io => "io",
        }
    }
}
