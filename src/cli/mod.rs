//! Command-line interface for the umbrella binary
//!
//! Only presentation and diagnostic flags are accepted. Workload sizes are
//! fixed and cannot be changed from the command line.

use crate::types::BenchmarkKind;
use clap::{Parser, Subcommand};
use std::io::IsTerminal;

/// Runtime Bench - micro-benchmarks and worker spawn benchmarks
#[derive(Parser, Debug, Clone)]
#[command(name = "rtbench")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Force colored output
    #[arg(long, global = true)]
    pub color: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log pool and worker progress to stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Log everything to stderr as JSON, with build information
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Benchmark to run
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Six single-threaded micro workloads
    Micro,
    /// Spawn 1000 CPU-bound workers and wait for all of them
    Spawn,
    /// Spawn 1000 CPU-bound workers and time submission only
    SpawnOnly,
    /// 1000 workers, 5 requests each, against httpbin.org/delay/1
    Fetch,
    /// 100 workers, 5 requests each, against httpbin.org/delay/1
    FetchLite,
    /// Same as fetch-lite, plus peak memory
    FetchLiteMemory,
}

impl Command {
    pub fn kind(&self) -> BenchmarkKind {
        match self {
            Self::Micro => BenchmarkKind::Micro,
            Self::Spawn => BenchmarkKind::Spawn,
            Self::SpawnOnly => BenchmarkKind::SpawnOnly,
            Self::Fetch => BenchmarkKind::Fetch,
            Self::FetchLite => BenchmarkKind::FetchLite,
            Self::FetchLiteMemory => BenchmarkKind::FetchLiteMemory,
        }
    }
}

impl Cli {
    /// Validate CLI arguments for conflicts
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }
        Ok(())
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            supports_color()
        }
    }

    pub fn kind(&self) -> BenchmarkKind {
        self.command.kind()
    }
}

/// Check if standard output can show color
pub fn supports_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    std::io::stdout().is_terminal()
}
