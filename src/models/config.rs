//! Configuration data models and validation
//!
//! Workload parameters are fixed by the binaries; the structs exist so the
//! library API (and its tests) can name them and so they get validated in one
//! place.

use crate::defaults;
use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Presentation and diagnostics settings for a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose diagnostics on stderr
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug diagnostics on stderr
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Plain output with no diagnostics, as used by tests
    pub fn plain() -> Self {
        Self {
            enable_color: false,
            verbose: false,
            debug: false,
        }
    }
}

/// Parameters of the CPU-bound spawn benchmarks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnConfig {
    /// Number of workers to submit
    pub workers: u32,

    /// Counting-loop length inside each worker
    pub iterations: u64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            workers: defaults::SPAWN_WORKERS,
            iterations: defaults::CPU_WORKER_ITERATIONS,
        }
    }
}

impl SpawnConfig {
    pub fn validate(&self) -> Result<()> {
        validate_worker_count(self.workers)?;

        if self.iterations == 0 {
            return Err(AppError::validation("Worker iterations must be greater than 0"));
        }

        Ok(())
    }
}

/// Parameters of the I/O-bound fetch benchmarks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Number of workers to submit
    pub workers: u32,

    /// Sequential requests per worker
    pub attempts: u32,

    /// Delay endpoint every request is sent to
    pub endpoint: String,

    /// Client-side ceiling for a single request
    pub request_timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            workers: defaults::FETCH_WORKERS,
            attempts: defaults::FETCH_ATTEMPTS,
            endpoint: defaults::DELAY_ENDPOINT.to_string(),
            request_timeout: defaults::REQUEST_TIMEOUT,
        }
    }
}

impl FetchConfig {
    /// The 100-worker variant
    pub fn lite() -> Self {
        Self {
            workers: defaults::FETCH_LITE_WORKERS,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_worker_count(self.workers)?;

        if self.attempts == 0 {
            return Err(AppError::validation("Requests per worker must be greater than 0"));
        }

        match url::Url::parse(&self.endpoint) {
            Ok(parsed) => {
                if parsed.scheme() != "http" && parsed.scheme() != "https" {
                    return Err(AppError::validation(format!(
                        "Delay endpoint must use http or https: {}",
                        self.endpoint
                    )));
                }
            }
            Err(e) => {
                return Err(AppError::validation(format!(
                    "Invalid delay endpoint '{}': {}",
                    self.endpoint, e
                )));
            }
        }

        if self.request_timeout.is_zero() {
            return Err(AppError::validation("Request timeout must be greater than 0"));
        }

        if self.request_timeout > defaults::MAX_REQUEST_TIMEOUT {
            return Err(AppError::validation(format!(
                "Request timeout cannot exceed {} seconds",
                defaults::MAX_REQUEST_TIMEOUT.as_secs()
            )));
        }

        Ok(())
    }
}

fn validate_worker_count(workers: u32) -> Result<()> {
    if workers == 0 {
        return Err(AppError::validation("Worker count must be greater than 0"));
    }

    if workers > defaults::MAX_WORKERS {
        return Err(AppError::validation(format!(
            "Worker count cannot exceed {}",
            defaults::MAX_WORKERS
        )));
    }

    Ok(())
}

fn default_enable_color() -> bool {
    crate::cli::supports_color()
}
