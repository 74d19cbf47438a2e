//! Data models and structures for the benchmark runner

pub mod config;
pub mod metrics;

// Re-export main model types
pub use config::{Config, FetchConfig, SpawnConfig};
pub use metrics::{AttemptOutcome, Measurement, RequestTally, WorkerPayload, WorkerResult};
