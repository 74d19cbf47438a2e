//! Measurement and worker result data models

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One timed invocation, consumed immediately by a reporter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Label printed before the elapsed time
    pub name: String,

    /// Wall-clock duration in milliseconds, never negative
    pub elapsed_ms: f64,
}

impl Measurement {
    /// Create a measurement from a label and an elapsed duration
    pub fn new<S: Into<String>>(name: S, elapsed: Duration) -> Self {
        Self {
            name: name.into(),
            elapsed_ms: elapsed.as_secs_f64() * 1000.0,
        }
    }

    /// Create a measurement from a raw millisecond value, clamped at zero
    pub fn from_millis<S: Into<String>>(name: S, elapsed_ms: f64) -> Self {
        Self {
            name: name.into(),
            elapsed_ms: if elapsed_ms.is_finite() { elapsed_ms.max(0.0) } else { 0.0 },
        }
    }
}

/// Result of a single HTTP attempt inside a fetch worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttemptOutcome {
    /// The endpoint answered with 200
    Success { attempt: u32, status: u16 },
    /// Timeout, connection error or a non-200 status
    Failed { attempt: u32, error: String },
}

impl AttemptOutcome {
    /// 1-based attempt number within the worker
    pub fn attempt(&self) -> u32 {
        match self {
            Self::Success { attempt, .. } | Self::Failed { attempt, .. } => *attempt,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Error text for failed attempts
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failed { error, .. } => Some(error),
        }
    }
}

/// What a worker produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkerPayload {
    /// Sum computed by a CPU-bound worker
    Sum(u64),
    /// Per-attempt outcomes of an I/O-bound worker, in attempt order
    Requests { attempts: Vec<AttemptOutcome> },
}

/// Output of one worker unit, collected by the dispatcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerResult {
    /// 1-based worker identifier assigned at submission
    pub worker_id: u32,

    /// Computed sum or request outcomes
    pub payload: WorkerPayload,
}

impl WorkerResult {
    /// Result of a CPU-bound worker
    pub fn sum(worker_id: u32, sum: u64) -> Self {
        Self {
            worker_id,
            payload: WorkerPayload::Sum(sum),
        }
    }

    /// Result of an I/O-bound worker
    pub fn requests(worker_id: u32, attempts: Vec<AttemptOutcome>) -> Self {
        Self {
            worker_id,
            payload: WorkerPayload::Requests { attempts },
        }
    }

    /// Number of attempts recorded, successes and failures together
    pub fn request_count(&self) -> usize {
        match &self.payload {
            WorkerPayload::Sum(_) => 0,
            WorkerPayload::Requests { attempts } => attempts.len(),
        }
    }

    /// Number of failed attempts recorded
    pub fn failed_count(&self) -> usize {
        match &self.payload {
            WorkerPayload::Sum(_) => 0,
            WorkerPayload::Requests { attempts } => attempts.iter().filter(|a| !a.is_success()).count(),
        }
    }

    pub fn sum_value(&self) -> Option<u64> {
        match self.payload {
            WorkerPayload::Sum(sum) => Some(sum),
            WorkerPayload::Requests { .. } => None,
        }
    }
}

/// Attempt tally across every worker of a fetch run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestTally {
    pub succeeded: usize,
    pub failed: usize,
    /// First few distinct error messages, in the order they were seen
    pub sample_errors: Vec<String>,
}

impl RequestTally {
    const MAX_SAMPLE_ERRORS: usize = 3;

    /// Tally the outcomes of a set of worker results
    pub fn from_results(results: &[WorkerResult]) -> Self {
        let mut tally = Self::default();
        for result in results {
            if let WorkerPayload::Requests { attempts } = &result.payload {
                for attempt in attempts {
                    match attempt.error() {
                        None => tally.succeeded += 1,
                        Some(error) => {
                            tally.failed += 1;
                            if tally.sample_errors.len() < Self::MAX_SAMPLE_ERRORS
                                && !tally.sample_errors.iter().any(|e| e == error)
                            {
                                tally.sample_errors.push(error.to_string());
                            }
                        }
                    }
                }
            }
        }
        tally
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}
