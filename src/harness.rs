//! Micro-benchmark harness
//!
//! Each workload runs exactly once: no warm-up, no repetitions. The result
//! line is written as soon as the unit returns.

use crate::{
    error::{AppError, Result},
    models::Measurement,
    output::OutputCoordinator,
    timing::measure,
    workloads::MicroWorkload,
};
use std::hint::black_box;

/// Time `unit` once and write `"<label>: <ms>ms"`
pub fn benchmark<T, F>(output: &mut OutputCoordinator, label: &str, unit: F) -> Result<T>
where
    F: FnOnce() -> T,
{
    let (value, measurement) = measure(label, unit);
    output.measurement(&measurement)?;
    Ok(black_box(value))
}

/// Run a suite in order, checking each workload's result
pub fn run_suite(output: &mut OutputCoordinator, suite: &[MicroWorkload]) -> Result<Vec<Measurement>> {
    let mut measurements = Vec::with_capacity(suite.len());

    for workload in suite {
        let (value, measurement) = measure(workload.label, workload.run);
        output.measurement(&measurement)?;

        if black_box(value) != workload.expected {
            return Err(AppError::internal(format!(
                "{} produced {} instead of {}",
                workload.label, value, workload.expected
            )));
        }
        measurements.push(measurement);
    }

    Ok(measurements)
}
