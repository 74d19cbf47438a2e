//! Scoped wall-clock timing
//!
//! A [`Stopwatch`] is started immediately before a unit of work and read
//! immediately after it. There is no process-wide timing state.

use crate::models::Measurement;
use std::time::{Duration, Instant};

/// Monotonic stopwatch started at construction
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started_at: Instant,
}

impl Stopwatch {
    /// Sample the clock now
    pub fn start() -> Self {
        Self {
            started_at: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1000.0
    }

    /// Freeze the current reading under a label
    pub fn measurement<S: Into<String>>(&self, name: S) -> Measurement {
        Measurement::new(name, self.elapsed())
    }

    /// Start instant, for computing intervals between two stopwatches
    pub fn started_at(&self) -> Instant {
        self.started_at
    }
}

/// Run `unit` exactly once and time it
///
/// Panics inside `unit` are not caught.
pub fn measure<T, F>(name: &str, unit: F) -> (T, Measurement)
where
    F: FnOnce() -> T,
{
    let stopwatch = Stopwatch::start();
    let value = unit();
    let measurement = stopwatch.measurement(name);
    (value, measurement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_measure_runs_unit_once() {
        let calls = Cell::new(0);
        let (value, measurement) = measure("once", || {
            calls.set(calls.get() + 1);
            42
        });
        assert_eq!(value, 42);
        assert_eq!(calls.get(), 1);
        assert_eq!(measurement.name, "once");
        assert!(measurement.elapsed_ms >= 0.0);
    }

    #[test]
    fn test_measure_covers_the_work() {
        let (_, measurement) = measure("sleep", || std::thread::sleep(Duration::from_millis(20)));
        assert!(measurement.elapsed_ms >= 20.0, "got {}", measurement.elapsed_ms);
    }

    #[test]
    fn test_stopwatch_is_monotonic() {
        let stopwatch = Stopwatch::start();
        let first = stopwatch.elapsed();
        let second = stopwatch.elapsed();
        assert!(second >= first);
    }

    #[test]
    #[should_panic(expected = "workload failed")]
    fn test_measure_does_not_swallow_panics() {
        let _ = measure("crash", || -> u64 { panic!("workload failed") });
    }
}
