//! Worker dispatch engine
//!
//! This module contains the dispatch components:
//! - Scoped worker pools for CPU-bound and I/O-bound units
//! - A dispatcher that submits N units, times each phase and accounts for
//!   every result before anything is reported

pub mod pool;

pub use pool::{PoolConfig, SystemResources, WorkerHandle, WorkerPool};

use crate::{
    client::{fetch_worker, HttpClient},
    error::{AppError, Result},
    logging::DispatchLogger,
    memory::{self, PeakSampler},
    models::{FetchConfig, RequestTally, SpawnConfig, WorkerResult},
    timing::Stopwatch,
    workloads,
};
use std::{future::Future, sync::Arc};

/// Timings and results of a dispatch that waited for every worker
#[derive(Debug, Clone)]
pub struct DispatchReport {
    /// Units handed to the pool
    pub submitted: usize,
    /// Start of the first submission to the last one accepted
    pub submit_ms: f64,
    /// End of submission to the last result collected
    pub wait_ms: f64,
    /// Pool creation to pool release
    pub total_ms: f64,
    /// One result per worker, in completion order
    pub results: Vec<WorkerResult>,
    /// Highest process peak seen while the pool was alive
    pub peak_memory_bytes: Option<u64>,
}

impl DispatchReport {
    pub fn completed(&self) -> usize {
        self.results.len()
    }

    /// Wait interval divided evenly across the submitted workers
    pub fn average_wait_ms(&self) -> f64 {
        if self.submitted == 0 {
            0.0
        } else {
            self.wait_ms / self.submitted as f64
        }
    }

    pub fn request_tally(&self) -> RequestTally {
        RequestTally::from_results(&self.results)
    }
}

/// Result of a dispatch that released its pool right after submission
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubmitReport {
    pub submitted: usize,
    pub submit_ms: f64,
}

/// Submits worker units to scoped pools and collects their results
#[derive(Debug, Clone)]
pub struct Dispatcher {
    logger: DispatchLogger,
}

impl Dispatcher {
    pub fn new(logger: DispatchLogger) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &DispatchLogger {
        &self.logger
    }

    /// CPU-bound spawn benchmark: every worker must report the closed-form sum
    pub fn spawn(&self, config: &SpawnConfig) -> Result<DispatchReport> {
        config.validate()?;

        let iterations = config.iterations;
        let report = self.run_blocking(PoolConfig::cpu(), config.workers, move |id| {
            workloads::cpu_worker(id, iterations)
        })?;

        verify_sums(&report.results, workloads::count_mod_ten_expected(iterations))?;
        Ok(report)
    }

    /// CPU-bound spawn benchmark that stops the clock once submission is done
    pub fn spawn_submit_only(&self, config: &SpawnConfig) -> Result<SubmitReport> {
        config.validate()?;

        let iterations = config.iterations;
        self.submit_blocking_only(PoolConfig::cpu(), config.workers, move |id| {
            workloads::cpu_worker(id, iterations)
        })
    }

    /// I/O-bound fetch benchmark
    ///
    /// Request failures stay inside each worker's result; only a lost worker
    /// or a worker with the wrong number of attempts is an error.
    pub fn fetch(
        &self,
        config: &FetchConfig,
        client: Arc<dyn HttpClient>,
        track_memory: bool,
    ) -> Result<DispatchReport> {
        config.validate()?;
        if track_memory && !memory::is_tracking() {
            self.logger.log_memory_untracked();
        }

        let endpoint: Arc<str> = Arc::from(config.endpoint.as_str());
        let attempts = config.attempts;
        let logger = self.logger.clone();

        let report = self.run_async(
            PoolConfig::io(config.workers),
            config.workers,
            move |id| {
                let client = Arc::clone(&client);
                let endpoint = Arc::clone(&endpoint);
                let logger = logger.clone();
                async move { fetch_worker(client.as_ref(), id, &endpoint, attempts, Some(&logger)).await }
            },
            track_memory,
        )?;

        verify_attempts(&report.results, attempts)?;
        self.logger.log_request_tally(&report.request_tally());
        Ok(report)
    }

    /// Run `workers` blocking units, ids 1 through `workers`, and wait for all
    pub fn run_blocking<F>(&self, pool_config: PoolConfig, workers: u32, unit: F) -> Result<DispatchReport>
    where
        F: Fn(u32) -> WorkerResult + Send + Sync + 'static,
    {
        let total = Stopwatch::start();
        let pool = self.create_pool(pool_config)?;
        let unit = Arc::new(unit);

        let submit = Stopwatch::start();
        let handles: Vec<WorkerHandle> = (1..=workers)
            .map(|id| {
                let unit = Arc::clone(&unit);
                pool.submit_blocking(move || unit(id))
            })
            .collect();
        let submit_ms = submit.elapsed_ms();

        self.finish(pool, handles, submit_ms, total, None)
    }

    /// Run `workers` async units, ids 1 through `workers`, and wait for all
    pub fn run_async<F, Fut>(
        &self,
        pool_config: PoolConfig,
        workers: u32,
        unit: F,
        track_memory: bool,
    ) -> Result<DispatchReport>
    where
        F: Fn(u32) -> Fut,
        Fut: Future<Output = WorkerResult> + Send + 'static,
    {
        let mut sampler = track_memory.then(PeakSampler::start);
        let total = Stopwatch::start();
        let pool = self.create_pool(pool_config)?;

        let submit = Stopwatch::start();
        let handles: Vec<WorkerHandle> = (1..=workers).map(|id| pool.submit_async(unit(id))).collect();
        let submit_ms = submit.elapsed_ms();

        self.finish(pool, handles, submit_ms, total, sampler.as_mut())
    }

    /// Submit blocking units, then release the pool without waiting
    pub fn submit_blocking_only<F>(&self, pool_config: PoolConfig, workers: u32, unit: F) -> Result<SubmitReport>
    where
        F: Fn(u32) -> WorkerResult + Send + Sync + 'static,
    {
        let pool = self.create_pool(pool_config)?;
        let unit = Arc::new(unit);

        let submit = Stopwatch::start();
        let handles: Vec<WorkerHandle> = (1..=workers)
            .map(|id| {
                let unit = Arc::clone(&unit);
                pool.submit_blocking(move || unit(id))
            })
            .collect();
        let submit_ms = submit.elapsed_ms();

        let submitted = handles.len();
        self.logger.log_submitted(submitted, submit_ms);
        if submitted != workers as usize {
            return Err(AppError::accounting(format!(
                "Submitted {} of {} workers",
                submitted, workers
            )));
        }

        let pending = handles.iter().filter(|handle| !handle.is_finished()).count();
        drop(handles);
        pool.abandon();
        self.logger.log_abandoned(pending);

        Ok(SubmitReport { submitted, submit_ms })
    }

    fn create_pool(&self, config: PoolConfig) -> Result<WorkerPool> {
        let pool = WorkerPool::new(config)?;
        self.logger.log_pool_created(pool.kind(), pool.capacity());
        Ok(pool)
    }

    fn finish(
        &self,
        pool: WorkerPool,
        handles: Vec<WorkerHandle>,
        submit_ms: f64,
        total: Stopwatch,
        mut sampler: Option<&mut PeakSampler>,
    ) -> Result<DispatchReport> {
        let submitted = handles.len();
        self.logger.log_submitted(submitted, submit_ms);

        let wait = Stopwatch::start();
        let collected = pool.collect(handles, |result, completed| {
            self.logger.log_worker_completed(result.worker_id, completed, submitted);
            if let Some(sampler) = sampler.as_deref_mut() {
                sampler.sample();
            }
        });
        let wait_ms = wait.elapsed_ms();

        pool.release();
        let results = collected?;
        let total_ms = total.elapsed_ms();

        let peak_memory_bytes = sampler.map(|sampler| {
            sampler.sample();
            sampler.max_peak_bytes()
        });

        verify_accounting(submitted, &results)?;

        Ok(DispatchReport {
            submitted,
            submit_ms,
            wait_ms,
            total_ms,
            results,
            peak_memory_bytes,
        })
    }
}

/// Every submitted worker id 1..=N appears exactly once
pub fn verify_accounting(submitted: usize, results: &[WorkerResult]) -> Result<()> {
    if results.len() != submitted {
        return Err(AppError::accounting(format!(
            "Collected {} results for {} submitted workers",
            results.len(),
            submitted
        )));
    }

    let mut seen = vec![false; submitted];
    for result in results {
        let index = (result.worker_id as usize).wrapping_sub(1);
        match seen.get_mut(index) {
            Some(slot) if !*slot => *slot = true,
            Some(_) => {
                return Err(AppError::accounting(format!(
                    "Worker {} reported more than once",
                    result.worker_id
                )))
            }
            None => {
                return Err(AppError::accounting(format!(
                    "Worker id {} is outside 1..={}",
                    result.worker_id, submitted
                )))
            }
        }
    }

    Ok(())
}

/// Every CPU worker computed `expected`
pub fn verify_sums(results: &[WorkerResult], expected: u64) -> Result<()> {
    for result in results {
        match result.sum_value() {
            Some(sum) if sum == expected => {}
            Some(sum) => {
                return Err(AppError::accounting(format!(
                    "Worker {} computed {} instead of {}",
                    result.worker_id, sum, expected
                )))
            }
            None => {
                return Err(AppError::accounting(format!(
                    "Worker {} returned no sum",
                    result.worker_id
                )))
            }
        }
    }
    Ok(())
}

/// Every fetch worker recorded exactly `attempts` outcomes
pub fn verify_attempts(results: &[WorkerResult], attempts: u32) -> Result<()> {
    match results
        .iter()
        .find(|result| result.request_count() != attempts as usize)
    {
        Some(result) => Err(AppError::accounting(format!(
            "Worker {} recorded {} attempts instead of {}",
            result.worker_id,
            result.request_count(),
            attempts
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::Logger;
    use crate::models::{AttemptOutcome, Config};
    use crate::output::SharedBuffer;
    use async_trait::async_trait;
    use std::time::Duration;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(DispatchLogger::new(&Config::plain()))
    }

    struct AlwaysOk;

    #[async_trait]
    impl HttpClient for AlwaysOk {
        async fn get_status(&self, _url: &str) -> Result<u16> {
            tokio::time::sleep(Duration::from_millis(1)).await;
            Ok(200)
        }
    }

    struct AlwaysFails;

    #[async_trait]
    impl HttpClient for AlwaysFails {
        async fn get_status(&self, _url: &str) -> Result<u16> {
            Err(AppError::network("connection refused"))
        }
    }

    fn small_fetch(workers: u32) -> FetchConfig {
        FetchConfig {
            workers,
            attempts: 5,
            endpoint: "http://localhost/delay/1".to_string(),
            ..FetchConfig::default()
        }
    }

    #[test]
    fn test_spawn_collects_every_worker() {
        for workers in [100, 1000] {
            let config = SpawnConfig { workers, iterations: 1_000 };
            let report = dispatcher().spawn(&config).unwrap();

            assert_eq!(report.submitted, workers as usize);
            assert_eq!(report.completed(), workers as usize);
            assert!(report.results.iter().all(|r| r.sum_value() == Some(4_500)));
            assert!(report.submit_ms <= report.total_ms);
            assert!(report.wait_ms <= report.total_ms);
            assert!(report.peak_memory_bytes.is_none());
        }
    }

    #[test]
    fn test_submit_only_returns_before_workers_finish() {
        let started = std::time::Instant::now();
        let report = dispatcher()
            .submit_blocking_only(PoolConfig::cpu().with_capacity(1), 20, |id| {
                std::thread::sleep(Duration::from_millis(50));
                WorkerResult::sum(id, 0)
            })
            .unwrap();

        assert_eq!(report.submitted, 20);
        // Serially the units would need a full second.
        assert!(started.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn test_spawn_submit_only_counts() {
        let config = SpawnConfig { workers: 1000, iterations: 1_000 };
        let report = dispatcher().spawn_submit_only(&config).unwrap();
        assert_eq!(report.submitted, 1000);
        assert!(report.submit_ms >= 0.0);
    }

    #[test]
    fn test_panicking_worker_fails_the_run() {
        let error = dispatcher()
            .run_blocking(PoolConfig::cpu(), 10, |id| {
                if id == 7 {
                    panic!("worker 7 failed");
                }
                WorkerResult::sum(id, 0)
            })
            .unwrap_err();
        assert!(matches!(error, AppError::Worker(_)));
    }

    #[test]
    fn test_fetch_records_all_attempts() {
        let report = dispatcher()
            .fetch(&small_fetch(100), Arc::new(AlwaysOk), false)
            .unwrap();

        assert_eq!(report.completed(), 100);
        let tally = report.request_tally();
        assert_eq!(tally.succeeded, 500);
        assert_eq!(tally.failed, 0);
        assert!((report.average_wait_ms() - report.wait_ms / 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fetch_failures_do_not_abort() {
        let report = dispatcher()
            .fetch(&small_fetch(10), Arc::new(AlwaysFails), false)
            .unwrap();

        assert_eq!(report.completed(), 10);
        let tally = report.request_tally();
        assert_eq!(tally.succeeded, 0);
        assert_eq!(tally.failed, 50);
        assert_eq!(tally.sample_errors.len(), 1);
    }

    #[test]
    fn test_fetch_reports_memory_when_asked() {
        let report = dispatcher()
            .fetch(&small_fetch(5), Arc::new(AlwaysOk), true)
            .unwrap();
        assert!(report.peak_memory_bytes.is_some());
    }

    #[test]
    fn test_untracked_memory_request_warns() {
        // Unit tests run on the system allocator
        let buffer = SharedBuffer::new();
        let logger = Logger::new("DISPATCH".to_string()).with_buffer(buffer.clone());
        let dispatcher = Dispatcher::new(DispatchLogger::from_logger(logger));

        dispatcher.fetch(&small_fetch(5), Arc::new(AlwaysOk), true).unwrap();
        assert!(buffer.contents().contains("tracking allocator is not installed"));

        let quiet = SharedBuffer::new();
        let logger = Logger::new("DISPATCH".to_string()).with_buffer(quiet.clone());
        Dispatcher::new(DispatchLogger::from_logger(logger))
            .fetch(&small_fetch(5), Arc::new(AlwaysOk), false)
            .unwrap();
        assert!(!quiet.contents().contains("tracking allocator"));
    }

    #[test]
    fn test_invalid_config_is_rejected_before_dispatch() {
        let config = SpawnConfig { workers: 0, iterations: 10 };
        assert!(matches!(dispatcher().spawn(&config), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_verify_accounting() {
        let results = vec![WorkerResult::sum(1, 0), WorkerResult::sum(2, 0)];
        assert!(verify_accounting(2, &results).is_ok());
        assert!(verify_accounting(3, &results).is_err());

        let duplicated = vec![WorkerResult::sum(1, 0), WorkerResult::sum(1, 0)];
        assert!(matches!(verify_accounting(2, &duplicated), Err(AppError::Accounting(_))));

        let out_of_range = vec![WorkerResult::sum(0, 0)];
        assert!(verify_accounting(1, &out_of_range).is_err());
    }

    #[test]
    fn test_verify_sums_and_attempts() {
        let results = vec![WorkerResult::sum(1, 45), WorkerResult::sum(2, 44)];
        assert!(verify_sums(&results[..1], 45).is_ok());
        assert!(verify_sums(&results, 45).is_err());

        let short = vec![WorkerResult::requests(
            1,
            vec![AttemptOutcome::Success { attempt: 1, status: 200 }],
        )];
        assert!(verify_attempts(&short, 1).is_ok());
        assert!(verify_attempts(&short, 5).is_err());
    }
}
