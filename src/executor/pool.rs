//! Scoped worker pools
//!
//! A [`WorkerPool`] owns a dedicated tokio runtime. CPU pools run units on the
//! runtime's blocking threads, capped at the logical CPU count. I/O pools run
//! units as async tasks admitted by a semaphore sized to the worker count.
//!
//! Submission never waits for a unit to start: both `submit_*` methods return
//! a handle as soon as the runtime has accepted the unit.

use crate::{
    error::{AppError, Result},
    models::WorkerResult,
    types::PoolKind,
};
use futures::stream::{FuturesUnordered, StreamExt};
use std::{future::Future, sync::Arc};
use tokio::{
    runtime::{Builder, Runtime},
    sync::Semaphore,
    task::JoinHandle,
};

/// Handle to one submitted unit
pub type WorkerHandle = JoinHandle<WorkerResult>;

/// System resource information used to size pools
#[derive(Debug, Clone)]
pub struct SystemResources {
    /// Number of logical CPU cores
    pub cpu_cores: usize,
    /// Number of physical CPU cores
    pub physical_cores: usize,
}

impl SystemResources {
    /// Detect system resources
    pub fn detect() -> Self {
        Self {
            cpu_cores: num_cpus::get().max(1),
            physical_cores: num_cpus::get_physical().max(1),
        }
    }
}

/// Configuration for a worker pool
#[derive(Debug, Clone, PartialEq)]
pub struct PoolConfig {
    /// What the pool runs
    pub kind: PoolKind,
    /// Maximum units executing at the same time
    pub capacity: usize,
    /// Async scheduler threads driving the runtime
    pub scheduler_threads: usize,
}

impl PoolConfig {
    /// One OS thread per logical CPU
    pub fn cpu() -> Self {
        let resources = SystemResources::detect();
        Self {
            kind: PoolKind::Cpu,
            capacity: resources.cpu_cores,
            scheduler_threads: 1,
        }
    }

    /// Room for every worker to be in flight at once
    pub fn io(workers: u32) -> Self {
        let resources = SystemResources::detect();
        Self {
            kind: PoolKind::Io,
            capacity: (workers as usize).max(1),
            scheduler_threads: resources.cpu_cores,
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(AppError::pool("Pool capacity must be greater than 0"));
        }
        if self.scheduler_threads == 0 {
            return Err(AppError::pool("Pool needs at least one scheduler thread"));
        }
        Ok(())
    }
}

/// Worker pool backed by its own tokio runtime
pub struct WorkerPool {
    runtime: Runtime,
    config: PoolConfig,
    admission: Arc<Semaphore>,
}

impl WorkerPool {
    /// Build the runtime; fails only if the OS refuses threads
    pub fn new(config: PoolConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Builder::new_multi_thread();
        builder
            .worker_threads(config.scheduler_threads)
            .thread_name(format!("rtbench-{}", config.kind.as_str()));

        match config.kind {
            PoolKind::Cpu => {
                builder.max_blocking_threads(config.capacity);
            }
            PoolKind::Io => {
                builder.enable_all();
            }
        }

        let runtime = builder
            .build()
            .map_err(|e| AppError::pool(format!("Failed to build {} pool: {}", config.kind.as_str(), e)))?;

        Ok(Self {
            runtime,
            admission: Arc::new(Semaphore::new(config.capacity)),
            config,
        })
    }

    pub fn kind(&self) -> PoolKind {
        self.config.kind
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Queue a CPU-bound unit on the blocking threads
    pub fn submit_blocking<F>(&self, unit: F) -> WorkerHandle
    where
        F: FnOnce() -> WorkerResult + Send + 'static,
    {
        self.runtime.spawn_blocking(unit)
    }

    /// Queue an async unit; it starts once an admission permit is free
    pub fn submit_async<Fut>(&self, unit: Fut) -> WorkerHandle
    where
        Fut: Future<Output = WorkerResult> + Send + 'static,
    {
        let admission = Arc::clone(&self.admission);
        self.runtime.spawn(async move {
            // The semaphore is never closed, so acquiring cannot fail.
            let _permit = admission.acquire_owned().await.ok();
            unit.await
        })
    }

    /// Wait for every handle, in completion order
    ///
    /// `on_complete` sees each result as it arrives. A panicked unit is a
    /// fatal error.
    pub fn collect<C>(&self, handles: Vec<WorkerHandle>, mut on_complete: C) -> Result<Vec<WorkerResult>>
    where
        C: FnMut(&WorkerResult, usize),
    {
        let total = handles.len();
        self.runtime.block_on(async move {
            let mut pending: FuturesUnordered<WorkerHandle> = handles.into_iter().collect();
            let mut results = Vec::with_capacity(total);
            while let Some(joined) = pending.next().await {
                let result = joined?;
                results.push(result);
                if let Some(last) = results.last() {
                    on_complete(last, results.len());
                }
            }
            Ok::<_, AppError>(results)
        })
    }

    /// Release the pool, waiting for running units to return
    pub fn release(self) {
        drop(self.runtime);
    }

    /// Release the pool without waiting; units that never started are dropped
    pub fn abandon(self) {
        self.runtime.shutdown_background();
    }
}
