//! Process-wide allocation tracking
//!
//! [`TrackingAllocator`] wraps the system allocator and keeps live and peak
//! byte counts. It only takes effect in binaries that install it:
//!
//! ```ignore
//! #[global_allocator]
//! static GLOBAL: runtime_bench::memory::TrackingAllocator = runtime_bench::memory::TrackingAllocator;
//! ```
//!
//! Numbers are a coarse process-wide probe, not per-worker attribution.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

static CURRENT_BYTES: AtomicUsize = AtomicUsize::new(0);
static PEAK_BYTES: AtomicUsize = AtomicUsize::new(0);
static ALLOC_COUNT: AtomicU64 = AtomicU64::new(0);

/// Global allocator wrapper that counts live and peak bytes
pub struct TrackingAllocator;

unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc_zeroed(layout) };
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) };
        CURRENT_BYTES.fetch_sub(layout.size(), Ordering::Relaxed);
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = unsafe { System.realloc(ptr, layout, new_size) };
        if !new_ptr.is_null() {
            CURRENT_BYTES.fetch_sub(layout.size(), Ordering::Relaxed);
            record_alloc(new_size);
        }
        new_ptr
    }
}

fn record_alloc(size: usize) {
    let current = CURRENT_BYTES.fetch_add(size, Ordering::Relaxed) + size;
    PEAK_BYTES.fetch_max(current, Ordering::Relaxed);
    ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
}

/// Counter values at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemorySnapshot {
    /// Bytes currently allocated
    pub current_bytes: u64,
    /// Highest allocated byte count since the last peak reset
    pub peak_bytes: u64,
    /// Allocations observed since process start
    pub allocations: u64,
}

/// Read the counters
pub fn snapshot() -> MemorySnapshot {
    MemorySnapshot {
        current_bytes: CURRENT_BYTES.load(Ordering::Relaxed) as u64,
        peak_bytes: PEAK_BYTES.load(Ordering::Relaxed) as u64,
        allocations: ALLOC_COUNT.load(Ordering::Relaxed),
    }
}

/// Restart peak tracking from the current live byte count
pub fn reset_peak() {
    PEAK_BYTES.store(CURRENT_BYTES.load(Ordering::Relaxed), Ordering::Relaxed);
}

/// Whether [`TrackingAllocator`] is installed as the global allocator
pub fn is_tracking() -> bool {
    // Any running Rust program has allocated by the time this is asked.
    let probe = Box::new(0u8);
    std::hint::black_box(&probe);
    ALLOC_COUNT.load(Ordering::Relaxed) > 0
}

/// Keeps the highest peak seen across a series of samples
#[derive(Debug, Clone, Copy, Default)]
pub struct PeakSampler {
    max_peak_bytes: u64,
    samples: usize,
}

impl PeakSampler {
    /// Start sampling; resets the process peak so earlier setup is excluded
    pub fn start() -> Self {
        reset_peak();
        let mut sampler = Self::default();
        sampler.sample();
        sampler
    }

    /// Take one sample of the process peak
    pub fn sample(&mut self) -> MemorySnapshot {
        let snapshot = snapshot();
        self.observe(snapshot);
        snapshot
    }

    /// Fold an externally taken snapshot into the maximum
    pub fn observe(&mut self, snapshot: MemorySnapshot) {
        self.max_peak_bytes = self.max_peak_bytes.max(snapshot.peak_bytes);
        self.samples += 1;
    }

    pub fn max_peak_bytes(&self) -> u64 {
        self.max_peak_bytes
    }

    pub fn samples(&self) -> usize {
        self.samples
    }
}
