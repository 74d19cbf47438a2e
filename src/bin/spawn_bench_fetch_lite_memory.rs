//! 100 I/O-bound workers with peak memory tracking

use runtime_bench::memory::TrackingAllocator;

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

fn main() {
    runtime_bench::app::run_standalone(runtime_bench::BenchmarkKind::FetchLiteMemory);
}
