//! Spawn 1000 CPU-bound workers and wait for every result

fn main() {
    runtime_bench::app::run_standalone(runtime_bench::BenchmarkKind::Spawn);
}
