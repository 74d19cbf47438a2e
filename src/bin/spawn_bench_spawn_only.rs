//! Spawn 1000 CPU-bound workers and time submission only

fn main() {
    runtime_bench::app::run_standalone(runtime_bench::BenchmarkKind::SpawnOnly);
}
