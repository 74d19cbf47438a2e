//! Six single-threaded micro workloads, timed once each

fn main() {
    runtime_bench::app::run_standalone(runtime_bench::BenchmarkKind::Micro);
}
