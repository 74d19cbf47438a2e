//! 100 I/O-bound workers, 5 requests each, against the delay endpoint

fn main() {
    runtime_bench::app::run_standalone(runtime_bench::BenchmarkKind::FetchLite);
}
