//! Runtime Bench - umbrella CLI
//!
//! Runs any of the six benchmarks by subcommand. Result lines go to stdout,
//! diagnostics to stderr.

use clap::Parser;
use runtime_bench::{
    app::{install_panic_hook, report_error, App},
    cli::Cli,
    config::load_config,
    memory::TrackingAllocator,
    models::Config,
};
use std::process;

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

fn main() {
    install_panic_hook();

    let cli = Cli::parse();
    let kind = cli.kind();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => process::exit(report_error(&Config::plain(), &e, "rtbench")),
    };

    if let Err(e) = App::new(kind, config.clone()).run() {
        process::exit(report_error(&config, &e, kind.binary_name()));
    }
}
