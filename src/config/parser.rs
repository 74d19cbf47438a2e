//! Configuration parsing from CLI arguments

use crate::{
    cli::Cli,
    error::{AppError, Result},
    models::{Config, FetchConfig, SpawnConfig},
    types::BenchmarkKind,
};

/// Builds the run configuration from CLI arguments
pub struct ConfigParser<'a> {
    cli: &'a Cli,
}

impl<'a> ConfigParser<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        self.cli.validate().map_err(AppError::config)?;

        Ok(Config {
            enable_color: self.cli.use_colors(),
            verbose: self.cli.verbose,
            debug: self.cli.debug,
        })
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: &Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config, kind: BenchmarkKind) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Benchmark: {}", kind.binary_name()));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    match kind {
        BenchmarkKind::Micro => {}
        BenchmarkKind::Spawn | BenchmarkKind::SpawnOnly => {
            let spawn = SpawnConfig::default();
            summary.push(format!("Workers: {}", spawn.workers));
            summary.push(format!("Iterations per worker: {}", spawn.iterations));
        }
        BenchmarkKind::Fetch => push_fetch_summary(&mut summary, &FetchConfig::default()),
        BenchmarkKind::FetchLite | BenchmarkKind::FetchLiteMemory => {
            push_fetch_summary(&mut summary, &FetchConfig::lite())
        }
    }

    summary.join("\n")
}

fn push_fetch_summary(summary: &mut Vec<String>, fetch: &FetchConfig) {
    summary.push(format!("Workers: {}", fetch.workers));
    summary.push(format!("Requests per worker: {}", fetch.attempts));
    summary.push(format!("Endpoint: {}", fetch.endpoint));
    summary.push(format!("Request timeout: {}s", fetch.request_timeout.as_secs()));
}
