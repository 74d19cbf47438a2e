//! Main application orchestration and execution

use crate::{
    client::{DelayClient, HttpClient},
    config::display_config_summary,
    error::{AppError, Result},
    executor::{DispatchReport, Dispatcher, SubmitReport, SystemResources},
    harness,
    logging::LoggerFactory,
    models::{Config, FetchConfig, Measurement, SpawnConfig},
    output::OutputCoordinator,
    types::BenchmarkKind,
    workloads::MICRO_SUITE,
    PKG_NAME, VERSION,
};
use std::{process, sync::Arc};

/// Runs one benchmark and writes its result lines
pub struct App {
    kind: BenchmarkKind,
    config: Config,
    output: OutputCoordinator,
    loggers: LoggerFactory,
}

impl App {
    /// Create an application writing results to standard output
    pub fn new(kind: BenchmarkKind, config: Config) -> Self {
        // --color must win over the colored crate's own terminal detection
        if config.enable_color {
            colored::control::set_override(true);
        }
        let output = OutputCoordinator::stdout(config.enable_color);
        Self::with_output(kind, config, output)
    }

    pub fn with_output(kind: BenchmarkKind, config: Config, output: OutputCoordinator) -> Self {
        Self {
            kind,
            loggers: LoggerFactory::new(config.clone()),
            config,
            output,
        }
    }

    pub fn kind(&self) -> BenchmarkKind {
        self.kind
    }

    /// Run the benchmark this application was created for
    pub fn run(&mut self) -> Result<()> {
        if self.config.debug {
            self.print_debug_banner();
        }
        let logger = self.loggers.create_logger("APP");
        crate::log_info!(logger, "Running {}", self.kind.binary_name());

        let result = match self.kind {
            BenchmarkKind::Micro => self.run_micro().map(|_| ()),
            BenchmarkKind::Spawn => self.run_spawn(&SpawnConfig::default()).map(|_| ()),
            BenchmarkKind::SpawnOnly => self.run_spawn_only(&SpawnConfig::default()).map(|_| ()),
            BenchmarkKind::Fetch => self.run_fetch_default(FetchConfig::default(), false),
            BenchmarkKind::FetchLite => self.run_fetch_default(FetchConfig::lite(), false),
            BenchmarkKind::FetchLiteMemory => self.run_fetch_default(FetchConfig::lite(), true),
        };
        crate::log_debug!(logger, "Finished {} (ok: {})", self.kind.binary_name(), result.is_ok());
        result
    }

    pub fn run_micro(&mut self) -> Result<Vec<Measurement>> {
        self.output.header(self.kind.title())?;
        harness::run_suite(&mut self.output, &MICRO_SUITE)
    }

    pub fn run_spawn(&mut self, spawn: &SpawnConfig) -> Result<DispatchReport> {
        self.output.header(self.kind.title())?;

        let report = self.dispatcher().spawn(spawn)?;

        self.output.measurement(&Measurement::from_millis(
            format!("Spawn and complete {} workers", spawn.workers),
            report.total_ms,
        ))?;
        self.output.note(&format!("Completed {} workers", report.completed()))?;
        Ok(report)
    }

    pub fn run_spawn_only(&mut self, spawn: &SpawnConfig) -> Result<SubmitReport> {
        self.output.header(self.kind.title())?;

        let report = self.dispatcher().spawn_submit_only(spawn)?;

        self.output.measurement(&Measurement::from_millis(
            format!("Submit {} worker tasks", spawn.workers),
            report.submit_ms,
        ))?;
        self.output.note(&format!("Submitted {} tasks", report.submitted))?;
        Ok(report)
    }

    /// Fetch benchmark against any client
    ///
    /// The 1000-worker run describes the workload up front and reports the
    /// per-worker average; the lite runs report the three intervals only.
    pub fn run_fetch(
        &mut self,
        fetch: &FetchConfig,
        client: Arc<dyn HttpClient>,
        track_memory: bool,
    ) -> Result<DispatchReport> {
        let detailed = self.kind == BenchmarkKind::Fetch;

        self.output.header(self.kind.title())?;
        if detailed {
            self.output.note(&format!(
                "Each worker makes {} HTTP requests to {}",
                fetch.attempts,
                endpoint_display(&fetch.endpoint)
            ))?;
            self.output.blank()?;
        }

        let report = self.dispatcher().fetch(fetch, client, track_memory)?;

        self.output.measurement(&Measurement::from_millis(
            format!("Spawn {} workers", fetch.workers),
            report.submit_ms,
        ))?;
        self.output
            .measurement(&Measurement::from_millis("Wait for completion", report.wait_ms))?;
        self.output
            .measurement(&Measurement::from_millis("Total time", report.total_ms))?;

        if detailed {
            self.output.average("Average per worker", report.average_wait_ms())?;
        }
        if let Some(peak) = report.peak_memory_bytes {
            self.output.memory("Peak memory", peak)?;
        }

        Ok(report)
    }

    fn run_fetch_default(&mut self, fetch: FetchConfig, track_memory: bool) -> Result<()> {
        let client: Arc<dyn HttpClient> = Arc::new(DelayClient::from_config(&fetch)?);
        self.run_fetch(&fetch, client, track_memory).map(|_| ())
    }

    fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(self.loggers.create_dispatch_logger())
    }

    /// Diagnostics only; standard output stays reserved for results
    fn print_debug_banner(&self) {
        eprintln!("{} v{}", PKG_NAME, VERSION);
        eprintln!(
            "Built {} from {} ({})",
            option_env!("BUILD_TIME").unwrap_or("unknown time"),
            option_env!("GIT_COMMIT").unwrap_or("unknown commit"),
            option_env!("GIT_BRANCH").unwrap_or("unknown branch"),
        );
        let resources = SystemResources::detect();
        eprintln!(
            "CPUs: {} logical, {} physical",
            resources.cpu_cores, resources.physical_cores
        );
        eprintln!("Session: {}", self.loggers.session_id());
        eprintln!("{}", display_config_summary(&self.config, self.kind));
        eprintln!();
    }
}

/// Host and path of the endpoint, without the scheme
fn endpoint_display(endpoint: &str) -> String {
    match url::Url::parse(endpoint) {
        Ok(parsed) => format!("{}{}", parsed.host_str().unwrap_or_default(), parsed.path()),
        Err(_) => endpoint.to_string(),
    }
}

/// Print panics; a panic on the main thread ends the process with code 1
///
/// Worker threads keep unwinding so the pool reports them as errors.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        let thread = std::thread::current();
        let name = thread.name().unwrap_or("unnamed");
        eprintln!("Panic in thread '{}': {}", name, panic_info);
        if name == "main" {
            process::exit(1);
        }
    }));
}

/// Print a fatal error to stderr and return the exit code for it
pub fn report_error(config: &Config, error: &AppError, context: &str) -> i32 {
    if config.verbose || config.debug {
        LoggerFactory::new(config.clone())
            .create_error_logger()
            .log_error(error, Some(context));
    }
    eprintln!("{}", error.format_for_console(config.enable_color));
    error.exit_code()
}

/// Entry point shared by the no-argument benchmark binaries
pub fn run_standalone(kind: BenchmarkKind) -> ! {
    install_panic_hook();

    let config = Config::default();
    let code = match App::new(kind, config.clone()).run() {
        Ok(()) => 0,
        Err(e) => report_error(&config, &e, kind.binary_name()),
    };

    process::exit(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{OutputFormatterFactory, SharedBuffer};
    use async_trait::async_trait;
    use regex::Regex;

    struct InstantOk;

    #[async_trait]
    impl HttpClient for InstantOk {
        async fn get_status(&self, _url: &str) -> Result<u16> {
            Ok(200)
        }
    }

    fn app(kind: BenchmarkKind) -> (App, SharedBuffer) {
        let buffer = SharedBuffer::new();
        let output = OutputCoordinator::new(
            OutputFormatterFactory::create_plain_formatter(),
            Box::new(buffer.clone()),
        );
        (App::with_output(kind, Config::plain(), output), buffer)
    }

    fn local_fetch(workers: u32) -> FetchConfig {
        FetchConfig {
            workers,
            endpoint: "http://127.0.0.1/delay/1".to_string(),
            ..FetchConfig::default()
        }
    }

    #[test]
    fn test_micro_output() {
        let (mut app, buffer) = app(BenchmarkKind::Micro);
        app.run().unwrap();

        let lines = buffer.lines();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "=== Rust Benchmarks ===");
        let line = Regex::new(r"^.+: \d+\.\dms$").unwrap();
        for l in &lines[1..] {
            assert!(line.is_match(l), "{}", l);
        }
        assert!(lines[5].starts_with("Recursion fib(25): "));
    }

    #[test]
    fn test_spawn_output() {
        let (mut app, buffer) = app(BenchmarkKind::Spawn);
        app.run_spawn(&SpawnConfig { workers: 100, iterations: 1_000 }).unwrap();

        let lines = buffer.lines();
        assert_eq!(lines[0], "=== Rust Spawn Benchmark ===");
        assert!(Regex::new(r"^Spawn and complete 100 workers: \d+\.\dms$").unwrap().is_match(&lines[1]));
        assert_eq!(lines[2], "Completed 100 workers");
    }

    #[test]
    fn test_spawn_only_output() {
        let (mut app, buffer) = app(BenchmarkKind::SpawnOnly);
        app.run_spawn_only(&SpawnConfig { workers: 1000, iterations: 1_000 }).unwrap();

        let lines = buffer.lines();
        assert_eq!(lines[0], "=== Rust Spawn Benchmark (spawn time only) ===");
        assert!(lines[1].starts_with("Submit 1000 worker tasks: "));
        assert_eq!(lines[2], "Submitted 1000 tasks");
    }

    #[test]
    fn test_fetch_output() {
        let (mut app, buffer) = app(BenchmarkKind::Fetch);
        app.run_fetch(&local_fetch(20), Arc::new(InstantOk), false).unwrap();

        let lines = buffer.lines();
        assert_eq!(lines[0], "=== Rust I/O-Bound Benchmark ===");
        assert_eq!(lines[1], "Each worker makes 5 HTTP requests to 127.0.0.1/delay/1");
        assert_eq!(lines[2], "");
        assert!(lines[3].starts_with("Spawn 20 workers: "));
        assert!(lines[4].starts_with("Wait for completion: "));
        assert!(lines[5].starts_with("Total time: "));
        assert!(Regex::new(r"^Average per worker: \d+\.\d{3}ms$").unwrap().is_match(&lines[6]));
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_fetch_lite_memory_output() {
        let (mut app, buffer) = app(BenchmarkKind::FetchLiteMemory);
        app.run_fetch(&local_fetch(10), Arc::new(InstantOk), true).unwrap();

        let lines = buffer.lines();
        assert_eq!(lines[0], "=== Rust I/O-Bound Benchmark (100 workers) ===");
        assert!(lines[1].starts_with("Spawn 10 workers: "));
        assert!(Regex::new(r"^Peak memory: \d+\.\d MB$").unwrap().is_match(&lines[4]));
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_endpoint_display() {
        assert_eq!(endpoint_display("https://httpbin.org/delay/1"), "httpbin.org/delay/1");
        assert_eq!(endpoint_display("not a url"), "not a url");
    }

    #[test]
    fn test_report_error_returns_exit_code() {
        let error = AppError::accounting("Collected 999 results for 1000 submitted workers");
        assert_eq!(report_error(&Config::plain(), &error, "test"), error.exit_code());
    }
}
