//! Output formatting and display system
//!
//! Results are the only thing written to standard output. The
//! [`OutputCoordinator`] owns the sink and a formatter, and writes one line
//! per call.

mod formatter;
mod colored;

pub use formatter::{
    average_line, bytes_to_megabytes, measurement_line, memory_line, FormattingOptions,
    OutputFormatter, PlainFormatter,
};
pub use colored::{ColorScheme, ColoredFormatter, SpeedLevel};

use crate::{
    error::{ErrorContext, Result},
    models::Measurement,
};
use std::io::{self, Write};

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support
    pub fn create_formatter(enable_color: bool) -> Box<dyn OutputFormatter> {
        if enable_color {
            Box::new(ColoredFormatter::new(FormattingOptions {
                enable_color,
                bold_headers: true,
            }))
        } else {
            Box::new(PlainFormatter)
        }
    }

    /// Create a plain text formatter for scripts/logs
    pub fn create_plain_formatter() -> Box<dyn OutputFormatter> {
        Self::create_formatter(false)
    }
}

/// Writes formatted result lines to a sink
pub struct OutputCoordinator {
    formatter: Box<dyn OutputFormatter>,
    sink: Box<dyn Write + Send>,
}

impl OutputCoordinator {
    /// Create a coordinator writing to an arbitrary sink
    pub fn new(formatter: Box<dyn OutputFormatter>, sink: Box<dyn Write + Send>) -> Self {
        Self { formatter, sink }
    }

    /// Create a coordinator writing to standard output
    pub fn stdout(enable_color: bool) -> Self {
        Self::new(
            OutputFormatterFactory::create_formatter(enable_color),
            Box::new(io::stdout()),
        )
    }

    pub fn header(&mut self, title: &str) -> Result<()> {
        let line = self.formatter.format_header(title)?;
        self.write_line(&line)
    }

    pub fn measurement(&mut self, measurement: &Measurement) -> Result<()> {
        let line = self.formatter.format_measurement(measurement)?;
        self.write_line(&line)
    }

    pub fn average(&mut self, label: &str, average_ms: f64) -> Result<()> {
        let line = self.formatter.format_average(label, average_ms)?;
        self.write_line(&line)
    }

    pub fn memory(&mut self, label: &str, bytes: u64) -> Result<()> {
        let line = self.formatter.format_memory(label, bytes)?;
        self.write_line(&line)
    }

    pub fn note(&mut self, note: &str) -> Result<()> {
        let line = self.formatter.format_note(note)?;
        self.write_line(&line)
    }

    pub fn blank(&mut self) -> Result<()> {
        self.write_line("")
    }

    /// Lines are flushed as they are written so partial output survives a crash
    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.sink, "{}", line)
            .and_then(|_| self.sink.flush())
            .context("Failed to write result line")
    }
}

/// In-memory sink whose contents can be read after the coordinator is gone
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: std::sync::Arc<std::sync::Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded
    pub fn contents(&self) -> String {
        match self.inner.lock() {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(poisoned) => String::from_utf8_lossy(&poisoned.into_inner()).into_owned(),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut bytes = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "output buffer poisoned"))?;
        bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
