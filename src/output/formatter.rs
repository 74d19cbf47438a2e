//! Core formatting traits and implementations
//!
//! This module defines the output formatting interface and the plain text
//! implementation, which produces the fixed result line format.

use crate::{error::Result, models::Measurement};

/// Main trait for output formatting
pub trait OutputFormatter: Send {
    /// Format the banner line of a benchmark
    fn format_header(&self, title: &str) -> Result<String>;

    /// Format a timed measurement as `<label>: <elapsed>ms`
    fn format_measurement(&self, measurement: &Measurement) -> Result<String>;

    /// Format a per-worker average with three decimals
    fn format_average(&self, label: &str, average_ms: f64) -> Result<String>;

    /// Format a byte count in megabytes
    fn format_memory(&self, label: &str, bytes: u64) -> Result<String>;

    /// Format a free-form informational line
    fn format_note(&self, note: &str) -> Result<String>;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Bold the benchmark banner
    pub bold_headers: bool,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            bold_headers: true,
        }
    }
}

/// `<label>: <ms, one decimal>ms`
pub fn measurement_line(measurement: &Measurement) -> String {
    format!("{}: {:.1}ms", measurement.name, measurement.elapsed_ms)
}

/// `<label>: <ms, three decimals>ms`
pub fn average_line(label: &str, average_ms: f64) -> String {
    format!("{}: {:.3}ms", label, average_ms)
}

/// `<label>: <MB, one decimal> MB`
pub fn memory_line(label: &str, bytes: u64) -> String {
    format!("{}: {:.1} MB", label, bytes_to_megabytes(bytes))
}

pub fn bytes_to_megabytes(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0
}

/// Plain text formatter implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainFormatter;

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        Ok(title.to_string())
    }

    fn format_measurement(&self, measurement: &Measurement) -> Result<String> {
        Ok(measurement_line(measurement))
    }

    fn format_average(&self, label: &str, average_ms: f64) -> Result<String> {
        Ok(average_line(label, average_ms))
    }

    fn format_memory(&self, label: &str, bytes: u64) -> Result<String> {
        Ok(memory_line(label, bytes))
    }

    fn format_note(&self, note: &str) -> Result<String> {
        Ok(note.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measurement_one_decimal() {
        let formatter = PlainFormatter::default();
        let line = formatter
            .format_measurement(&Measurement::from_millis("Recursion fib(25)", 3.14159))
            .unwrap();
        assert_eq!(line, "Recursion fib(25): 3.1ms");

        let zero = formatter
            .format_measurement(&Measurement::from_millis("Array push (100k)", 0.0))
            .unwrap();
        assert_eq!(zero, "Array push (100k): 0.0ms");
    }

    #[test]
    fn test_measurement_rounding() {
        assert_eq!(measurement_line(&Measurement::from_millis("x", 1.25)), "x: 1.2ms");
        assert_eq!(measurement_line(&Measurement::from_millis("x", 1999.96)), "x: 2000.0ms");
    }

    #[test]
    fn test_average_three_decimals() {
        assert_eq!(average_line("Average per worker", 1.0), "Average per worker: 1.000ms");
        assert_eq!(average_line("Average per worker", 5.12345), "Average per worker: 5.123ms");
    }

    #[test]
    fn test_memory_megabytes() {
        assert_eq!(memory_line("Peak memory", 0), "Peak memory: 0.0 MB");
        assert_eq!(memory_line("Peak memory", 3 * 1024 * 1024 + 512 * 1024), "Peak memory: 3.5 MB");
    }

    #[test]
    fn test_plain_header_and_note_are_verbatim() {
        let formatter = PlainFormatter::default();
        assert_eq!(formatter.format_header("=== Rust Benchmarks ===").unwrap(), "=== Rust Benchmarks ===");
        assert_eq!(formatter.format_note("Completed 100 workers").unwrap(), "Completed 100 workers");
    }
}
