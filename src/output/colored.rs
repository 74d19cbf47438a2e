//! Colored formatter implementation with terminal color support
//!
//! Only the decoration changes: with escape codes stripped, every line is
//! identical to what [`PlainFormatter`] produces.

use crate::{error::Result, models::Measurement};
use super::formatter::{
    average_line, bytes_to_megabytes, FormattingOptions, OutputFormatter, PlainFormatter,
};
use colored::*;

/// Speed classification for color coding a single measurement
#[derive(Debug, Clone, PartialEq)]
pub enum SpeedLevel {
    Fast,     // < 10ms
    Moderate, // 10-100ms
    Slow,     // 100-1000ms
    VerySlow, // > 1000ms
}

impl SpeedLevel {
    /// Classify an elapsed time in milliseconds
    pub fn from_elapsed_ms(elapsed_ms: f64) -> Self {
        if elapsed_ms < 10.0 {
            Self::Fast
        } else if elapsed_ms < 100.0 {
            Self::Moderate
        } else if elapsed_ms < 1000.0 {
            Self::Slow
        } else {
            Self::VerySlow
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Fast => Color::Green,
            Self::Moderate => Color::Cyan,
            Self::Slow => Color::Yellow,
            Self::VerySlow => Color::Red,
        }
    }
}

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub info: Color,
    pub memory: Color,
    pub muted: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            info: Color::Cyan,
            memory: Color::Magenta,
            muted: Color::BrightBlack,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    plain_formatter: PlainFormatter,
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    /// Create a new colored formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self {
            plain_formatter: PlainFormatter,
            options,
            color_scheme: ColorScheme::default(),
        }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        if !self.options.enable_color {
            return self.plain_formatter.format_header(title);
        }
        let colored = self.colorize(title, self.color_scheme.header);
        if self.options.bold_headers {
            Ok(colored.bold().to_string())
        } else {
            Ok(colored.to_string())
        }
    }

    fn format_measurement(&self, measurement: &Measurement) -> Result<String> {
        let value = format!("{:.1}ms", measurement.elapsed_ms);
        let level = SpeedLevel::from_elapsed_ms(measurement.elapsed_ms);
        Ok(format!("{}: {}", measurement.name, self.colorize(&value, level.color())))
    }

    fn format_average(&self, label: &str, average_ms: f64) -> Result<String> {
        if !self.options.enable_color {
            return Ok(average_line(label, average_ms));
        }
        let value = format!("{:.3}ms", average_ms);
        Ok(format!("{}: {}", label, self.colorize(&value, self.color_scheme.info)))
    }

    fn format_memory(&self, label: &str, bytes: u64) -> Result<String> {
        let value = format!("{:.1} MB", bytes_to_megabytes(bytes));
        Ok(format!("{}: {}", label, self.colorize(&value, self.color_scheme.memory)))
    }

    fn format_note(&self, note: &str) -> Result<String> {
        if note.is_empty() {
            return Ok(String::new());
        }
        Ok(self.colorize(note, self.color_scheme.muted).to_string())
    }
}
