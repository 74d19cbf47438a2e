//! Error handling for the benchmark runner
//!
//! Only fatal conditions are modelled here. A failed HTTP attempt inside a
//! fetch worker is data (see [`crate::models::AttemptOutcome`]), not an error.

use thiserror::Error;

/// Fatal error types for a benchmark run
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors for workload parameters
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network setup errors (client construction, not individual requests)
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP request errors
    #[error("HTTP request error: {0}")]
    HttpRequest(String),

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Worker pool construction or teardown errors
    #[error("Pool error: {0}")]
    Pool(String),

    /// A worker panicked or was lost
    #[error("Worker error: {0}")]
    Worker(String),

    /// Submitted and collected worker counts disagree, or a result is wrong
    #[error("Accounting error: {0}")]
    Accounting(String),

    /// I/O errors (writing the report, etc.)
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network(message.into())
    }

    /// Create a new HTTP request error
    pub fn http_request<S: Into<String>>(message: S) -> Self {
        Self::HttpRequest(message.into())
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout(message.into())
    }

    /// Create a new pool error
    pub fn pool<S: Into<String>>(message: S) -> Self {
        Self::Pool(message.into())
    }

    /// Create a new worker error
    pub fn worker<S: Into<String>>(message: S) -> Self {
        Self::Worker(message.into())
    }

    /// Create a new accounting error
    pub fn accounting<S: Into<String>>(message: S) -> Self {
        Self::Accounting(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Prefix the message with `context`, keeping the variant
    pub fn with_prefix(self, context: &str) -> Self {
        let prefix = |message: String| format!("{}: {}", context, message);
        match self {
            Self::Config(m) => Self::Config(prefix(m)),
            Self::Validation(m) => Self::Validation(prefix(m)),
            Self::Network(m) => Self::Network(prefix(m)),
            Self::HttpRequest(m) => Self::HttpRequest(prefix(m)),
            Self::Timeout(m) => Self::Timeout(prefix(m)),
            Self::Pool(m) => Self::Pool(prefix(m)),
            Self::Worker(m) => Self::Worker(prefix(m)),
            Self::Accounting(m) => Self::Accounting(prefix(m)),
            Self::Io(m) => Self::Io(prefix(m)),
            Self::Internal(m) => Self::Internal(prefix(m)),
        }
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Validation(_) => "VALIDATION",
            Self::Network(_) => "NETWORK",
            Self::HttpRequest(_) => "HTTP",
            Self::Timeout(_) => "TIMEOUT",
            Self::Pool(_) => "POOL",
            Self::Worker(_) => "WORKER",
            Self::Accounting(_) => "ACCOUNTING",
            Self::Io(_) => "IO",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Validation(_) => 1,
            Self::Network(_) | Self::HttpRequest(_) => 2,
            Self::Timeout(_) => 3,
            Self::Io(_) => 5,
            Self::Pool(_) | Self::Worker(_) | Self::Accounting(_) => 6,
            Self::Internal(_) => 99,
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Config(_) | Self::Validation(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::Network(_) | Self::HttpRequest(_) => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
                }
                Self::Timeout(_) => {
                    format!("[{}] {}", category.blue().bold(), message.blue())
                }
                Self::Pool(_) | Self::Worker(_) | Self::Accounting(_) | Self::Io(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
                Self::Internal(_) => {
                    format!("[{}] {}", category.bright_red().bold(), message.bright_red())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(error: url::ParseError) -> Self {
        Self::validation(format!("URL parse error: {}", error))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::timeout(error.to_string())
        } else if error.is_connect() || error.is_request() {
            Self::network(error.to_string())
        } else {
            Self::http_request(error.to_string())
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(error: tokio::task::JoinError) -> Self {
        if error.is_panic() {
            Self::worker(format!("worker panicked: {}", error))
        } else {
            Self::worker(format!("worker was cancelled: {}", error))
        }
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Error context trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Add static context to an error
    fn context(self, message: &'static str) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_prefix(&f()))
    }

    fn context(self, message: &'static str) -> Result<T> {
        self.with_context(|| message.to_string())
    }
}
