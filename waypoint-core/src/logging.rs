//! Logging setup
//!
//! The router logs through `tracing` with structured fields (`route`,
//! `path`, `method`, `param`). Nothing is printed unless the application
//! installs a subscriber; [`LogConfig`] installs one writing JSON to STDOUT
//! by default.
//!
//! # Examples
//!
//! ```no_run
//! use waypoint_core::logging::*;
//!
//! let _guard = LogConfig::new()
//!     .level(LogLevel::Debug)
//!     .format(LogFormat::Pretty)
//!     .output(LogOutput::Stderr)
//!     .with_colors(true)
//!     .init();
//!
//! info!("Router configured");
//! ```
//!
//! Only the routing engine at debug level:
//!
//! ```no_run
//! use waypoint_core::logging::*;
//!
//! let _guard = LogConfig::new()
//!     .with_env_filter("waypoint_core=debug")
//!     .try_init()
//!     .expect("logging already initialized");
//! ```

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

pub use tracing::{debug, error, info, trace, warn};

/// Log level for filtering messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_tracing_level(&self) -> Level {
        match self {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }

    /// Directive string for an `EnvFilter`
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Output format for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Structured, machine-readable (default)
    Json,
    Plain,
    /// Multi-line, for development
    Pretty,
    Compact,
}

/// Output destination for logs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    Stderr,
    /// Append to a file, creating it if needed
    File(PathBuf),
}

/// Errors raised while installing the global subscriber
#[derive(Error, Debug)]
pub enum LogError {
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("Failed to open log file: {0}")]
    Io(#[from] io::Error),

    #[error("A global subscriber is already installed: {0}")]
    AlreadyInitialized(String),
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub output: LogOutput,
    /// Include the target (module path)
    pub targets: bool,
    pub thread_ids: bool,
    pub file_line: bool,
    /// ANSI colors, ignored for JSON
    pub colors: bool,
    /// Filter directives; overrides `level` and `RUST_LOG` when set
    pub env_filter: Option<String>,
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    pub fn with_targets(mut self, enable: bool) -> Self {
        self.targets = enable;
        self
    }

    pub fn with_thread_ids(mut self, enable: bool) -> Self {
        self.thread_ids = enable;
        self
    }

    pub fn with_file_line(mut self, enable: bool) -> Self {
        self.file_line = enable;
        self
    }

    pub fn with_colors(mut self, enable: bool) -> Self {
        self.colors = enable;
        self
    }

    /// Set filter directives, e.g. `"waypoint_core=debug,info"`
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Install the global subscriber
    ///
    /// Returns `None` if a subscriber is already installed or the
    /// configuration is invalid. Keep the guard alive for the duration of the
    /// program; buffered logs are flushed when it is dropped.
    pub fn init(self) -> Option<WorkerGuard> {
        self.try_init().ok()
    }

    /// Install the global subscriber, reporting why it failed
    pub fn try_init(self) -> Result<WorkerGuard, LogError> {
        let filter = self.build_filter()?;

        let (writer, guard) = match &self.output {
            LogOutput::Stdout => tracing_appender::non_blocking(io::stdout()),
            LogOutput::Stderr => tracing_appender::non_blocking(io::stderr()),
            LogOutput::File(path) => {
                let file = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)?;
                tracing_appender::non_blocking(file)
            }
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(self.fmt_layer(writer))
            .try_init()
            .map_err(|e| LogError::AlreadyInitialized(e.to_string()))?;

        Ok(guard)
    }

    fn build_filter(&self) -> Result<EnvFilter, LogError> {
        match &self.env_filter {
            Some(filter) => EnvFilter::try_new(filter).map_err(|e| LogError::InvalidFilter {
                filter: filter.clone(),
                reason: e.to_string(),
            }),
            None => Ok(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.level.as_str()))),
        }
    }

    fn fmt_layer<S, W>(&self, writer: W) -> Box<dyn Layer<S> + Send + Sync>
    where
        S: Subscriber + for<'a> LookupSpan<'a> + 'static,
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        let layer = fmt::layer()
            .with_writer(writer)
            .with_target(self.targets)
            .with_thread_ids(self.thread_ids);

        match self.format {
            LogFormat::Json => layer
                .json()
                .with_file(self.file_line)
                .with_line_number(self.file_line)
                .boxed(),
            LogFormat::Plain => layer
                .with_file(self.file_line)
                .with_line_number(self.file_line)
                .with_ansi(self.colors)
                .boxed(),
            LogFormat::Pretty => layer
                .pretty()
                .with_file(self.file_line)
                .with_line_number(self.file_line)
                .with_ansi(self.colors)
                .boxed(),
            LogFormat::Compact => layer.compact().with_ansi(self.colors).boxed(),
        }
    }
}

impl Default for LogConfig {
    /// JSON to STDOUT at INFO level
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Json,
            output: LogOutput::Stdout,
            targets: true,
            thread_ids: false,
            file_line: false,
            colors: false,
            env_filter: None,
        }
    }
}
