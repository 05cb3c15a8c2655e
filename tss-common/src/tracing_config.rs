//! Log levels and tracing dispatch construction.
//!
//! A [`Dispatch`] built here is owned by whoever asked for it. Nothing in
//! this module installs a global default subscriber.

use crate::error::CommonError;
use std::{fmt, str::FromStr};
use tracing::{Dispatch, level_filters::LevelFilter};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt};

/// Log verbosity, from most to least verbose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Everything, including request traces
    Trace,
    /// Request URLs and filename adjustments
    Debug,
    /// Normal operation
    #[default]
    Info,
    /// Recoverable anomalies
    Warn,
    /// Failures only
    Error,
}

impl LogLevel {
    /// All levels in ascending severity.
    pub const ALL: [Self; 5] = [Self::Trace, Self::Debug, Self::Info, Self::Warn, Self::Error];

    /// Lowercase directive name understood by `EnvFilter`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(CommonError::invalid_log_level(s)),
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

/// Tracing configuration.
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Log level filter
    pub log_level: LogLevel,
    /// Whether to output JSON format
    pub json_output: bool,
    /// Let `RUST_LOG` override `log_level` when it is set
    pub env_override: bool,
}

impl TracingConfig {
    /// Create config with custom log level.
    #[must_use]
    pub const fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Enable JSON output.
    #[must_use]
    pub const fn with_json_output(mut self) -> Self {
        self.json_output = true;
        self
    }

    /// Honor `RUST_LOG` when present.
    #[must_use]
    pub const fn with_env_override(mut self) -> Self {
        self.env_override = true;
        self
    }

    fn filter(&self) -> EnvFilter {
        if self.env_override {
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.log_level.as_str()))
        } else {
            EnvFilter::new(self.log_level.as_str())
        }
    }
}

/// Build a stderr subscriber for the given configuration and wrap it in a
/// [`Dispatch`].
///
/// The caller decides how to use it: scope it to a future with
/// `tracing::instrument::WithSubscriber`, or install it once at startup.
#[must_use]
pub fn build_dispatch(config: &TracingConfig) -> Dispatch {
    let registry = tracing_subscriber::registry().with(config.filter());

    if config.json_output {
        Dispatch::new(
            registry.with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            ),
        )
    } else {
        Dispatch::new(registry.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
    }
}
