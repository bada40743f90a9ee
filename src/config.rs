//! Run configuration
//!
//! The command-line flags are turned into a `Config` once at startup and
//! passed down by value. Validation happens here, before any file or
//! hardware access.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::UsageError;
use crate::model::Command;

/// Log verbosity accepted by `-l`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }

    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UsageError::InvalidLogLevel {
                level: s.to_string(),
            })
    }
}

/// Everything one run needs, built once from the flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub command: Command,
    pub log_level: LogLevel,
}

impl Config {
    /// Validate the raw flag values.
    ///
    /// # Errors
    ///
    /// Returns the `UsageError` for a missing or unknown command, or for
    /// `install` without a cap file path.
    pub fn from_flags(
        command: Option<&str>,
        cap_file: Option<&Path>,
        overwrite: bool,
        log_level: LogLevel,
    ) -> Result<Self, UsageError> {
        let command = Command::from_flags(command, cap_file, overwrite)?;
        Ok(Self { command, log_level })
    }
}
