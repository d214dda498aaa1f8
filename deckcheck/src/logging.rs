//! Console output for callers that surface validation results.
//!
//! The library itself logs through the `log` facade. This module is the
//! small stderr logger a host program uses to print a
//! [`ValidationReport`] verbatim, with a verbosity picked from flags or the
//! `DECKCHECK_LOG_MODE` environment variable.

use std::env;
use std::fmt;
use std::io::{self, Write};

use crate::validate::ValidationReport;

/// Logging level for controlling output verbosity.
///
/// Log levels are ordered from least verbose (Quiet) to most verbose (Verbose).
///
/// # Examples
///
/// ```
/// use deckcheck::LogLevel;
///
/// assert!(LogLevel::Quiet < LogLevel::Normal);
/// assert!(LogLevel::Normal < LogLevel::Verbose);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Suppress all non-essential output.
    Quiet,
    /// Errors and warnings.
    Normal,
    /// Errors, warnings and a summary line.
    Verbose,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quiet => write!(f, "quiet"),
            Self::Normal => write!(f, "normal"),
            Self::Verbose => write!(f, "verbose"),
        }
    }
}

impl LogLevel {
    /// Parses a log level from a string.
    ///
    /// Recognizes: "quiet", "normal", "verbose" (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not recognized.
    ///
    /// # Examples
    ///
    /// ```
    /// use deckcheck::LogLevel;
    ///
    /// assert_eq!(LogLevel::parse("quiet").unwrap(), LogLevel::Quiet);
    /// assert_eq!(LogLevel::parse("VERBOSE").unwrap(), LogLevel::Verbose);
    /// assert!(LogLevel::parse("invalid").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "quiet" => Ok(Self::Quiet),
            "normal" => Ok(Self::Normal),
            "verbose" => Ok(Self::Verbose),
            _ => Err(format!("invalid log level: {s}")),
        }
    }
}

/// A simple stderr-based logger.
///
/// # Examples
///
/// ```
/// use deckcheck::{Logger, LogLevel};
/// use deckcheck::validate::ValidationReport;
///
/// let logger = Logger::new(LogLevel::Normal);
/// logger.error("schema could not be parsed");
/// logger.report(&ValidationReport::default());
/// ```
#[derive(Debug)]
pub struct Logger {
    level: LogLevel,
}

impl Logger {
    /// Creates a new logger with the specified log level.
    #[must_use]
    pub const fn new(level: LogLevel) -> Self {
        Self { level }
    }

    /// Returns the current log level.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }

    /// Logs an error message unless the level is Quiet.
    pub fn error(&self, message: &str) {
        if self.level >= LogLevel::Normal {
            eprintln!("ERROR: {message}");
        }
    }

    /// Logs a warning message unless the level is Quiet.
    pub fn warn(&self, message: &str) {
        if self.level >= LogLevel::Normal {
            eprintln!("WARN: {message}");
        }
    }

    /// Logs an informational message at Verbose level.
    pub fn info(&self, message: &str) {
        if self.level >= LogLevel::Verbose {
            eprintln!("INFO: {message}");
        }
    }

    /// Prints every error and warning of `report` to stderr.
    pub fn report(&self, report: &ValidationReport) {
        // Nothing useful can be done if stderr is gone.
        let _ = self.write_report(&mut io::stderr().lock(), report);
    }

    /// Writes `report` to `out`: one `ERROR:` entry per error, then one
    /// `WARN:` entry per warning. Verbose adds an `INFO:` summary line.
    ///
    /// # Errors
    ///
    /// Returns any error from `out`.
    pub fn write_report<W: Write>(&self, out: &mut W, report: &ValidationReport) -> io::Result<()> {
        if self.level < LogLevel::Normal {
            return Ok(());
        }
        for issue in &report.errors {
            writeln!(out, "ERROR: {issue}")?;
        }
        for issue in &report.warnings {
            writeln!(out, "WARN: {issue}")?;
        }
        if self.level >= LogLevel::Verbose {
            writeln!(
                out,
                "INFO: {} error(s), {} warning(s)",
                report.errors.len(),
                report.warnings.len()
            )?;
        }
        Ok(())
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LogLevel::Normal)
    }
}

/// Initializes a logger based on environment variables and caller flags.
///
/// The priority order is:
/// 1. Flags (verbose/quiet)
/// 2. `DECKCHECK_LOG_MODE` environment variable
/// 3. Default (Normal)
///
/// If both `verbose` and `quiet` are true, `verbose` takes precedence.
///
/// # Examples
///
/// ```
/// use deckcheck::{init_logger, LogLevel};
///
/// let logger = init_logger(false, true);
/// assert_eq!(logger.level(), LogLevel::Quiet);
/// ```
#[must_use]
pub fn init_logger(verbose: bool, quiet: bool) -> Logger {
    if verbose {
        return Logger::new(LogLevel::Verbose);
    }
    if quiet {
        return Logger::new(LogLevel::Quiet);
    }

    if let Ok(env_value) = env::var("DECKCHECK_LOG_MODE") {
        if let Ok(level) = LogLevel::parse(&env_value) {
            return Logger::new(level);
        }
    }

    Logger::new(LogLevel::Normal)
}
