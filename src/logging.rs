//! Process-wide logger setup.
//!
//! Library code only talks to the [`log`](https://crates.io/crates/log)
//! facade and never installs a logger. Applications that want output call
//! [`init`] exactly once, early in `main`; a second call fails with
//! [`LoggingError::AlreadyInitialized`] instead of silently reconfiguring.
//!
//! Lines look like `2024-05-01 12:00:00 - framepipe::extractor - INFO - ...`
//! and go to stderr, and optionally to an append-only log file.
//!
//! # Example
//!
//! ```no_run
//! use framepipe::logging::{self, LoggingConfig};
//!
//! logging::init(LoggingConfig::new().with_verbose(true)).expect("logger already set");
//! log::info!("ready");
//! ```

use std::fs::{File, OpenOptions};
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use colored::{ColoredString, Colorize};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use thiserror::Error;

/// Failure to install the logger.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoggingError {
    /// A logger has already been installed in this process.
    #[error("Logger already initialized: {0}")]
    AlreadyInitialized(#[from] SetLoggerError),

    /// The log file could not be opened for appending.
    #[error("Failed to open log file {}: {source}", path.display())]
    LogFile {
        /// Requested log file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Logger settings.
#[derive(Debug, Clone)]
#[must_use]
pub struct LoggingConfig {
    level: LevelFilter,
    log_file: Option<PathBuf>,
    color: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggingConfig {
    /// Info level, stderr only, colour when stderr is a terminal.
    pub fn new() -> Self {
        Self {
            level: LevelFilter::Info,
            log_file: None,
            color: io::stderr().is_terminal(),
        }
    }

    /// Set the maximum level that is emitted.
    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// `true` selects debug level, `false` info level.
    pub fn with_verbose(self, verbose: bool) -> Self {
        self.with_level(if verbose { LevelFilter::Debug } else { LevelFilter::Info })
    }

    /// Also append every line to `path`.
    pub fn with_log_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Force coloured level names on or off for stderr.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Configured level.
    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// Configured log file, if any.
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }
}

struct PipelineLogger {
    level: LevelFilter,
    color: bool,
    file: Option<Mutex<File>>,
}

impl Log for PipelineLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let level = record.level();
        let level_text = if self.color {
            colorize(level).to_string()
        } else {
            level.to_string()
        };
        eprintln!("{timestamp} - {} - {level_text} - {}", record.target(), record.args());

        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = writeln!(
                    file,
                    "{timestamp} - {} - {level} - {}",
                    record.target(),
                    record.args()
                );
            }
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}

fn colorize(level: Level) -> ColoredString {
    let name = level.as_str();
    match level {
        Level::Error => name.red().bold(),
        Level::Warn => name.yellow().bold(),
        Level::Info => name.green(),
        Level::Debug => name.cyan(),
        Level::Trace => name.dimmed(),
    }
}

/// Install the process-wide logger.
///
/// # Errors
///
/// Returns [`LoggingError::LogFile`] if the log file cannot be opened and
/// [`LoggingError::AlreadyInitialized`] if a logger is already installed.
pub fn init(config: LoggingConfig) -> Result<(), LoggingError> {
    let file = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::LogFile {
                    path: path.clone(),
                    source,
                })?;
            Some(Mutex::new(file))
        }
        None => None,
    };

    log::set_boxed_logger(Box::new(PipelineLogger {
        level: config.level,
        color: config.color,
        file,
    }))?;
    log::set_max_level(config.level);
    Ok(())
}
