//! Logging initialization.
//!
//! Configures the `tracing` subscriber with level filtering via the
//! `CLOUDTECH_LOG` environment variable, falling back to `log.level` from
//! the config file.
//!
//! # Usage
//!
//! ```bash
//! # Configured level (info by default)
//! cloudtech-support simulate
//!
//! # Debug level
//! CLOUDTECH_LOG=debug cloudtech-support simulate
//!
//! # Module-specific filtering
//! CLOUDTECH_LOG=cloudtech_support::chat=trace,warn cloudtech-support chat
//! ```

use crate::config::schema::{LogConfig, LogLevel};
use crate::config::xdg;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding filter directives.
pub const LOG_ENV_VAR: &str = "CLOUDTECH_LOG";

/// Where log lines go when no log file is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Write to stderr. Used by headless commands.
    Stderr,
    /// Discard. Used by the terminal chat, which owns the screen.
    Discard,
}

/// Errors from [`init`].
#[derive(Error, Debug)]
pub enum LoggingError {
    /// The configured log file could not be opened for appending.
    #[error("Failed to open log file: {path}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A global subscriber is already installed.
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Builds the level filter: `CLOUDTECH_LOG` if set and valid, else `level`.
pub fn build_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(level.as_directive()))
}

/// Initialize the tracing subscriber.
///
/// Logs go to `config.file` when it is set, otherwise to `fallback`.
/// Call once, at startup.
pub fn init(config: &LogConfig, fallback: Fallback) -> Result<(), LoggingError> {
    let filter = build_filter(config.level);
    let builder = fmt().with_env_filter(filter).with_target(false);

    let result = if config.file.trim().is_empty() {
        match fallback {
            Fallback::Stderr => builder.with_writer(std::io::stderr).try_init(),
            Fallback::Discard => builder.with_writer(std::io::sink).try_init(),
        }
    } else {
        let path = xdg::expand_tilde(config.file.trim());
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| LoggingError::OpenFile {
                path: path.clone(),
                source,
            })?;
        builder
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init()
    };

    result.map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))
}
