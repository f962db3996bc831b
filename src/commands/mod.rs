//! Command implementations for the `cloudtech-support` CLI.
//!
//! - `chat` - Terminal chat
//! - `simulate` - Headless session that prints a transcript
//! - `config` - Config file management (init, path, validate)

pub(crate) mod chat;
pub(crate) mod config;
pub(crate) mod simulate;

pub(crate) use chat::*;
pub(crate) use config::*;
pub(crate) use simulate::*;

use cloudtech_support::chat::{SessionError, SettingsError};
use cloudtech_support::config::ConfigError;
use cloudtech_support::logging::LoggingError;
use std::path::Path;
use thiserror::Error;

/// Failure of a subcommand. Printed to stderr by `main`.
#[derive(Error, Debug)]
pub(crate) enum CommandError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    #[error("Invalid session settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Timed out waiting for {0}")]
    Timeout(&'static str),
}

/// Loads the config from `path` or the default location, and validates it.
pub(crate) fn load_config(
    path: Option<&Path>,
) -> Result<cloudtech_support::config::Config, CommandError> {
    let config = cloudtech_support::config::ConfigLoader::load(path)?;
    config.validate()?;
    Ok(config)
}
