//! TOML configuration schema types for the CloudTech support simulator.
//!
//! All structs derive `Deserialize` and `Serialize` with defaults via
//! `#[serde(default)]`, so a partial file only overrides what it names.
//!
//! Duration fields use human-readable strings (e.g. `"1s"`, `"250ms"`)
//! parsed by the `humantime` crate when the config is turned into runtime
//! settings.

use crate::chat::settings::{SessionSettings, DEFAULT_AGENT_NAME, DEFAULT_CANNED_RESPONSES};
use crate::config::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration encompassing all sections.
///
/// ```toml
/// [session]
/// [tui]
/// [log]
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Support session timing, agent and canned replies.
    pub session: SessionConfig,
    /// Terminal chat settings.
    pub tui: TuiConfig,
    /// Log verbosity and destination.
    pub log: LogConfig,
}

impl Config {
    /// Checks every section converts to usable runtime values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.session.to_settings()?;
        self.tui.tick_rate()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// `[session]` section.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Agent who joins the chat. The greeting uses the first word.
    pub agent_name: String,
    /// Queue position assigned once the session starts waiting. Must be at least 1.
    pub initial_queue_position: u32,
    /// Delay from open until the session enters the queue.
    pub connect_delay: String,
    /// Period of the queue countdown.
    pub queue_interval: String,
    /// Lower bound of the agent reply delay.
    pub reply_delay_min: String,
    /// Upper bound of the agent reply delay (inclusive).
    pub reply_delay_max: String,
    /// Replies the agent picks from.
    pub canned_responses: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            agent_name: DEFAULT_AGENT_NAME.to_string(),
            initial_queue_position: 3,
            connect_delay: "1s".to_string(),
            queue_interval: "3s".to_string(),
            reply_delay_min: "1s".to_string(),
            reply_delay_max: "3s".to_string(),
            canned_responses: DEFAULT_CANNED_RESPONSES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl SessionConfig {
    /// Converts the section into validated session settings.
    pub fn to_settings(&self) -> Result<SessionSettings, ConfigError> {
        let initial_queue_position = NonZeroU32::new(self.initial_queue_position).ok_or_else(|| {
            ConfigError::InvalidValue {
                field: "session.initial_queue_position",
                value: self.initial_queue_position.to_string(),
                message: "must be at least 1".to_string(),
            }
        })?;

        let settings = SessionSettings {
            agent_name: self.agent_name.clone(),
            initial_queue_position,
            connect_delay: parse_duration("session.connect_delay", &self.connect_delay)?,
            queue_interval: parse_duration("session.queue_interval", &self.queue_interval)?,
            reply_delay_min: parse_duration("session.reply_delay_min", &self.reply_delay_min)?,
            reply_delay_max: parse_duration("session.reply_delay_max", &self.reply_delay_max)?,
            canned_responses: self.canned_responses.clone(),
        };
        settings.validate()?;
        Ok(settings)
    }
}

// ---------------------------------------------------------------------------
// TUI
// ---------------------------------------------------------------------------

/// `[tui]` section.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TuiConfig {
    /// Redraw tick rate as a human-readable duration (e.g. `"250ms"`).
    pub tick_rate: String,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate: "250ms".to_string(),
        }
    }
}

impl TuiConfig {
    /// Parsed tick rate. Zero is rejected.
    pub fn tick_rate(&self) -> Result<Duration, ConfigError> {
        let rate = parse_duration("tui.tick_rate", &self.tick_rate)?;
        if rate.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "tui.tick_rate",
                value: self.tick_rate.clone(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(rate)
    }
}

// ---------------------------------------------------------------------------
// Log
// ---------------------------------------------------------------------------

/// `[log]` section.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// Logging verbosity, overridden by `CLOUDTECH_LOG`.
    pub level: LogLevel,
    /// Path to a log file. Empty means stderr for headless commands and
    /// nowhere for the terminal chat.
    pub file: String,
}

/// Log verbosity levels (kebab-case in TOML).
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings.
    Warn,
    /// Informational messages (default).
    #[default]
    Info,
    /// Debug-level detail.
    Debug,
    /// Full trace output.
    Trace,
}

impl LogLevel {
    /// Filter directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

fn parse_duration(field: &'static str, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value.trim()).map_err(|e| ConfigError::InvalidValue {
        field,
        value: value.to_string(),
        message: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
