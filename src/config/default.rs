//! Default configuration template and file creation utilities.
//!
//! Provides a commented TOML template that matches `Config::default()` and
//! functions to write it to the XDG config path.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::error::ConfigError;
use crate::config::xdg;

// ---------------------------------------------------------------------------
// Default TOML template
// ---------------------------------------------------------------------------

/// A commented TOML template with all default values.
///
/// Every value here must match `Config::default()` from `schema.rs`.
/// Sections: `[session]`, `[tui]`, `[log]`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# CloudTech Support Simulator Configuration
#
# This file was generated with default values.
# All values shown below are the built-in defaults.
#
# Location: $XDG_CONFIG_HOME/cloudtech-support/config.toml

# ==============================================================================
# Support Session
# ==============================================================================

[session]

# Agent who joins the chat once the queue reaches the front.
# The greeting uses the first word of the name.
agent_name = "Sarah Johnson"

# Queue position assigned when the session starts waiting. Must be >= 1.
initial_queue_position = 3

# Time from opening the chat until it is placed in the queue.
# Examples: "1s", "500ms"
connect_delay = "1s"

# Queue countdown period. Ticks are counted from the moment the chat opens;
# each tick moves the customer one place up, and the agent joins on the tick
# after position #1.
queue_interval = "3s"

# Each customer message gets one agent reply after a random delay in
# [reply_delay_min, reply_delay_max]. Set both equal for a fixed delay.
reply_delay_min = "1s"
reply_delay_max = "3s"

# Replies the agent picks from at random. At least one is required.
canned_responses = [
    "I understand your concern. Let me look into this for you.",
    "That's a great question. Let me check our documentation for the most accurate information.",
    "I can definitely help you with that. Let me pull up your account details.",
    "Thank you for the additional details. This helps me understand the issue better.",
    "I've found a solution for you. Let me walk you through the steps.",
]

# ==============================================================================
# Terminal Chat
# ==============================================================================

[tui]

# Redraw tick rate. Lower values = smoother but more CPU.
# Examples: "250ms", "500ms", "1s"
tick_rate = "250ms"

# ==============================================================================
# Logging
# ==============================================================================

[log]

# Logging verbosity level. The CLOUDTECH_LOG environment variable overrides it.
# Options: "error", "warn", "info", "debug", "trace"
level = "info"

# Path to log file. Tilde (~) is expanded.
# Empty string: stderr for `simulate`, discarded for `chat` (which owns the screen).
file = ""
"#;

// ---------------------------------------------------------------------------
// File creation functions
// ---------------------------------------------------------------------------

/// Creates (or force-overwrites) the default config file at the XDG path.
///
/// See [`create_default_config_at`].
pub fn create_default_config(force: bool) -> Result<PathBuf, ConfigError> {
    let path = xdg::config_path();
    create_default_config_at(&path, force)?;
    Ok(path)
}

/// Writes the default template to `path`.
///
/// - If the file exists and `force` is `false`, returns `ConfigError::AlreadyExists`.
/// - If the file exists and `force` is `true`, backs it up to `.toml.backup` first.
pub fn create_default_config_at(path: &Path, force: bool) -> Result<(), ConfigError> {
    if path.exists() {
        if !force {
            return Err(ConfigError::AlreadyExists {
                path: path.to_path_buf(),
            });
        }
        let backup_path = path.with_extension("toml.backup");
        fs::rename(path, &backup_path).map_err(|e| ConfigError::WriteError {
            path: backup_path.clone(),
            source: e,
        })?;
        tracing::info!("Backed up existing config to {}", backup_path.display());
    }

    write_default_config(path)?;
    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}

/// Writes the template to `path`, creating parent dirs and setting 0600 permissions.
fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let write_err = |e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        xdg::ensure_dir(parent).map_err(write_err)?;
    }
    fs::write(path, DEFAULT_CONFIG_TEMPLATE).map_err(write_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(write_err)?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
