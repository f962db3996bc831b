//! Resolves and reads the `cloudtech-support` config file.
//!
//! A path passed with `--config` is authoritative: if it cannot be read the
//! command fails, it never falls back to defaults. Without `--config` the
//! file is `$XDG_CONFIG_HOME/cloudtech-support/config.toml`, and when that
//! file is absent the built-in `[session]`, `[tui]` and `[log]` defaults
//! apply. Parse errors report the line and column in the file.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::config::error::ConfigError;
use crate::config::schema::Config;
use crate::config::xdg;

/// Stateless configuration loader.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads the file given with `--config`, or the default file when
    /// `explicit` is `None`.
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }
        Self::load_default()
    }

    /// Reads and parses the file at `path`. A missing file is
    /// `ConfigError::NotFound`.
    pub fn load_from_path(path: &Path) -> Result<Config, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => ConfigError::NotFound {
                path: path.to_path_buf(),
            },
            _ => ConfigError::ReadError {
                path: path.to_path_buf(),
                source,
            },
        })?;
        let config = Self::parse_toml(&content, path)?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Loads the XDG config file, or built-in defaults when it does not exist.
    pub fn load_default() -> Result<Config, ConfigError> {
        let path = xdg::config_path();
        match Self::load_from_path(&path) {
            Err(ConfigError::NotFound { .. }) => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Config::default())
            }
            result => result,
        }
    }

    fn parse_toml(content: &str, path: &Path) -> Result<Config, ConfigError> {
        toml::from_str(content).map_err(|e| {
            let (line, column) = e
                .span()
                .map_or((0, 0), |span| line_and_column(content, span.start));
            ConfigError::ParseError {
                path: path.to_path_buf(),
                line,
                column,
                message: e.message().to_string(),
            }
        })
    }
}

/// One-based line and column of byte `offset` in `content`.
fn line_and_column(content: &str, offset: usize) -> (usize, usize) {
    let before = &content[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |p| p + 1);
    (line, offset - line_start + 1)
}
