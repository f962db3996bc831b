//! Platform-aware path resolution for cloudtech-support.
//!
//! On **Linux**, follows the XDG Base Directory Specification:
//! `$XDG_CONFIG_HOME/cloudtech-support` or `~/.config/cloudtech-support`.
//!
//! On **macOS**, uses `~/Library/Application Support/cloudtech-support`
//! unless `$XDG_CONFIG_HOME` is set.

use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "cloudtech-support";

/// Returns the configuration directory for cloudtech-support.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/cloudtech-support` (if env var set, any platform)
/// 2. Platform default:
///    - Linux: `~/.config/cloudtech-support`
///    - macOS: `~/Library/Application Support/cloudtech-support`
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join(APP_NAME);
    }
    platform_config_dir().join(APP_NAME)
}

/// Platform-native config base directory (without XDG override).
///
/// Falls back to the current directory when no home directory is known.
fn platform_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        dirs::config_dir().unwrap_or_else(|| PathBuf::from("."))
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
    }
}

/// Returns the path to the main configuration file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Expands a leading `~` in a path string to the user's home directory.
///
/// Returned unchanged if it does not start with `~` or no home is known.
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (path.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => home.join(rest),
        (None, Some(home)) if path == "~" => home,
        _ => PathBuf::from(path),
    }
}

/// Creates a directory and all parent directories with mode 0700.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    fs::create_dir_all(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o700))?;
    }
    Ok(())
}
