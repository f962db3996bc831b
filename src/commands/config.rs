//! `config` subcommand: init, path, validate.

use super::CommandError;
use cloudtech_support::config::{default, xdg, ConfigLoader};
use std::path::Path;

/// Writes the default template to `path`, or to the XDG location.
pub(crate) fn run_config_init(path: Option<&Path>, force: bool) -> Result<(), CommandError> {
    let created = match path {
        Some(path) => {
            default::create_default_config_at(path, force)?;
            path.to_path_buf()
        }
        None => default::create_default_config(force)?,
    };
    println!("Created configuration at {}", created.display());
    Ok(())
}

pub(crate) fn run_config_path() {
    println!("{}", xdg::config_path().display());
}

/// Loads and checks the config, then prints it.
pub(crate) fn run_config_validate(path: Option<&Path>) -> Result<(), CommandError> {
    let config = ConfigLoader::load(path)?;
    config.validate()?;
    println!("Configuration is valid");
    println!("{config:#?}");
    Ok(())
}
