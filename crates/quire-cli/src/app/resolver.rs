//! Path resolution for config and store files.

use std::path::PathBuf;

use quire_core::Config;

use crate::cli::Cli;
use crate::config::{default_config_path, default_store_path, read_config};
use crate::errors::CliError;

/// Resolve the config file path: `--config` / `QUIRE_CONFIG`, then the XDG
/// default.
pub fn resolve_config_path(cli: &Cli) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli.config.as_ref() {
        if !path.as_os_str().is_empty() {
            return Ok(path.clone());
        }
    }
    default_config_path()
}

/// Load the effective configuration.
///
/// Without a config file the store lives in the XDG data directory.
/// `--store` / `QUIRE_STORE` overrides whatever the file says.
pub fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let config_path = resolve_config_path(cli)?;
    let mut config = if config_path.exists() {
        read_config(&config_path)?
    } else {
        let mut config = Config::default();
        config.store.path = Some(default_store_path()?);
        config
    };
    if let Some(store) = cli.store.clone() {
        config.store.path = Some(store);
    }
    Ok(config)
}

/// Exit with error code for not found errors.
///
/// This function prints the error and exits immediately.
/// Use `CliError::not_found` if you need to return an error instead.
pub fn exit_not_found_with_hint(message: &str, hint: &str) -> ! {
    CliError::not_found(message, hint).exit()
}
