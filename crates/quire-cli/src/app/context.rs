//! Application context for the Quire CLI.
//!
//! Combines CLI arguments with the resolved configuration.

use std::io::IsTerminal;

use quire_core::{Config, Database};

use crate::cli::Cli;

use super::resolver::resolve_config;

/// Application context that bundles CLI args with configuration.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config: Config,
}

impl<'a> AppContext<'a> {
    /// Create a new application context from CLI arguments.
    pub fn new(cli: &'a Cli) -> anyhow::Result<Self> {
        Ok(Self {
            cli,
            config: resolve_config(cli)?,
        })
    }

    /// Get the CLI arguments.
    pub fn cli(&self) -> &Cli {
        self.cli
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Whether prompts may be shown.
    pub fn interactive(&self, no_input: bool) -> bool {
        !no_input && std::io::stdin().is_terminal()
    }

    /// Open the configured store, creating its directory if needed.
    pub async fn open_database(&self) -> anyhow::Result<Database> {
        if let Some(parent) = self
            .config
            .store
            .path
            .as_ref()
            .and_then(|path| path.parent())
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                anyhow::anyhow!("Failed to create store directory {}: {}", parent.display(), e)
            })?;
        }
        match self.config.store.path.as_ref() {
            Some(path) => tracing::debug!(path = %path.display(), "Opening store"),
            None => tracing::debug!("Opening in-memory store"),
        }
        Ok(Database::open(self.config.clone()).await?)
    }
}
