//! Store and credential configuration.
//!
//! Every section deserializes with defaults, so an empty TOML document is a
//! valid configuration (an on-disk store in the working directory with
//! immediate durability and the standard Argon2id work factor).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default store filename when no path is configured.
pub const DEFAULT_STORE_FILE: &str = "quire.db";

/// Top-level configuration for a Quire database.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub credentials: CredentialConfig,
}

impl Config {
    /// A configuration backed by a private in-memory store.
    pub fn in_memory() -> Self {
        Self {
            store: StoreConfig::in_memory(),
            credentials: CredentialConfig::default(),
        }
    }

    pub fn with_store(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }

    pub fn with_credentials(mut self, credentials: CredentialConfig) -> Self {
        self.credentials = credentials;
        self
    }
}

/// When a mutation becomes durable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Durability {
    /// Each mutation is committed to the on-disk file before the call returns.
    #[default]
    Immediate,
    /// Mutations land in memory and reach disk on `flush`/`close`.
    ///
    /// A crash loses everything since the last flush.
    Buffered,
}

/// Where and how records are stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the SQLite file. `None` keeps the store in memory only.
    #[serde(default = "default_store_path")]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub durability: Durability,
}

fn default_store_path() -> Option<PathBuf> {
    Some(PathBuf::from(DEFAULT_STORE_FILE))
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            durability: Durability::default(),
        }
    }
}

impl StoreConfig {
    pub fn at(path: impl AsRef<Path>) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
            durability: Durability::Immediate,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            durability: Durability::Immediate,
        }
    }

    pub fn durability(mut self, durability: Durability) -> Self {
        self.durability = durability;
        self
    }
}

/// Argon2id work factor.
///
/// Defaults follow the OWASP baseline for Argon2id: 19 MiB of memory, two
/// passes, one lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialConfig {
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

fn default_memory_kib() -> u32 {
    19 * 1024
}

fn default_iterations() -> u32 {
    2
}

fn default_parallelism() -> u32 {
    1
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

impl CredentialConfig {
    /// The cheapest parameters Argon2 accepts. Only suitable for tests.
    pub fn insecure_fast() -> Self {
        Self {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        }
    }
}
