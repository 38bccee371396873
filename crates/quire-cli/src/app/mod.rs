//! Application-level utilities for the Quire CLI.
//!
//! This module provides:
//! - Path resolution for config and store files
//! - The per-invocation context that opens the database

mod context;
mod resolver;

// Re-export public API
pub use context::AppContext;
pub use resolver::{exit_not_found_with_hint, resolve_config_path};
