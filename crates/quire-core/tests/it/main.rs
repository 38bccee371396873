//! Integration tests for Quire core.
//!
//! One test binary, with modules following the library layout:
//! - accounts: registration, profile edits and authentication
//! - site: installation, settings, articles, comments and the visit log
//! - persistence: durability modes and identity allocation across reopen

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("quire_core=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod accounts;
mod helpers;
mod persistence;
mod site;
