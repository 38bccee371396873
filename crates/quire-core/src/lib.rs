//! # Quire Core
//!
//! Core library for Quire - a small blog engine's persistence and identity
//! layer.
//!
//! This crate provides the storage collections, credential handling, and
//! read-side joins, independent of any front end.
//!
//! ## Architecture
//!
//! - **storage**: Collection traits, record types and the SQLite backend
//! - **crypto**: Password hashing and strength scoring
//! - **accounts**: User registration and profile edits
//! - **auth**: Login checks and session-derived authorization
//! - **view**: Hydrated articles, comments and sanitized users
//! - **site**: Installation, settings, moderation, comments, visit log
//! - **database**: Opens the store and hands out the services above

pub mod accounts;
pub mod auth;
pub mod config;
pub mod crypto;
pub mod database;
pub mod error;
pub mod fs;
pub mod markup;
pub mod site;
pub mod storage;
pub mod view;

pub use accounts::{Accounts, UserEdit};
pub use auth::{is_admin, is_logged_in, AuthState, Authenticator, SessionState};
pub use config::{Config, CredentialConfig, Durability, StoreConfig};
pub use crypto::CredentialService;
pub use database::Database;
pub use error::{QuireError, Result};
pub use site::{InstallRequest, SettingsUpdate, Site};
pub use storage::{Collection, IdentityAllocator};
pub use view::{ArticleView, AuthoredContent, CommentView, RelationalView, UserView};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
