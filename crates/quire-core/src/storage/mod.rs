//! Storage abstraction for Quire.
//!
//! This module defines the `Collection` and `IdentityAllocator` traits, the
//! record types, and the SQLite backend that implements them.
//!
//! ## Architecture
//!
//! - One table per collection (`users`, `articles`, `comments`, `settings`,
//!   `logs`), each a flat mapping of key to JSON record blob
//! - No foreign keys: references between records are soft and may dangle
//! - A `sequences` table holds the per-collection identity counters

pub mod sqlite;
pub mod traits;
pub mod types;

pub use sqlite::{SqliteCollection, SqliteSequence, SqliteStore};
pub use traits::{Collection, IdentityAllocator, Record, RecordKey};
pub use types::{
    setting_keys, Article, ArticlePatch, ArticleRef, Comment, CommentPatch, Immutable, LogEntry,
    NewArticle, NewComment, NewLogEntry, SettingValue, SiteSettings, User, UserPatch, UserRef,
};
