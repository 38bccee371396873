//! Core data types for the storage layer.
//!
//! Records are persisted as JSON blobs, one table per collection. Foreign
//! keys are soft references: they name another record but nothing checks
//! that it exists, so resolving one always yields an `Option`.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::traits::Record;
use crate::error::Result;

/// Soft reference to a [`User`] by username.
///
/// May dangle: the account can be missing when the reference is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRef(pub String);

impl UserRef {
    pub fn new(username: impl Into<String>) -> Self {
        Self(username.into())
    }

    pub fn username(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Soft reference to an [`Article`] by id.
///
/// May dangle: articles can be deleted without touching their comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleRef(pub u64);

impl ArticleRef {
    pub fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ArticleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Patch type for records that have no partial-update path.
///
/// Uninhabited, so `update` cannot be called with a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Immutable {}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique login name, also the record key
    pub username: String,

    /// Display name
    pub name: String,

    /// Argon2id PHC string. Never leaves the account layer.
    pub password_hash: String,

    pub admin: bool,

    pub avatar: Option<String>,

    pub created: DateTime<Utc>,
}

/// Partial update for a [`User`].
///
/// `avatar` is doubly optional: `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserPatch {
    pub name: Option<String>,
    pub avatar: Option<Option<String>>,
    pub admin: Option<bool>,
    /// Set by the account layer after hashing; never accepted from input.
    #[serde(skip)]
    pub(crate) password_hash: Option<String>,
}

impl Record for User {
    type Key = String;
    type Patch = UserPatch;
    const COLLECTION: &'static str = "users";

    fn apply(&mut self, patch: UserPatch) -> Result<()> {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(avatar) = patch.avatar {
            self.avatar = avatar;
        }
        if let Some(admin) = patch.admin {
            self.admin = admin;
        }
        if let Some(hash) = patch.password_hash {
            self.password_hash = hash;
        }
        Ok(())
    }
}

/// An authored article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: u64,

    /// Markdown source
    pub content: String,

    /// Empty for draft placeholders
    pub title: String,

    pub published: bool,

    pub date: DateTime<Utc>,

    /// Author
    pub user: UserRef,
}

impl Article {
    /// Whether this is a real article rather than an untitled placeholder.
    pub fn has_title(&self) -> bool {
        !self.title.is_empty()
    }
}

/// Partial update for an [`Article`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArticlePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub published: Option<bool>,
}

impl ArticlePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn published(mut self, published: bool) -> Self {
        self.published = Some(published);
        self
    }
}

impl Record for Article {
    type Key = u64;
    type Patch = ArticlePatch;
    const COLLECTION: &'static str = "articles";

    fn apply(&mut self, patch: ArticlePatch) -> Result<()> {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(published) = patch.published {
            self.published = published;
        }
        Ok(())
    }
}

/// Builder for creating new articles.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub user: UserRef,
    pub published: bool,
    pub date: Option<DateTime<Utc>>,
}

impl NewArticle {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        user: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            user: UserRef::new(user),
            published: false,
            date: None,
        }
    }

    pub fn published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }
}

/// A reader comment on an article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,

    /// Article this comment belongs to
    pub parent: ArticleRef,

    /// Markdown source
    pub content: String,

    pub user: UserRef,

    pub date: DateTime<Utc>,
}

/// Partial update for a [`Comment`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommentPatch {
    pub content: Option<String>,
}

impl Record for Comment {
    type Key = u64;
    type Patch = CommentPatch;
    const COLLECTION: &'static str = "comments";

    fn apply(&mut self, patch: CommentPatch) -> Result<()> {
        if let Some(content) = patch.content {
            self.content = content;
        }
        Ok(())
    }
}

/// Builder for creating new comments.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub parent: ArticleRef,
    pub content: String,
    pub user: UserRef,
    pub date: Option<DateTime<Utc>>,
}

impl NewComment {
    pub fn new(parent: u64, content: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            parent: ArticleRef(parent),
            content: content.into(),
            user: UserRef::new(user),
            date: None,
        }
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }
}

/// A scalar site setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Flag(bool),
    Text(String),
}

impl SettingValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::Text(value) => Some(value),
            SettingValue::Flag(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Flag(value) => Some(*value),
            SettingValue::Text(_) => None,
        }
    }

    /// Parse command-line style input: `true`/`false` become flags.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "true" => SettingValue::Flag(true),
            "false" => SettingValue::Flag(false),
            other => SettingValue::Text(other.to_string()),
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Flag(value) => write!(f, "{}", value),
            SettingValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Flag(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::Text(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::Text(value)
    }
}

impl Record for SettingValue {
    type Key = String;
    type Patch = Immutable;
    const COLLECTION: &'static str = "settings";

    fn apply(&mut self, patch: Immutable) -> Result<()> {
        match patch {}
    }
}

/// Well-known setting keys.
pub mod setting_keys {
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const AUTHOR: &str = "author";
    pub const INIT: &str = "init";
    pub const COMMENTS_ENABLED: &str = "commentsEnabled";
    pub const REGISTRATION_ENABLED: &str = "registrationEnabled";
}

/// Typed view over the settings collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub title: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub init: bool,
    pub comments_enabled: bool,
    pub registration_enabled: bool,
    /// Any keys beyond the well-known ones
    #[serde(flatten)]
    pub extra: BTreeMap<String, SettingValue>,
}

impl SiteSettings {
    /// Build from raw `(key, value)` pairs. Unknown keys land in `extra`.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, SettingValue)>) -> Self {
        use setting_keys::*;

        let mut settings = SiteSettings::default();
        for (key, value) in pairs {
            match key.as_str() {
                TITLE => settings.title = value.as_str().map(String::from),
                DESCRIPTION => settings.description = value.as_str().map(String::from),
                AUTHOR => settings.author = value.as_str().map(String::from),
                INIT => settings.init = value.as_bool().unwrap_or(false),
                COMMENTS_ENABLED => settings.comments_enabled = value.as_bool().unwrap_or(false),
                REGISTRATION_ENABLED => {
                    settings.registration_enabled = value.as_bool().unwrap_or(false)
                }
                _ => {
                    settings.extra.insert(key, value);
                }
            }
        }
        settings
    }
}

/// One recorded page visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub time: DateTime<Utc>,
    /// Client-supplied user agent, if any
    pub agent: Option<String>,
    pub ip: String,
    pub page: String,
}

impl Record for LogEntry {
    type Key = u64;
    type Patch = Immutable;
    const COLLECTION: &'static str = "logs";

    fn apply(&mut self, patch: Immutable) -> Result<()> {
        match patch {}
    }
}

/// Builder for recording a visit.
#[derive(Debug, Clone)]
pub struct NewLogEntry {
    pub ip: String,
    pub page: String,
    pub agent: Option<String>,
}

impl NewLogEntry {
    pub fn new(ip: impl Into<String>, page: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            page: page.into(),
            agent: None,
        }
    }

    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = Some(agent.into());
        self
    }
}
