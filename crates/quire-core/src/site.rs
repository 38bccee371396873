//! Site-level write operations.
//!
//! Installation, settings, article moderation, comments and visit logging:
//! the writes a front end performs on behalf of visitors and the admin.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;

use crate::accounts::Accounts;
use crate::error::{QuireError, Result};
use crate::storage::{
    setting_keys, Article, ArticlePatch, Collection, Comment, CommentPatch, IdentityAllocator,
    LogEntry, NewArticle, NewComment, NewLogEntry, SettingValue, SiteSettings, User,
};
use crate::view::UserView;

/// Shortest accepted value for each required install field.
const MIN_INSTALL_FIELD_LEN: usize = 3;

const EXAMPLE_TITLE: &str = "This is a test post because who wants an empty page?";
const EXAMPLE_CONTENT: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. \
Etiam imperdiet iaculis nulla quis malesuada. Phasellus feugiat sed ipsum vel fermentum. \
Nullam efficitur volutpat lectus. Vestibulum elementum porta sem nec luctus.";
const EXAMPLE_COMMENT: &str = "Your first comment. Edit or delete it from the admin tools.";

/// Handles to every collection, shared by the components that need them.
#[derive(Clone)]
pub struct Collections {
    pub users: Arc<dyn Collection<User>>,
    pub articles: Arc<dyn Collection<Article>>,
    pub comments: Arc<dyn Collection<Comment>>,
    pub settings: Arc<dyn Collection<SettingValue>>,
    pub logs: Arc<dyn Collection<LogEntry>>,
}

/// Identity allocators for the numerically keyed collections.
#[derive(Clone)]
pub struct Allocators {
    pub articles: Arc<dyn IdentityAllocator>,
    pub comments: Arc<dyn IdentityAllocator>,
    pub logs: Arc<dyn IdentityAllocator>,
}

/// First-run setup submitted by the site owner.
#[derive(Debug, Clone, Deserialize)]
pub struct InstallRequest {
    pub username: String,
    pub name: String,
    pub password: String,
    pub title: String,
    pub description: String,
    pub author: String,
    #[serde(default)]
    pub comments_enabled: bool,
    #[serde(default)]
    pub registration_enabled: bool,
    /// Seed one example article with one comment
    #[serde(default)]
    pub examples: bool,
}

/// Admin settings form.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsUpdate {
    pub title: String,
    pub description: String,
    pub author: String,
    pub comments_enabled: bool,
    pub registration_enabled: bool,
}

/// Site-level operations over the collections.
#[derive(Clone)]
pub struct Site {
    collections: Collections,
    ids: Allocators,
    accounts: Accounts,
}

impl Site {
    pub fn new(collections: Collections, ids: Allocators, accounts: Accounts) -> Self {
        Self {
            collections,
            ids,
            accounts,
        }
    }

    // --- Installation ---

    /// Whether the site has been set up (any setting or any user exists).
    pub fn is_installed(&self) -> Result<bool> {
        Ok(self.collections.settings.count()? > 0 || self.collections.users.count()? > 0)
    }

    /// Set up a fresh site: settings, the admin account, optional examples.
    ///
    /// The admin account is created first, so a rejected password leaves
    /// the site uninstalled.
    ///
    /// # Errors
    ///
    /// - `QuireError::AlreadyInstalled` if any setting or user exists
    /// - `QuireError::InvalidInput` if a required field is shorter than 3
    ///   characters
    /// - any error from [`Accounts::create_user`]
    pub async fn install(&self, request: InstallRequest) -> Result<UserView> {
        if self.is_installed()? {
            return Err(QuireError::AlreadyInstalled);
        }
        let required = [
            ("username", &request.username),
            ("password", &request.password),
            ("title", &request.title),
            ("description", &request.description),
            ("author", &request.author),
        ];
        if let Some((field, _)) = required
            .iter()
            .find(|(_, value)| value.chars().count() < MIN_INSTALL_FIELD_LEN)
        {
            return Err(QuireError::InvalidInput(format!(
                "Field {} must be at least {} characters",
                field, MIN_INSTALL_FIELD_LEN
            )));
        }

        let admin = self
            .accounts
            .create_user(&request.username, &request.name, &request.password, true)
            .await?;

        self.update_settings(SettingsUpdate {
            title: request.title,
            description: request.description,
            author: request.author,
            comments_enabled: request.comments_enabled,
            registration_enabled: request.registration_enabled,
        })?;

        if request.examples {
            let article = self.create_article(
                NewArticle::new(EXAMPLE_TITLE, EXAMPLE_CONTENT, request.username.as_str())
                    .published(true),
            )?;
            self.insert_comment(NewComment::new(
                article.id,
                EXAMPLE_COMMENT,
                request.username.as_str(),
            ))?;
        }

        tracing::info!(admin = %admin.username, examples = request.examples, "Installed site");
        Ok(admin)
    }

    // --- Settings ---

    /// Typed snapshot of all settings.
    pub fn settings(&self) -> Result<SiteSettings> {
        Ok(SiteSettings::from_pairs(self.collections.settings.entries()?))
    }

    pub fn setting(&self, key: &str) -> Result<Option<SettingValue>> {
        self.collections.settings.get(&key.to_string())
    }

    /// Upsert one setting. Any key is accepted.
    pub fn set_setting(&self, key: &str, value: impl Into<SettingValue>) -> Result<()> {
        if key.is_empty() {
            return Err(QuireError::InvalidInput(
                "Setting key cannot be empty".to_string(),
            ));
        }
        self.collections.settings.set(&key.to_string(), &value.into())
    }

    /// Save the admin settings form. Also marks the site initialized.
    pub fn update_settings(&self, update: SettingsUpdate) -> Result<()> {
        self.set_setting(setting_keys::TITLE, update.title)?;
        self.set_setting(setting_keys::DESCRIPTION, update.description)?;
        self.set_setting(setting_keys::AUTHOR, update.author)?;
        self.set_setting(setting_keys::INIT, true)?;
        self.set_setting(setting_keys::COMMENTS_ENABLED, update.comments_enabled)?;
        self.set_setting(setting_keys::REGISTRATION_ENABLED, update.registration_enabled)?;
        Ok(())
    }

    // --- Articles ---

    /// Store a new article under a freshly allocated id.
    pub fn create_article(&self, new: NewArticle) -> Result<Article> {
        let id = self.ids.articles.next()?;
        let article = Article {
            id,
            content: new.content,
            title: new.title,
            published: new.published,
            date: new.date.unwrap_or_else(Utc::now),
            user: new.user,
        };
        self.collections.articles.set(&id, &article)?;
        tracing::debug!(id, author = %article.user, "Created article");
        Ok(article)
    }

    /// # Errors
    ///
    /// Returns `QuireError::NotFound` if the article does not exist.
    pub fn edit_article(&self, id: u64, patch: ArticlePatch) -> Result<Article> {
        self.collections
            .articles
            .update(&id, patch)?
            .ok_or_else(|| QuireError::NotFound(format!("Article {}", id)))
    }

    pub fn publish(&self, id: u64) -> Result<Article> {
        self.edit_article(id, ArticlePatch::new().published(true))
    }

    pub fn unpublish(&self, id: u64) -> Result<Article> {
        self.edit_article(id, ArticlePatch::new().published(false))
    }

    /// Delete an article. Its comments are left in place and dangle.
    pub fn delete_article(&self, id: u64) -> Result<bool> {
        let removed = self.collections.articles.delete(&id)?;
        if removed {
            tracing::debug!(id, "Deleted article");
        }
        Ok(removed)
    }

    // --- Comments ---

    /// Post a comment on an existing article.
    ///
    /// # Errors
    ///
    /// - `QuireError::CommentsDisabled` unless `commentsEnabled` is set
    /// - `QuireError::NotFound` if the parent article does not exist
    pub fn add_comment(&self, new: NewComment) -> Result<Comment> {
        if !self.settings()?.comments_enabled {
            return Err(QuireError::CommentsDisabled);
        }
        if !self.collections.articles.has(&new.parent.id())? {
            return Err(QuireError::NotFound(format!("Article {}", new.parent)));
        }
        self.insert_comment(new)
    }

    /// # Errors
    ///
    /// Returns `QuireError::NotFound` if the comment does not exist.
    pub fn edit_comment(&self, id: u64, patch: CommentPatch) -> Result<Comment> {
        self.collections
            .comments
            .update(&id, patch)?
            .ok_or_else(|| QuireError::NotFound(format!("Comment {}", id)))
    }

    pub fn delete_comment(&self, id: u64) -> Result<bool> {
        self.collections.comments.delete(&id)
    }

    fn insert_comment(&self, new: NewComment) -> Result<Comment> {
        let id = self.ids.comments.next()?;
        let comment = Comment {
            id,
            parent: new.parent,
            content: new.content,
            user: new.user,
            date: new.date.unwrap_or_else(Utc::now),
        };
        self.collections.comments.set(&id, &comment)?;
        Ok(comment)
    }

    // --- Visit log ---

    /// Append one visit to the log.
    pub fn record_visit(&self, visit: NewLogEntry) -> Result<LogEntry> {
        let id = self.ids.logs.next()?;
        let entry = LogEntry {
            id,
            time: Utc::now(),
            agent: visit.agent,
            ip: visit.ip,
            page: visit.page,
        };
        self.collections.logs.set(&id, &entry)?;
        Ok(entry)
    }

    /// Every recorded visit, oldest first.
    pub fn logs(&self) -> Result<Vec<LogEntry>> {
        self.collections.logs.values()
    }
}
