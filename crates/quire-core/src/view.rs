//! Read-side joins.
//!
//! Raw records reference each other through soft references. The view layer
//! resolves those references at read time, attaches rendered markup and
//! related records, and hands back "hydrated" values ready for templates.
//! Password digests never appear in anything this module returns.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::markup::render_markdown;
use crate::storage::{Article, ArticleRef, Collection, Comment, User, UserRef};

/// A user with the password digest stripped.
///
/// There is no hash field to forget to clear: the type cannot carry one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserView {
    pub username: String,
    pub name: String,
    pub admin: bool,
    pub avatar: Option<String>,
    pub created: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            name: user.name,
            admin: user.admin,
            avatar: user.avatar,
            created: user.created,
        }
    }
}

/// An article joined with its author, rendered body and comments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleView {
    #[serde(flatten)]
    pub article: Article,
    /// `None` when the author account no longer exists
    pub account: Option<UserView>,
    pub rendered: String,
    pub comments: Vec<CommentView>,
}

/// A comment joined with its author and rendered body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    /// `None` when the author account no longer exists
    pub account: Option<UserView>,
    pub rendered: String,
}

/// Everything a user has written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthoredContent {
    pub user: UserView,
    pub articles: Vec<Article>,
    pub comments: Vec<Comment>,
}

/// Per-call cache of resolved accounts, so a listing resolves each author
/// once.
#[derive(Default)]
struct AccountCache {
    resolved: HashMap<String, Option<UserView>>,
}

/// Joins articles, comments and users at read time.
#[derive(Clone)]
pub struct RelationalView {
    users: Arc<dyn Collection<User>>,
    articles: Arc<dyn Collection<Article>>,
    comments: Arc<dyn Collection<Comment>>,
}

impl RelationalView {
    pub fn new(
        users: Arc<dyn Collection<User>>,
        articles: Arc<dyn Collection<Article>>,
        comments: Arc<dyn Collection<Comment>>,
    ) -> Self {
        Self {
            users,
            articles,
            comments,
        }
    }

    /// Resolve a soft user reference. A dangling reference is `None`.
    pub fn resolve_user(&self, reference: &UserRef) -> Result<Option<UserView>> {
        let resolved = self.sanitized_user(reference.username())?;
        if resolved.is_none() {
            tracing::debug!(username = %reference, "Dangling user reference");
        }
        Ok(resolved)
    }

    /// Resolve a soft article reference. A dangling reference is `None`.
    pub fn resolve_article(&self, reference: ArticleRef) -> Result<Option<Article>> {
        let resolved = self.articles.get(&reference.id())?;
        if resolved.is_none() {
            tracing::debug!(article = %reference, "Dangling article reference");
        }
        Ok(resolved)
    }

    /// Fetch a user without the password digest.
    pub fn sanitized_user(&self, username: &str) -> Result<Option<UserView>> {
        Ok(self.users.get(&username.to_string())?.map(UserView::from))
    }

    /// Every user, without password digests.
    pub fn all_sanitized_users(&self) -> Result<Vec<UserView>> {
        Ok(self
            .users
            .values()?
            .into_iter()
            .map(UserView::from)
            .collect())
    }

    /// Fetch an article with its author, rendered body and comments.
    ///
    /// # Returns
    ///
    /// Returns `Ok(None)` if no article has this id.
    pub fn hydrated_article(&self, id: u64) -> Result<Option<ArticleView>> {
        let Some(article) = self.articles.get(&id)? else {
            return Ok(None);
        };
        let mut cache = AccountCache::default();
        let comments = self
            .comments_where(&|comment| comment.parent.id() == id)?
            .into_iter()
            .map(|comment| self.hydrate_comment(comment, &mut cache))
            .collect::<Result<Vec<_>>>()?;
        Ok(Some(self.hydrate_article(article, comments, &mut cache)?))
    }

    /// Titled articles, optionally only published ones, in insertion order.
    ///
    /// Untitled records are draft placeholders and never listed.
    pub fn hydrated_articles(&self, published_only: bool) -> Result<Vec<ArticleView>> {
        let articles = self.articles.filter(&|article| {
            article.has_title() && (!published_only || article.published)
        })?;
        if articles.is_empty() {
            return Ok(Vec::new());
        }

        let listed: HashSet<u64> = articles.iter().map(|(id, _)| *id).collect();
        let mut cache = AccountCache::default();
        let mut by_parent: HashMap<u64, Vec<CommentView>> = HashMap::new();
        let comments = self.comments_where(&|comment| listed.contains(&comment.parent.id()))?;
        for comment in comments {
            let parent = comment.parent.id();
            let view = self.hydrate_comment(comment, &mut cache)?;
            by_parent.entry(parent).or_default().push(view);
        }

        articles
            .into_iter()
            .map(|(id, article)| {
                let comments = by_parent.remove(&id).unwrap_or_default();
                self.hydrate_article(article, comments, &mut cache)
            })
            .collect()
    }

    /// Fetch a comment with its author and rendered body.
    pub fn hydrated_comment(&self, id: u64) -> Result<Option<CommentView>> {
        let Some(comment) = self.comments.get(&id)? else {
            return Ok(None);
        };
        let mut cache = AccountCache::default();
        Ok(Some(self.hydrate_comment(comment, &mut cache)?))
    }

    /// All comments on an article, in insertion order.
    pub fn hydrated_comments_for(&self, article_id: u64) -> Result<Vec<CommentView>> {
        let mut cache = AccountCache::default();
        self.comments_where(&|comment| comment.parent.id() == article_id)?
            .into_iter()
            .map(|comment| self.hydrate_comment(comment, &mut cache))
            .collect()
    }

    /// A user together with the raw articles and comments they wrote.
    ///
    /// # Returns
    ///
    /// Returns `Ok(None)` if the user does not exist.
    pub fn authored_by(&self, username: &str) -> Result<Option<AuthoredContent>> {
        let Some(user) = self.sanitized_user(username)? else {
            return Ok(None);
        };
        let articles = self
            .articles
            .filter(&|article| article.user.username() == username)?
            .into_iter()
            .map(|(_, article)| article)
            .collect();
        let comments = self.comments_where(&|comment| comment.user.username() == username)?;
        Ok(Some(AuthoredContent {
            user,
            articles,
            comments,
        }))
    }

    fn comments_where(&self, predicate: &dyn Fn(&Comment) -> bool) -> Result<Vec<Comment>> {
        Ok(self
            .comments
            .filter(predicate)?
            .into_iter()
            .map(|(_, comment)| comment)
            .collect())
    }

    fn cached_account(
        &self,
        reference: &UserRef,
        cache: &mut AccountCache,
    ) -> Result<Option<UserView>> {
        if let Some(hit) = cache.resolved.get(reference.username()) {
            return Ok(hit.clone());
        }
        let resolved = self.resolve_user(reference)?;
        cache
            .resolved
            .insert(reference.username().to_string(), resolved.clone());
        Ok(resolved)
    }

    fn hydrate_article(
        &self,
        article: Article,
        comments: Vec<CommentView>,
        cache: &mut AccountCache,
    ) -> Result<ArticleView> {
        let account = self.cached_account(&article.user, cache)?;
        let rendered = render_markdown(&article.content);
        Ok(ArticleView {
            article,
            account,
            rendered,
            comments,
        })
    }

    fn hydrate_comment(&self, comment: Comment, cache: &mut AccountCache) -> Result<CommentView> {
        let account = self.cached_account(&comment.user, cache)?;
        let rendered = render_markdown(&comment.content);
        Ok(CommentView {
            comment,
            account,
            rendered,
        })
    }
}
