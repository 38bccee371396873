//! The opened store and every service built over it.

use std::sync::Arc;

use crate::accounts::Accounts;
use crate::auth::Authenticator;
use crate::config::{Config, Durability, StoreConfig};
use crate::crypto::CredentialService;
use crate::error::Result;
use crate::site::{Allocators, Collections, Site};
use crate::storage::{
    Article, Collection, Comment, LogEntry, SettingValue, SqliteStore, User,
};
use crate::view::RelationalView;

/// A ready store with its collections, allocators and services.
///
/// Obtaining a `Database` is the readiness signal: once [`Database::open`]
/// resolves, every collection is loaded and usable.
pub struct Database {
    store: Arc<SqliteStore>,
    collections: Collections,
    ids: Allocators,
    credentials: CredentialService,
}

impl Database {
    /// Open the store described by `config` and prepare all collections.
    ///
    /// Disk work runs on the blocking pool.
    pub async fn open(config: Config) -> Result<Self> {
        let credentials = CredentialService::new(config.credentials)?;
        let store_config = config.store;
        let (store, collections, ids) =
            tokio::task::spawn_blocking(move || Self::open_blocking(&store_config)).await??;

        tracing::debug!(
            users = collections.users.count()?,
            articles = collections.articles.count()?,
            comments = collections.comments.count()?,
            "Collections ready"
        );

        Ok(Self {
            store,
            collections,
            ids,
            credentials,
        })
    }

    fn open_blocking(config: &StoreConfig) -> Result<(Arc<SqliteStore>, Collections, Allocators)> {
        let store = Arc::new(SqliteStore::open(config)?);
        let collections = Collections {
            users: Arc::new(store.collection::<User>()?),
            articles: Arc::new(store.collection::<Article>()?),
            comments: Arc::new(store.collection::<Comment>()?),
            settings: Arc::new(store.collection::<SettingValue>()?),
            logs: Arc::new(store.collection::<LogEntry>()?),
        };
        let ids = Allocators {
            articles: Arc::new(store.sequence::<Article>()?),
            comments: Arc::new(store.sequence::<Comment>()?),
            logs: Arc::new(store.sequence::<LogEntry>()?),
        };
        Ok((store, collections, ids))
    }

    pub fn durability(&self) -> Durability {
        self.store.durability()
    }

    pub fn users(&self) -> Arc<dyn Collection<User>> {
        Arc::clone(&self.collections.users)
    }

    pub fn articles(&self) -> Arc<dyn Collection<Article>> {
        Arc::clone(&self.collections.articles)
    }

    pub fn comments(&self) -> Arc<dyn Collection<Comment>> {
        Arc::clone(&self.collections.comments)
    }

    pub fn settings(&self) -> Arc<dyn Collection<SettingValue>> {
        Arc::clone(&self.collections.settings)
    }

    pub fn logs(&self) -> Arc<dyn Collection<LogEntry>> {
        Arc::clone(&self.collections.logs)
    }

    pub fn credentials(&self) -> &CredentialService {
        &self.credentials
    }

    pub fn view(&self) -> RelationalView {
        RelationalView::new(self.users(), self.articles(), self.comments())
    }

    pub fn accounts(&self) -> Accounts {
        Accounts::new(self.users(), self.credentials.clone())
    }

    pub fn authenticator(&self) -> Authenticator {
        Authenticator::new(self.users(), self.credentials.clone())
    }

    pub fn site(&self) -> Site {
        Site::new(self.collections.clone(), self.ids.clone(), self.accounts())
    }

    /// Persist buffered writes. A no-op for immediate stores.
    pub async fn flush(&self) -> Result<()> {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.flush()).await?
    }

    /// Flush and release the store.
    ///
    /// Handles obtained from this database keep the connection alive until
    /// they are dropped too.
    pub async fn close(self) -> Result<()> {
        self.flush().await?;
        tracing::debug!("Closed store");
        Ok(())
    }
}
