//! SQLite storage backend.
//!
//! One SQLite database holds every collection, one table per collection,
//! each a flat `key -> JSON blob` mapping with no foreign keys. Identity
//! counters live in a `sequences` table next to them.
//!
//! With [`Durability::Immediate`] the connection is an on-disk file and each
//! statement commits before returning. With [`Durability::Buffered`] the
//! database is held in memory, loaded from a snapshot at open, and written
//! back atomically on [`SqliteStore::flush`].

mod row;

use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::serialize::OwnedData;
use rusqlite::{Connection, DatabaseName, OptionalExtension};

use crate::config::{Durability, StoreConfig};
use crate::error::{QuireError, Result};
use crate::storage::traits::{Collection, IdentityAllocator, Record, RecordKey};

use row::{decode_value, RecordRow};

/// Shared SQLite connection backing every collection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    durability: Durability,
    /// Snapshot destination for buffered stores
    snapshot_path: Option<PathBuf>,
    dirty: AtomicBool,
}

impl SqliteStore {
    /// Open (or create) the store described by `config` and prepare its
    /// sequence table. Collection tables are created on first use.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let (conn, snapshot_path) = match (&config.path, config.durability) {
            (None, _) => (Connection::open_in_memory()?, None),
            (Some(path), Durability::Immediate) => {
                let conn = Connection::open(path)?;
                conn.execute_batch(
                    "PRAGMA journal_mode = DELETE;
                     PRAGMA synchronous = FULL;",
                )?;
                (conn, None)
            }
            (Some(path), Durability::Buffered) => (Self::load_snapshot(path)?, Some(path.clone())),
        };

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS sequences (
                collection TEXT PRIMARY KEY,
                last INTEGER NOT NULL
            );
            "#,
        )?;

        tracing::info!(
            path = ?config.path,
            durability = ?config.durability,
            "Opened store"
        );

        Ok(Self {
            conn: Mutex::new(conn),
            durability: config.durability,
            snapshot_path,
            dirty: AtomicBool::new(false),
        })
    }

    pub fn durability(&self) -> Durability {
        self.durability
    }

    /// Handle to the collection for record type `R`, creating its table if
    /// needed.
    pub fn collection<R: Record>(self: &Arc<Self>) -> Result<SqliteCollection<R>> {
        let conn = self.lock_conn()?;
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
            R::COLLECTION
        ))?;
        Ok(SqliteCollection {
            store: Arc::clone(self),
            _record: PhantomData,
        })
    }

    /// Identity allocator for a numerically keyed collection.
    ///
    /// The persisted counter is raised to the largest key already present,
    /// so records written with explicit keys can never be collided with.
    pub fn sequence<R: Record<Key = u64>>(self: &Arc<Self>) -> Result<SqliteSequence> {
        let collection = self.collection::<R>()?;
        drop(collection);

        let conn = self.lock_conn()?;
        conn.execute(
            "INSERT INTO sequences (collection, last) VALUES (?1, 0)
             ON CONFLICT(collection) DO NOTHING",
            [R::COLLECTION],
        )?;
        let max_key: Option<i64> = conn.query_row(
            &format!("SELECT MAX(CAST(key AS INTEGER)) FROM {}", R::COLLECTION),
            [],
            |row| row.get(0),
        )?;
        if let Some(max_key) = max_key {
            conn.execute(
                "UPDATE sequences SET last = MAX(last, ?2) WHERE collection = ?1",
                (R::COLLECTION, max_key),
            )?;
        }
        self.mark_dirty();

        Ok(SqliteSequence {
            store: Arc::clone(self),
            collection: R::COLLECTION,
        })
    }

    /// Write buffered changes to disk.
    ///
    /// A no-op for immediate and pure in-memory stores, and when nothing
    /// changed since the last flush.
    pub fn flush(&self) -> Result<()> {
        let Some(path) = self.snapshot_path.as_ref() else {
            return Ok(());
        };
        let conn = self.lock_conn()?;
        if !self.dirty.swap(false, Ordering::AcqRel) {
            return Ok(());
        }

        let result = conn
            .serialize(DatabaseName::Main)
            .map_err(QuireError::from)
            .and_then(|data| crate::fs::write_atomic(path, &data).map_err(QuireError::from));
        drop(conn);
        if let Err(err) = result {
            self.dirty.store(true, Ordering::Release);
            return Err(err);
        }

        tracing::debug!(path = %path.display(), "Flushed store snapshot");
        Ok(())
    }

    /// Lock the database connection, returning an error if the mutex is poisoned.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| QuireError::Storage("SQLite connection poisoned".to_string()))
    }

    fn mark_dirty(&self) {
        if self.snapshot_path.is_some() {
            self.dirty.store(true, Ordering::Release);
        }
    }

    fn load_snapshot(path: &Path) -> Result<Connection> {
        let mut conn = Connection::open_in_memory()?;
        if path.exists() {
            let bytes = fs::read(path)?;
            if !bytes.is_empty() {
                let owned_data = Self::owned_data_from_bytes(&bytes)?;
                conn.deserialize(DatabaseName::Main, owned_data, false)?;
            }
        }
        Ok(conn)
    }

    fn owned_data_from_bytes(bytes: &[u8]) -> Result<OwnedData> {
        let size: i32 = bytes
            .len()
            .try_into()
            .map_err(|_| QuireError::Storage("Store snapshot too large".to_string()))?;

        // SAFETY: sqlite3_malloc returns a valid pointer or null; null is
        // checked immediately below. `size` was validated to fit in i32.
        let raw = unsafe { rusqlite::ffi::sqlite3_malloc(size) as *mut u8 };
        let ptr = NonNull::new(raw)
            .ok_or_else(|| QuireError::Storage("SQLite allocation failed".to_string()))?;

        // SAFETY:
        // - `ptr` was allocated above with exactly `bytes.len()` bytes and is writable
        // - `bytes` is valid for reads of `bytes.len()` bytes and cannot overlap a
        //   fresh allocation
        // - `OwnedData` takes ownership of the sqlite3_malloc'd buffer and frees it
        //   through SQLite
        unsafe {
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), ptr.as_ptr(), bytes.len());
            Ok(OwnedData::from_raw_nonnull(ptr, bytes.len()))
        }
    }
}

impl Drop for SqliteStore {
    fn drop(&mut self) {
        if let Err(err) = self.flush() {
            tracing::warn!(error = %err, "Failed to flush store snapshot on drop");
        }
    }
}

/// One collection table inside a [`SqliteStore`].
pub struct SqliteCollection<R> {
    store: Arc<SqliteStore>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> SqliteCollection<R> {
    fn get_locked(conn: &Connection, key: &str) -> Result<Option<R>> {
        let value: Option<String> = conn
            .query_row(
                &format!("SELECT value FROM {} WHERE key = ?1", R::COLLECTION),
                [key],
                |row| row.get(0),
            )
            .optional()?;
        value
            .map(|json| decode_value::<R>(key, &json))
            .transpose()
    }

    fn set_locked(conn: &Connection, key: &str, record: &R) -> Result<()> {
        let value_json = serde_json::to_string(record)?;
        conn.execute(
            &format!(
                "INSERT INTO {} (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                R::COLLECTION
            ),
            (key, value_json),
        )?;
        Ok(())
    }
}

impl<R: Record> Collection<R> for SqliteCollection<R> {
    fn has(&self, key: &R::Key) -> Result<bool> {
        let conn = self.store.lock_conn()?;
        let found: Option<i64> = conn
            .query_row(
                &format!("SELECT 1 FROM {} WHERE key = ?1", R::COLLECTION),
                [key.encode()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn get(&self, key: &R::Key) -> Result<Option<R>> {
        let conn = self.store.lock_conn()?;
        Self::get_locked(&conn, &key.encode())
    }

    fn set(&self, key: &R::Key, record: &R) -> Result<()> {
        let conn = self.store.lock_conn()?;
        Self::set_locked(&conn, &key.encode(), record)?;
        self.store.mark_dirty();
        Ok(())
    }

    fn delete(&self, key: &R::Key) -> Result<bool> {
        let conn = self.store.lock_conn()?;
        let changed = conn.execute(
            &format!("DELETE FROM {} WHERE key = ?1", R::COLLECTION),
            [key.encode()],
        )?;
        if changed > 0 {
            self.store.mark_dirty();
        }
        Ok(changed > 0)
    }

    fn count(&self) -> Result<usize> {
        let conn = self.store.lock_conn()?;
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", R::COLLECTION),
            [],
            |row| row.get(0),
        )?;
        usize::try_from(count)
            .map_err(|_| QuireError::Storage(format!("Invalid row count: {}", count)))
    }

    fn entries(&self) -> Result<Vec<(R::Key, R)>> {
        let conn = self.store.lock_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT key, value FROM {} ORDER BY rowid",
            R::COLLECTION
        ))?;
        let rows = stmt
            .query_map([], RecordRow::from_sql)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.into_iter().map(RecordRow::decode::<R>).collect()
    }

    /// Read, patch and write back under one lock so concurrent updates to
    /// the same record do not interleave.
    fn update(&self, key: &R::Key, patch: R::Patch) -> Result<Option<R>> {
        let mut conn = self.store.lock_conn()?;
        let encoded = key.encode();
        let tx = conn.transaction()?;

        let Some(mut record) = Self::get_locked(&tx, &encoded)? else {
            return Ok(None);
        };
        record.apply(patch)?;
        Self::set_locked(&tx, &encoded, &record)?;
        tx.commit()?;

        self.store.mark_dirty();
        Ok(Some(record))
    }
}

/// Persisted counter for one collection.
pub struct SqliteSequence {
    store: Arc<SqliteStore>,
    collection: &'static str,
}

impl IdentityAllocator for SqliteSequence {
    fn next(&self) -> Result<u64> {
        let conn = self.store.lock_conn()?;
        let next: i64 = conn.query_row(
            "UPDATE sequences SET last = last + 1 WHERE collection = ?1 RETURNING last",
            [self.collection],
            |row| row.get(0),
        )?;
        self.store.mark_dirty();
        u64::try_from(next)
            .map_err(|_| QuireError::Storage(format!("Invalid sequence value: {}", next)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::types::{LogEntry, SettingValue};
    use chrono::Utc;
    use std::collections::HashSet;
    use tempfile::tempdir;

    fn memory_store() -> Arc<SqliteStore> {
        Arc::new(SqliteStore::open(&StoreConfig::in_memory()).unwrap())
    }

    fn log(id: u64, page: &str) -> LogEntry {
        LogEntry {
            id,
            time: Utc::now(),
            agent: None,
            ip: "127.0.0.1".to_string(),
            page: page.to_string(),
        }
    }

    #[test]
    fn test_set_get_has_delete() {
        let store = memory_store();
        let settings = store.collection::<SettingValue>().unwrap();
        let key = "title".to_string();

        assert!(!settings.has(&key).unwrap());
        assert!(settings.get(&key).unwrap().is_none());

        settings.set(&key, &SettingValue::from("Blog")).unwrap();
        assert!(settings.has(&key).unwrap());
        assert_eq!(settings.get(&key).unwrap(), Some(SettingValue::from("Blog")));
        assert_eq!(settings.count().unwrap(), 1);

        assert!(settings.delete(&key).unwrap());
        assert!(!settings.delete(&key).unwrap());
        assert_eq!(settings.count().unwrap(), 0);
    }

    #[test]
    fn test_replace_keeps_insertion_position() {
        let store = memory_store();
        let settings = store.collection::<SettingValue>().unwrap();
        for key in ["a", "b", "c"] {
            settings
                .set(&key.to_string(), &SettingValue::from(key))
                .unwrap();
        }
        settings
            .set(&"a".to_string(), &SettingValue::from("changed"))
            .unwrap();

        let keys = settings.keys().unwrap();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(settings.values().unwrap()[0], SettingValue::from("changed"));
    }

    #[test]
    fn test_filter_matches_predicate() {
        let store = memory_store();
        let logs = store.collection::<LogEntry>().unwrap();
        logs.set(&1, &log(1, "/")).unwrap();
        logs.set(&2, &log(2, "/about")).unwrap();

        let about = logs.filter(&|entry| entry.page == "/about").unwrap();
        assert_eq!(about.len(), 1);
        assert_eq!(about[0].0, 2);
    }

    #[test]
    fn test_update_existing_key_applies_patch_in_place() {
        use crate::storage::types::{Article, ArticlePatch, UserRef};

        let store = memory_store();
        let articles = store.collection::<Article>().unwrap();
        for id in [1, 2] {
            let article = Article {
                id,
                content: "Body".to_string(),
                title: format!("Draft {}", id),
                published: false,
                date: Utc::now(),
                user: UserRef::new("alice"),
            };
            articles.set(&id, &article).unwrap();
        }

        let updated = articles
            .update(&1, ArticlePatch::new().title("Final").published(true))
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Final");
        assert!(updated.published);
        assert_eq!(updated.content, "Body");

        let stored = articles.get(&1).unwrap().unwrap();
        assert_eq!(stored.title, "Final");
        assert!(stored.published);
        assert_eq!(articles.keys().unwrap(), vec![1, 2]);
        assert!(!articles.get(&2).unwrap().unwrap().published);
    }

    #[test]
    fn test_update_missing_key_returns_none() {
        let store = memory_store();
        let articles = store
            .collection::<crate::storage::types::Article>()
            .unwrap();
        let result = articles
            .update(&99, crate::storage::types::ArticlePatch::new().published(true))
            .unwrap();
        assert!(result.is_none());
        assert_eq!(articles.count().unwrap(), 0);
    }

    #[test]
    fn test_sequence_is_monotonic_and_skips_existing_keys() {
        let store = memory_store();
        let logs = store.collection::<LogEntry>().unwrap();
        logs.set(&10, &log(10, "/")).unwrap();

        let seq = store.sequence::<LogEntry>().unwrap();
        assert_eq!(seq.next().unwrap(), 11);
        assert_eq!(seq.next().unwrap(), 12);
    }

    #[test]
    fn test_sequence_concurrent_calls_are_unique() {
        let store = memory_store();
        let seq = Arc::new(store.sequence::<LogEntry>().unwrap());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let seq = Arc::clone(&seq);
                std::thread::spawn(move || {
                    (0..25).map(|_| seq.next().unwrap()).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {}", id);
            }
        }
        assert_eq!(seen.len(), 200);
    }

    #[test]
    fn test_immediate_store_persists_without_flush() {
        let dir = tempdir().unwrap();
        let config = StoreConfig::at(dir.path().join("quire.db"));

        {
            let store = Arc::new(SqliteStore::open(&config).unwrap());
            let seq = store.sequence::<LogEntry>().unwrap();
            let id = seq.next().unwrap();
            store.collection::<LogEntry>().unwrap().set(&id, &log(id, "/")).unwrap();
        }

        let store = Arc::new(SqliteStore::open(&config).unwrap());
        assert_eq!(store.collection::<LogEntry>().unwrap().count().unwrap(), 1);
        assert_eq!(store.sequence::<LogEntry>().unwrap().next().unwrap(), 2);
    }

    #[test]
    fn test_buffered_store_persists_on_flush() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("quire.db");
        let config = StoreConfig::at(&path).durability(Durability::Buffered);

        let store = Arc::new(SqliteStore::open(&config).unwrap());
        let logs = store.collection::<LogEntry>().unwrap();
        logs.set(&1, &log(1, "/")).unwrap();
        assert!(!path.exists());

        store.flush().unwrap();
        assert!(path.exists());
        drop(logs);
        drop(store);

        let reopened = Arc::new(SqliteStore::open(&config).unwrap());
        let logs = reopened.collection::<LogEntry>().unwrap();
        assert_eq!(logs.get(&1).unwrap().map(|e| e.page), Some("/".to_string()));
    }
}
