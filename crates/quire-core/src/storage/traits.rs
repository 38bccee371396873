//! Collection and identity traits.
//!
//! A `Collection<R>` is a persistent key/value mapping for one record type.
//! Components receive collections as `Arc<dyn Collection<R>>` handles so
//! they never reach for a global store, and so tests can hand them any
//! backend.

use std::fmt::{Debug, Display};
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{QuireError, Result};

/// Key of a record within its collection.
///
/// Keys are stored as TEXT, so every key type needs a lossless string form.
pub trait RecordKey: Clone + Eq + Hash + Debug + Display + Send + Sync + 'static {
    /// Encode this key for storage.
    fn encode(&self) -> String;

    /// Decode a stored key.
    fn decode(raw: &str) -> Result<Self>;
}

impl RecordKey for String {
    fn encode(&self) -> String {
        self.clone()
    }

    fn decode(raw: &str) -> Result<Self> {
        Ok(raw.to_string())
    }
}

impl RecordKey for u64 {
    fn encode(&self) -> String {
        self.to_string()
    }

    fn decode(raw: &str) -> Result<Self> {
        raw.parse()
            .map_err(|e| QuireError::Storage(format!("Invalid numeric key {:?}: {}", raw, e)))
    }
}

/// A value that lives in exactly one collection.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Key type for this record's collection
    type Key: RecordKey;

    /// Typed partial update accepted by [`Collection::update`]
    type Patch: Send;

    /// Collection (and table) name
    const COLLECTION: &'static str;

    /// Apply a partial update in place.
    fn apply(&mut self, patch: Self::Patch) -> Result<()>;
}

/// Persistent mapping from key to record.
///
/// All implementations must ensure:
/// - `set` inserts or replaces the whole record
/// - iteration (`entries`, `values`, `filter`) follows insertion order, and
///   replacing a record keeps its original position
/// - a failed call leaves no partial record behind
pub trait Collection<R: Record>: Send + Sync {
    /// Whether a record exists under `key`.
    fn has(&self, key: &R::Key) -> Result<bool>;

    /// Get a record by key.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(record))` if found, `Ok(None)` if not found.
    fn get(&self, key: &R::Key) -> Result<Option<R>>;

    /// Insert or replace a record.
    fn set(&self, key: &R::Key, record: &R) -> Result<()>;

    /// Remove a record. Returns whether anything was removed.
    fn delete(&self, key: &R::Key) -> Result<bool>;

    /// Number of records in the collection.
    fn count(&self) -> Result<usize>;

    /// All `(key, record)` pairs in insertion order.
    fn entries(&self) -> Result<Vec<(R::Key, R)>>;

    /// Apply a typed partial update to an existing record.
    ///
    /// # Returns
    ///
    /// Returns the updated record, or `Ok(None)` if `key` does not exist.
    fn update(&self, key: &R::Key, patch: R::Patch) -> Result<Option<R>> {
        let Some(mut record) = self.get(key)? else {
            return Ok(None);
        };
        record.apply(patch)?;
        self.set(key, &record)?;
        Ok(Some(record))
    }

    /// All keys in insertion order.
    fn keys(&self) -> Result<Vec<R::Key>> {
        Ok(self.entries()?.into_iter().map(|(key, _)| key).collect())
    }

    /// All records in insertion order.
    fn values(&self) -> Result<Vec<R>> {
        Ok(self.entries()?.into_iter().map(|(_, record)| record).collect())
    }

    /// Records for which `predicate` holds, with their keys.
    fn filter(&self, predicate: &dyn Fn(&R) -> bool) -> Result<Vec<(R::Key, R)>> {
        Ok(self
            .entries()?
            .into_iter()
            .filter(|(_, record)| predicate(record))
            .collect())
    }
}

/// Issues unique numeric keys for one collection.
pub trait IdentityAllocator: Send + Sync {
    /// Next identifier, strictly greater than every value issued before,
    /// including before a restart.
    fn next(&self) -> Result<u64>;
}
