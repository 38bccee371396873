//! Raw row type for collection tables.

use crate::error::{QuireError, Result};
use crate::storage::traits::{Record, RecordKey};

/// Raw row data from a collection table, before parsing into domain types.
#[derive(Debug)]
pub struct RecordRow {
    pub key: String,
    pub value_json: String,
}

impl RecordRow {
    pub fn from_sql(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            key: row.get(0)?,
            value_json: row.get(1)?,
        })
    }

    /// Parse into a typed key and record.
    pub fn decode<R: Record>(self) -> Result<(R::Key, R)> {
        let key = R::Key::decode(&self.key)?;
        let record = decode_value::<R>(&self.key, &self.value_json)?;
        Ok((key, record))
    }
}

/// Parse a stored JSON blob, naming the collection and key on failure.
pub fn decode_value<R: Record>(key: &str, value_json: &str) -> Result<R> {
    serde_json::from_str(value_json).map_err(|e| {
        QuireError::Storage(format!(
            "Invalid {} record {:?}: {}",
            R::COLLECTION,
            key,
            e
        ))
    })
}
