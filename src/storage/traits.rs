//! Storage traits and error types
//!
//! This module defines the key-value and ordered-index interface the artifact
//! cache is written against, and the errors its backends report.

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A single write applied by [`KeyValueStore::write_batch`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    /// Set `key` to `value`, replacing any previous value
    Set { key: String, value: String },

    /// Insert `member` into the ordered set `set`, or update its score
    ZAdd {
        set: String,
        member: String,
        score: i64,
    },
}

impl WriteOp {
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Set {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn zadd(set: impl Into<String>, member: impl Into<String>, score: i64) -> Self {
        Self::ZAdd {
            set: set.into(),
            member: member.into(),
            score,
        }
    }
}

/// Key-value store with named ordered sets
///
/// Entries are only added or overwritten through this interface; removal is a
/// retention decision made outside the crate.
pub trait KeyValueStore {
    /// Gets the value stored under `key`
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Sets `key` to `value`
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;

    /// Adds `member` to the ordered set `set` with `score`, or updates its score
    fn zadd(&mut self, set: &str, member: &str, score: i64) -> StorageResult<()>;

    /// Gets the score of `member` in `set`
    fn zscore(&self, set: &str, member: &str) -> StorageResult<Option<i64>>;

    /// Lists the members of `set` ordered by ascending score
    fn zrange(&self, set: &str) -> StorageResult<Vec<(String, i64)>>;

    /// Applies all operations atomically: either every write lands or none does
    fn write_batch(&mut self, ops: &[WriteOp]) -> StorageResult<()>;
}
