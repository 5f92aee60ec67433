//! Storage module for the persistent artifact cache state
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Plain key-value entries (the bidirectional origin/artifact mapping)
//! - Named ordered sets (the artifact recency index)
//! - Atomic batches spanning both

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{KeyValueStore, StorageError, StorageResult, WriteOp};

use std::path::Path;

/// Initializes or opens a storage database
///
/// Call once per process and pass the store by reference to its users.
pub fn open_storage(path: &Path) -> StorageResult<SqliteStore> {
    SqliteStore::open(path)
}
