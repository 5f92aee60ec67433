//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Site-Ingest database.

use crate::storage::traits::{StorageError, StorageResult};
use rusqlite::Connection;

/// Current schema version, stored in `PRAGMA user_version`
pub const SCHEMA_VERSION: u32 = 1;

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Plain string keys (origin -> artifact, artifact -> origin)
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Named ordered sets (artifact recency)
CREATE TABLE IF NOT EXISTS zset (
    name TEXT NOT NULL,
    member TEXT NOT NULL,
    score INTEGER NOT NULL,
    PRIMARY KEY (name, member)
);

CREATE INDEX IF NOT EXISTS idx_zset_score ON zset(name, score);
"#;

/// Initializes the database schema
///
/// Refuses to open a database written by a newer schema version.
pub fn initialize_schema(conn: &Connection) -> StorageResult<()> {
    let version: u32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version > SCHEMA_VERSION {
        return Err(StorageError::Database(format!(
            "database schema version {} is newer than supported version {}",
            version, SCHEMA_VERSION
        )));
    }

    conn.execute_batch(SCHEMA_SQL)?;
    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    Ok(())
}
