//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the KeyValueStore trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{KeyValueStore, StorageResult, WriteOp};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens or creates the database at `path`
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn apply_set(conn: &Connection, key: &str, value: &str) -> StorageResult<()> {
    conn.execute(
        "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value, Utc::now().to_rfc3339()],
    )?;
    Ok(())
}

fn apply_zadd(conn: &Connection, set: &str, member: &str, score: i64) -> StorageResult<()> {
    conn.execute(
        "INSERT INTO zset (name, member, score) VALUES (?1, ?2, ?3)
         ON CONFLICT(name, member) DO UPDATE SET score = excluded.score",
        params![set, member, score],
    )?;
    Ok(())
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        apply_set(&self.conn, key, value)
    }

    fn zadd(&mut self, set: &str, member: &str, score: i64) -> StorageResult<()> {
        apply_zadd(&self.conn, set, member, score)
    }

    fn zscore(&self, set: &str, member: &str) -> StorageResult<Option<i64>> {
        let score = self
            .conn
            .query_row(
                "SELECT score FROM zset WHERE name = ?1 AND member = ?2",
                params![set, member],
                |row| row.get(0),
            )
            .optional()?;
        Ok(score)
    }

    fn zrange(&self, set: &str) -> StorageResult<Vec<(String, i64)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT member, score FROM zset WHERE name = ?1 ORDER BY score, member")?;

        let members = stmt
            .query_map(params![set], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(members)
    }

    fn write_batch(&mut self, ops: &[WriteOp]) -> StorageResult<()> {
        let tx = self.conn.transaction()?;

        for op in ops {
            match op {
                WriteOp::Set { key, value } => apply_set(&tx, key, value)?,
                WriteOp::ZAdd { set, member, score } => apply_zadd(&tx, set, member, *score)?,
            }
        }

        // Dropping `tx` on an early return rolls the batch back
        tx.commit()?;
        Ok(())
    }
}
