//! SQLite-backed key-value slot.
//!
//! # Responsibility
//! - Persist the encoded member blob in the `kv_store` table.
//!
//! # Invariants
//! - Each save replaces the row under the fixed key in one statement.
//! - Connections passed in must already be migrated (see `db::open_db`).

use super::{decode_members, encode_members, Store, StoreResult, STORAGE_KEY};
use crate::db::{open_db, open_db_in_memory};
use crate::model::member::Member;
use log::{debug, error};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Member collection store over a migrated SQLite connection.
pub struct SqliteStore {
    conn: Connection,
    key: String,
}

impl SqliteStore {
    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps an already migrated connection using the default key.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            key: STORAGE_KEY.to_string(),
        }
    }

    /// Uses a different slot key; lets several collections share one file.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn read_blob(&self) -> StoreResult<Option<String>> {
        let blob = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [self.key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(blob)
    }
}

impl Store for SqliteStore {
    fn load(&self) -> StoreResult<Vec<Member>> {
        let blob = match self.read_blob() {
            Ok(blob) => blob,
            Err(err) => {
                error!(
                    "event=store_load module=store status=error backend=sqlite key={} error={}",
                    self.key, err
                );
                return Err(err);
            }
        };

        let Some(blob) = blob else {
            debug!(
                "event=store_load module=store status=empty backend=sqlite key={}",
                self.key
            );
            return Ok(Vec::new());
        };

        let members = decode_members(&blob)?;
        debug!(
            "event=store_load module=store status=ok backend=sqlite key={} count={}",
            self.key,
            members.len()
        );
        Ok(members)
    }

    fn save(&self, members: &[Member]) -> StoreResult<()> {
        let blob = encode_members(members)?;
        let result = self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![self.key.as_str(), blob],
        );

        match result {
            Ok(_) => {
                debug!(
                    "event=store_save module=store status=ok backend=sqlite key={} count={}",
                    self.key,
                    members.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_save module=store status=error backend=sqlite key={} error={}",
                    self.key, err
                );
                Err(err.into())
            }
        }
    }
}
