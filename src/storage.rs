//! Local persistence for the journal.
//!
//! A single SQLite file acts as a small key/value medium:
//!
//! ```text
//! <data-dir>/journal.sqlite
//!   kv(key TEXT PRIMARY KEY, value TEXT)
//!     "wanderlog_entries" → JSON array of entries, newest first
//! ```
//!
//! The whole entry list is rewritten under one key on every save.

use std::{fs, io, path::Path};

use rusqlite::{Connection, OptionalExtension};

use crate::model::Entry;

/// Key holding the serialized entry list.
pub const ENTRIES_KEY: &str = "wanderlog_entries";

const DB_FILE: &str = "journal.sqlite";

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// Load-all / save-all access to the durable entry list.
pub trait EntryStore {
    /// Reads every stored entry, newest first. Empty if nothing was saved yet.
    fn load_all(&self) -> Result<Vec<Entry>>;

    /// Replaces the stored list with `entries`.
    fn save_all(&self, entries: &[Entry]) -> Result<()>;
}

/// SQLite-backed key/value storage.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Opens (or creates) the journal database inside `dir`.
    ///
    /// The directory is created if it doesn't exist.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join(DB_FILE))?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        log::debug!("opened journal at {}", dir.join(DB_FILE).display());
        Ok(Self { conn })
    }

    /// Reads the value stored under `key`.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }
}

impl EntryStore for Storage {
    fn load_all(&self) -> Result<Vec<Entry>> {
        match self.get(ENTRIES_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn save_all(&self, entries: &[Entry]) -> Result<()> {
        let json = serde_json::to_string(entries)?;
        self.set(ENTRIES_KEY, &json)
    }
}
