//! String key-value persistence.
//!
//! Screens that keep data between launches (notes, profile fields) go
//! through [`KeyValueStore`] instead of touching files directly, so tests
//! can swap in [`MemoryStore`].

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use rusqlite::{params, Connection};
use tracing::debug;

use crate::error::StorageError;

/// Read-modify-write callback for [`KeyValueStore::update`]. Receives the
/// current value and returns the one to store.
pub type UpdateFn<'a> = dyn FnMut(Option<String>) -> crate::error::Result<String> + 'a;

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
    /// Drop every key (logout).
    fn clear(&mut self) -> Result<(), StorageError>;

    /// Replace the value under `key` with whatever `f` derives from it.
    ///
    /// Nothing is written when `f` fails. Stores shared between processes
    /// must run the read and the write under one lock.
    fn update(&mut self, key: &str, f: &mut UpdateFn<'_>) -> crate::error::Result<()> {
        let next = f(self.get(key)?)?;
        self.set(key, &next)?;
        Ok(())
    }
}

/// In-process store; contents vanish with the value.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        Ok(())
    }
}

/// SQLite-backed store: a single `kv` table in `studydesk.db`.
///
/// Every call goes straight to the database, so several handles (or
/// processes) on the same file always see each other's writes.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open `studydesk.db` in the data directory.
    ///
    /// Creates the database file and table if they don't exist.
    pub fn open_default() -> crate::error::Result<Self> {
        let path = super::data_dir()?.join("studydesk.db");
        Ok(Self::open(path)?)
    }

    /// Open (or create) the store at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::init(conn)?;
        debug!(path = %path.display(), "opened kv store");
        Ok(store)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, StorageError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StorageError> {
        // Wait out a concurrent writer instead of failing with SQLITE_BUSY.
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(Self { conn })
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.write(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.conn.execute("DELETE FROM kv", [])?;
        Ok(())
    }

    /// Runs inside `BEGIN IMMEDIATE`, so the write lock is held from the
    /// read through the write and concurrent updates serialize.
    fn update(&mut self, key: &str, f: &mut UpdateFn<'_>) -> crate::error::Result<()> {
        self.conn
            .execute_batch("BEGIN IMMEDIATE TRANSACTION;")
            .map_err(StorageError::from)?;
        let result: crate::error::Result<()> = (|| {
            let next = f(self.get(key)?)?;
            self.write(key, &next)?;
            Ok(())
        })();
        match result {
            Ok(()) => {
                self.conn
                    .execute_batch("COMMIT;")
                    .map_err(StorageError::from)?;
                Ok(())
            }
            Err(e) => {
                if let Err(rollback) = self.conn.execute_batch("ROLLBACK;") {
                    debug!(error = %rollback, "rollback failed");
                }
                Err(e)
            }
        }
    }
}
