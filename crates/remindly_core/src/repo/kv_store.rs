//! Durable key-value slot storage.
//!
//! # Responsibility
//! - Define the async storage contract consumed by the persistence gateway.
//! - Provide a SQLite-backed implementation and an in-memory one.
//!
//! # Invariants
//! - `set` overwrites the whole slot value in one statement.
//! - `get` on a missing key returns `Ok(None)`, never an error.
//! - `remove` on a missing key is a no-op.

use crate::db::{open_db, open_db_in_memory, DbError};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::Mutex;

pub type StorageResult<T> = Result<T, StorageError>;

/// Durable storage failure surfaced to callers.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    /// Snapshot could not be encoded for the given slot.
    Encode {
        slot: &'static str,
        source: serde_json::Error,
    },
    /// A previous caller panicked while holding the storage lock.
    LockPoisoned,
    /// Failure reported by a non-SQLite backend.
    Backend(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode { slot, source } => {
                write!(f, "failed to encode `{slot}` snapshot: {source}")
            }
            Self::LockPoisoned => write!(f, "storage lock poisoned"),
            Self::Backend(message) => write!(f, "storage backend failure: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode { source, .. } => Some(source),
            Self::LockPoisoned | Self::Backend(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Query(value))
    }
}

/// Async key-value storage for serialized snapshots.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    async fn remove(&self, key: &str) -> StorageResult<()>;
}

/// SQLite-backed slot storage.
pub struct SqliteKeyValueStore {
    conn: Mutex<Connection>,
}

impl SqliteKeyValueStore {
    /// Wraps a connection already bootstrapped by `db::open_db*`.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Opens (or creates) a database file.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    /// Opens an ephemeral in-memory database.
    pub fn open_in_memory() -> StorageResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> StorageResult<T> {
        let conn = self.conn.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(f(&conn)?)
    }
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT value FROM kv_slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()
        })
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO kv_slots (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = (strftime('%s', 'now') * 1000);",
                params![key, value],
            )
        })?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        self.with_conn(|conn| conn.execute("DELETE FROM kv_slots WHERE key = ?1;", [key]))?;
        Ok(())
    }
}

/// Process-local slot storage. Contents vanish with the value.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    slots: Mutex<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let slots = self.slots.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(slots.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut slots = self.slots.lock().map_err(|_| StorageError::LockPoisoned)?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        let mut slots = self.slots.lock().map_err(|_| StorageError::LockPoisoned)?;
        slots.remove(key);
        Ok(())
    }
}
