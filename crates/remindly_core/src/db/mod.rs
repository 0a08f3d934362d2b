//! SQLite storage bootstrap.
//!
//! Opens connections for the slot store and makes sure `kv_slots` exists
//! before anything reads or writes a snapshot. Values are opaque JSON text
//! at this layer.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// SQLite could not open the file or in-memory database.
    Open {
        mode: &'static str,
        source: rusqlite::Error,
    },
    /// Connection opened but the slot table could not be prepared.
    Bootstrap(rusqlite::Error),
    /// A slot read or write failed.
    Query(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { mode, source } => write!(f, "failed to open {mode} database: {source}"),
            Self::Bootstrap(err) => write!(f, "failed to prepare slot table: {err}"),
            Self::Query(err) => write!(f, "slot query failed: {err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Bootstrap(err) | Self::Query(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Query(value)
    }
}
