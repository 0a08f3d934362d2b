//! Connection bootstrap for the slot database.
//!
//! # Invariants
//! - Returned connections have `kv_slots` present.
//! - Bootstrap is idempotent for an existing database file.

use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const KV_SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS kv_slots (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now') * 1000)
);";

/// Opens (or creates) a database file ready for slot access.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_with("file", || Connection::open(path))
}

/// Opens a private in-memory database; contents die with the connection.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    let result = connect()
        .map_err(|source| DbError::Open { mode, source })
        .and_then(|conn| prepare_slots(&conn).map(|()| conn));

    let duration_ms = started_at.elapsed().as_millis();
    match &result {
        Ok(_) => info!("event=db_open module=db status=ok mode={mode} duration_ms={duration_ms}"),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={duration_ms} error={err}"
        ),
    }
    result
}

fn prepare_slots(conn: &Connection) -> DbResult<()> {
    conn.busy_timeout(BUSY_TIMEOUT)
        .and_then(|()| conn.execute_batch(KV_SCHEMA_SQL))
        .map_err(DbError::Bootstrap)
}
