//! PRAGMA configuration applied to every SQLite connection.

use rusqlite::Connection;

use tacit_core::errors::TacitResult;

use crate::to_storage_err;

/// WAL, NORMAL sync, 5s busy timeout, foreign keys on.
pub fn apply_pragmas(conn: &Connection) -> TacitResult<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA cache_size = -16000;
        PRAGMA busy_timeout = 5000;
        PRAGMA foreign_keys = ON;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Read connections only need the busy timeout and query-only mode.
pub fn apply_read_pragmas(conn: &Connection) -> TacitResult<()> {
    conn.execute_batch(
        "
        PRAGMA busy_timeout = 5000;
        PRAGMA query_only = ON;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn verify_wal_mode(conn: &Connection) -> TacitResult<bool> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}
