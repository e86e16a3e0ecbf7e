//! Usage counters.

use rusqlite::{params, Connection, OptionalExtension};

use tacit_core::errors::{TacitError, TacitResult};

use crate::to_storage_err;

/// Atomically increment and return the new count.
pub fn increment_usage(conn: &Connection, id: &str) -> TacitResult<u64> {
    let count: Option<i64> = conn
        .query_row(
            "UPDATE knowledge_units SET usage_count = usage_count + 1
             WHERE id = ?1 RETURNING usage_count",
            params![id],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    count
        .map(|c| c.max(0) as u64)
        .ok_or_else(|| TacitError::UnitNotFound { id: id.to_string() })
}
