//! v003: encoder name and question vector on unit_embeddings.
//!
//! Rows written before this carry an empty provider and read back as stale.

use rusqlite::Connection;

use tacit_core::errors::TacitResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> TacitResult<()> {
    conn.execute_batch(
        "
        ALTER TABLE unit_embeddings ADD COLUMN provider TEXT NOT NULL DEFAULT '';
        ALTER TABLE unit_embeddings ADD COLUMN question_embedding BLOB;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
