//! v002: unit_embeddings, one vector per unit tagged with its source hash.

use rusqlite::Connection;

use tacit_core::errors::TacitResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> TacitResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS unit_embeddings (
            unit_id       TEXT PRIMARY KEY,
            content_hash  TEXT NOT NULL,
            embedding     BLOB NOT NULL,
            dimensions    INTEGER NOT NULL,
            created_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            FOREIGN KEY (unit_id) REFERENCES knowledge_units(id) ON DELETE CASCADE
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
