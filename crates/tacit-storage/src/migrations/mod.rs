//! Schema migrations, tracked with `PRAGMA user_version`.

mod v001_knowledge_units;
mod v002_unit_embeddings;
mod v003_embedding_provenance;

use rusqlite::Connection;
use tracing::info;

use tacit_core::errors::{StorageError, TacitResult};

use crate::to_storage_err;

type Migration = fn(&Connection) -> TacitResult<()>;

const MIGRATIONS: &[(u32, Migration)] = &[
    (1, v001_knowledge_units::migrate),
    (2, v002_unit_embeddings::migrate),
    (3, v003_embedding_provenance::migrate),
];

pub const LATEST_VERSION: u32 = 3;

pub fn current_version(conn: &Connection) -> TacitResult<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Apply every migration newer than the stored version, each in its own
/// transaction.
pub fn run_migrations(conn: &Connection) -> TacitResult<u32> {
    let start = current_version(conn)?;
    let mut version = start;
    for (target, migrate) in MIGRATIONS.iter().filter(|(v, _)| *v > start) {
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| to_storage_err(format!("migration begin: {e}")))?;
        migrate(&tx).map_err(|e| StorageError::MigrationFailed {
            version: *target,
            reason: e.to_string(),
        })?;
        tx.pragma_update(None, "user_version", *target)
            .map_err(|e| to_storage_err(e.to_string()))?;
        tx.commit().map_err(|e| StorageError::MigrationFailed {
            version: *target,
            reason: e.to_string(),
        })?;
        info!(version = *target, "applied storage migration");
        version = *target;
    }
    Ok(version)
}
