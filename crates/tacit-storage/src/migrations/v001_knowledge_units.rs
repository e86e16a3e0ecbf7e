//! v001: knowledge_units.

use rusqlite::Connection;

use tacit_core::errors::TacitResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> TacitResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS knowledge_units (
            id            TEXT PRIMARY KEY,
            domain        TEXT NOT NULL,
            name          TEXT NOT NULL,
            problem       TEXT NOT NULL DEFAULT '',
            solution      TEXT NOT NULL,
            description   TEXT NOT NULL DEFAULT '',
            tags          TEXT NOT NULL DEFAULT '[]',
            trust_state   TEXT NOT NULL DEFAULT 'candidate',
            confidence    REAL NOT NULL DEFAULT 0.5,
            origin        TEXT NOT NULL DEFAULT 'authored',
            provenance    TEXT NOT NULL DEFAULT '{}',
            usage_count   INTEGER NOT NULL DEFAULT 0,
            content_hash  TEXT NOT NULL,
            created_at    TEXT NOT NULL,
            updated_at    TEXT NOT NULL,
            version       INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_units_domain ON knowledge_units(domain);
        CREATE INDEX IF NOT EXISTS idx_units_domain_state ON knowledge_units(domain, trust_state);
        CREATE INDEX IF NOT EXISTS idx_units_domain_hash ON knowledge_units(domain, content_hash);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
