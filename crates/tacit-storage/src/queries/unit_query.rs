//! Domain-scoped unit listing.

use rusqlite::{params, Connection, ToSql};

use tacit_core::errors::TacitResult;
use tacit_core::knowledge::{KnowledgeUnit, TrustState};

use super::unit_crud::{row_to_unit, UNIT_COLUMNS};
use crate::to_storage_err;

fn collect(conn: &Connection, sql: &str, args: &[&dyn ToSql]) -> TacitResult<Vec<KnowledgeUnit>> {
    let mut stmt = conn.prepare(sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(args, |row| Ok(row_to_unit(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut units = Vec::new();
    for row in rows {
        units.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(units)
}

/// All units in a domain, ordered by id for stable iteration.
pub fn list_by_domain(conn: &Connection, domain: &str) -> TacitResult<Vec<KnowledgeUnit>> {
    let sql = format!("SELECT {UNIT_COLUMNS} FROM knowledge_units WHERE domain = ?1 ORDER BY id");
    collect(conn, &sql, params![domain])
}

pub fn list_by_trust_state(
    conn: &Connection,
    domain: &str,
    state: TrustState,
) -> TacitResult<Vec<KnowledgeUnit>> {
    let sql = format!(
        "SELECT {UNIT_COLUMNS} FROM knowledge_units
         WHERE domain = ?1 AND trust_state = ?2 ORDER BY created_at, id"
    );
    collect(conn, &sql, params![domain, state.as_str()])
}

pub fn find_by_content_hash(
    conn: &Connection,
    domain: &str,
    content_hash: &str,
) -> TacitResult<Option<KnowledgeUnit>> {
    let sql = format!(
        "SELECT {UNIT_COLUMNS} FROM knowledge_units
         WHERE domain = ?1 AND content_hash = ?2 ORDER BY id LIMIT 1"
    );
    Ok(collect(conn, &sql, params![domain, content_hash])?.into_iter().next())
}

pub fn count_by_domain(conn: &Connection, domain: &str) -> TacitResult<usize> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM knowledge_units WHERE domain = ?1",
            params![domain],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count.max(0) as usize)
}
