//! Insert, get, optimistic update, delete for knowledge units.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use tacit_core::errors::{TacitError, TacitResult};
use tacit_core::knowledge::{Confidence, KnowledgeUnit, Origin, Provenance, TrustState};

use crate::to_storage_err;

pub(crate) const UNIT_COLUMNS: &str = "id, domain, name, problem, solution, description, tags, \
     trust_state, confidence, origin, provenance, usage_count, content_hash, created_at, \
     updated_at, version";

pub fn insert_unit(conn: &Connection, unit: &KnowledgeUnit) -> TacitResult<()> {
    let tags = serde_json::to_string(&unit.tags)?;
    let provenance = serde_json::to_string(&unit.provenance)?;
    conn.execute(
        "INSERT INTO knowledge_units (
            id, domain, name, problem, solution, description, tags, trust_state,
            confidence, origin, provenance, usage_count, content_hash, created_at,
            updated_at, version
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            unit.id,
            unit.domain,
            unit.name,
            unit.problem,
            unit.solution,
            unit.description,
            tags,
            unit.trust_state.as_str(),
            unit.confidence.value(),
            unit.origin.as_str(),
            provenance,
            unit.usage_count as i64,
            unit.content_hash,
            unit.created_at.to_rfc3339(),
            unit.updated_at.to_rfc3339(),
            unit.version as i64,
        ],
    )
    .map_err(|e| match e {
        rusqlite::Error::SqliteFailure(f, _)
            if f.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            TacitError::validation(format!("knowledge unit {} already exists", unit.id))
        }
        other => to_storage_err(other.to_string()),
    })?;
    Ok(())
}

pub fn get_unit(conn: &Connection, id: &str) -> TacitResult<Option<KnowledgeUnit>> {
    let sql = format!("SELECT {UNIT_COLUMNS} FROM knowledge_units WHERE id = ?1");
    let row = conn
        .query_row(&sql, params![id], |row| Ok(row_to_unit(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    row.transpose()
}

/// Optimistic update keyed on `unit.version`. Usage count is not written here;
/// it only changes through [`super::usage::increment_usage`].
pub fn update_unit(conn: &Connection, unit: &KnowledgeUnit) -> TacitResult<u64> {
    let tags = serde_json::to_string(&unit.tags)?;
    let provenance = serde_json::to_string(&unit.provenance)?;
    let rows = conn
        .execute(
            "UPDATE knowledge_units SET
                name = ?2, problem = ?3, solution = ?4, description = ?5, tags = ?6,
                trust_state = ?7, confidence = ?8, origin = ?9, provenance = ?10,
                content_hash = ?11, updated_at = ?12, version = version + 1
             WHERE id = ?1 AND version = ?13",
            params![
                unit.id,
                unit.name,
                unit.problem,
                unit.solution,
                unit.description,
                tags,
                unit.trust_state.as_str(),
                unit.confidence.value(),
                unit.origin.as_str(),
                provenance,
                unit.content_hash,
                unit.updated_at.to_rfc3339(),
                unit.version as i64,
            ],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    if rows == 0 {
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM knowledge_units WHERE id = ?1)",
                params![unit.id],
                |row| row.get(0),
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
        return Err(if exists {
            TacitError::ConcurrencyConflict {
                unit_id: unit.id.clone(),
            }
        } else {
            TacitError::UnitNotFound {
                id: unit.id.clone(),
            }
        });
    }
    Ok(unit.version + 1)
}

/// Delete a unit. Its vector goes with it (ON DELETE CASCADE).
pub fn delete_unit(conn: &Connection, id: &str) -> TacitResult<()> {
    let rows = conn
        .execute("DELETE FROM knowledge_units WHERE id = ?1", params![id])
        .map_err(|e| to_storage_err(e.to_string()))?;
    if rows == 0 {
        return Err(TacitError::UnitNotFound { id: id.to_string() });
    }
    Ok(())
}

fn parse_time(raw: &str) -> TacitResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| to_storage_err(format!("bad timestamp {raw}: {e}")))
}

pub(crate) fn row_to_unit(row: &Row<'_>) -> TacitResult<KnowledgeUnit> {
    let get_str = |idx: usize| -> TacitResult<String> {
        row.get::<_, String>(idx)
            .map_err(|e| to_storage_err(e.to_string()))
    };
    let tags: BTreeSet<String> = serde_json::from_str(&get_str(6)?)?;
    let provenance: Provenance = serde_json::from_str(&get_str(10)?)?;
    let confidence: f64 = row.get(8).map_err(|e| to_storage_err(e.to_string()))?;
    let usage_count: i64 = row.get(11).map_err(|e| to_storage_err(e.to_string()))?;
    let version: i64 = row.get(15).map_err(|e| to_storage_err(e.to_string()))?;

    Ok(KnowledgeUnit {
        id: get_str(0)?,
        domain: get_str(1)?,
        name: get_str(2)?,
        problem: get_str(3)?,
        solution: get_str(4)?,
        description: get_str(5)?,
        tags,
        trust_state: get_str(7)?.parse::<TrustState>()?,
        confidence: Confidence::new(confidence),
        origin: get_str(9)?.parse::<Origin>()?,
        provenance,
        usage_count: usage_count.max(0) as u64,
        content_hash: get_str(12)?,
        created_at: parse_time(&get_str(13)?)?,
        updated_at: parse_time(&get_str(14)?)?,
        version: version.max(0) as u64,
    })
}
