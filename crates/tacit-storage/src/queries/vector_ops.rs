//! Vector store: one embedding per unit, tagged with the content hash it was
//! derived from.

use rusqlite::{params, Connection, OptionalExtension};

use tacit_core::errors::TacitResult;
use tacit_core::knowledge::StoredEmbedding;

use crate::to_storage_err;

pub fn store_embedding(conn: &Connection, embedding: &StoredEmbedding) -> TacitResult<()> {
    conn.execute(
        "INSERT INTO unit_embeddings
            (unit_id, content_hash, provider, embedding, question_embedding, dimensions)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(unit_id) DO UPDATE SET
            content_hash = excluded.content_hash,
            provider = excluded.provider,
            embedding = excluded.embedding,
            question_embedding = excluded.question_embedding,
            dimensions = excluded.dimensions,
            created_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
        params![
            embedding.unit_id,
            embedding.content_hash,
            embedding.provider,
            f32_vec_to_bytes(&embedding.vector),
            embedding.question_vector.as_deref().map(f32_vec_to_bytes),
            embedding.vector.len() as i64,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn get_embedding(conn: &Connection, unit_id: &str) -> TacitResult<Option<StoredEmbedding>> {
    conn.query_row(
        "SELECT unit_id, content_hash, provider, embedding, question_embedding
         FROM unit_embeddings WHERE unit_id = ?1",
        params![unit_id],
        row_to_embedding,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn embeddings_for_domain(conn: &Connection, domain: &str) -> TacitResult<Vec<StoredEmbedding>> {
    let mut stmt = conn
        .prepare(
            "SELECT e.unit_id, e.content_hash, e.provider, e.embedding, e.question_embedding
             FROM unit_embeddings e
             JOIN knowledge_units u ON u.id = e.unit_id
             WHERE u.domain = ?1
             ORDER BY e.unit_id",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![domain], row_to_embedding)
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.map(|r| r.map_err(|e| to_storage_err(e.to_string())))
        .collect()
}

pub fn delete_embedding(conn: &Connection, unit_id: &str) -> TacitResult<()> {
    conn.execute(
        "DELETE FROM unit_embeddings WHERE unit_id = ?1",
        params![unit_id],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

fn row_to_embedding(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredEmbedding> {
    let blob: Vec<u8> = row.get(3)?;
    let question: Option<Vec<u8>> = row.get(4)?;
    Ok(StoredEmbedding {
        unit_id: row.get(0)?,
        content_hash: row.get(1)?,
        provider: row.get(2)?,
        vector: bytes_to_f32_vec(&blob),
        question_vector: question.as_deref().map(bytes_to_f32_vec),
    })
}

/// Little-endian f32 encoding.
fn f32_vec_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

fn bytes_to_f32_vec(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}
