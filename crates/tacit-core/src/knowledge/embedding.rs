use serde::{Deserialize, Serialize};

use super::unit::KnowledgeUnit;

/// A persisted embedding vector, 1:1 with a knowledge unit.
///
/// Tagged with the content hash of the unit text it was derived from and the
/// encoder that produced it. Vectors from different encoders live in
/// different spaces and are never compared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEmbedding {
    pub unit_id: String,
    pub content_hash: String,
    pub provider: String,
    pub vector: Vec<f32>,
    /// Vector of the question fields alone (name and problem).
    #[serde(default)]
    pub question_vector: Option<Vec<f32>>,
}

impl StoredEmbedding {
    pub fn new(
        unit_id: impl Into<String>,
        content_hash: impl Into<String>,
        provider: impl Into<String>,
        vector: Vec<f32>,
    ) -> Self {
        Self {
            unit_id: unit_id.into(),
            content_hash: content_hash.into(),
            provider: provider.into(),
            vector,
            question_vector: None,
        }
    }

    pub fn with_question(mut self, vector: Vec<f32>) -> Self {
        self.question_vector = Some(vector);
        self
    }

    /// A vector is stale when the unit's current hash no longer matches.
    pub fn is_stale_for(&self, unit: &KnowledgeUnit) -> bool {
        self.unit_id != unit.id || self.content_hash != unit.content_hash
    }

    /// Usable against a query encoded by `provider`.
    pub fn is_current(&self, unit: &KnowledgeUnit, provider: &str) -> bool {
        !self.is_stale_for(unit) && self.provider == provider
    }

    pub fn dimensions(&self) -> usize {
        self.vector.len()
    }
}
