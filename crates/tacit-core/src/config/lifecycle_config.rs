use serde::{Deserialize, Serialize};

use super::defaults;

/// Pattern lifecycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Minimum confidence for a certified unit.
    pub certification_threshold: f64,
    /// Confidence of a generated candidate when the provider claims none.
    pub candidate_confidence: f64,
    /// Lexical similarity at which two generated questions are duplicates.
    pub dedup_similarity: f64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            certification_threshold: defaults::DEFAULT_CERTIFICATION_THRESHOLD,
            candidate_confidence: defaults::DEFAULT_CANDIDATE_CONFIDENCE,
            dedup_similarity: defaults::DEFAULT_DEDUP_SIMILARITY,
        }
    }
}
