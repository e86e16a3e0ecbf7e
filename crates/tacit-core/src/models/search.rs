use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::knowledge::KnowledgeUnit;

/// Per-domain weights for hybrid scoring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchWeights {
    pub semantic: f64,
    pub lexical: f64,
}

impl Default for SearchWeights {
    /// Pure semantic scoring.
    fn default() -> Self {
        Self {
            semantic: 1.0,
            lexical: 0.0,
        }
    }
}

impl SearchWeights {
    pub fn combine(&self, semantic: f64, lexical: f64) -> f64 {
        self.semantic * semantic + self.lexical * lexical
    }
}

/// A knowledge unit with its hybrid score breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredUnit {
    pub unit: KnowledgeUnit,
    /// Combined score used for ranking.
    pub score: f64,
    /// Cosine similarity in [0,1]; `None` when search ran degraded.
    pub semantic: Option<f64>,
    pub lexical: f64,
}

impl ScoredUnit {
    /// Ranking order: score desc, certified before candidate, usage desc, id asc.
    pub fn ranking_cmp(a: &Self, b: &Self) -> Ordering {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.unit.trust_state.rank().cmp(&b.unit.trust_state.rank()))
            .then_with(|| b.unit.usage_count.cmp(&a.unit.usage_count))
            .then_with(|| a.unit.id.cmp(&b.unit.id))
    }
}

/// Result of one knowledge base search pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Ranked hits, best first.
    pub hits: Vec<ScoredUnit>,
    /// The encoder was unavailable and scoring fell back to lexical-only.
    pub degraded: bool,
    /// Units whose encoding text was truncated to fit the token budget.
    pub truncated_units: Vec<String>,
    /// Units excluded because their vector was missing or stale.
    pub stale_units: Vec<String>,
    /// Whether this outcome came from an actual search (false when skipped).
    pub searched: bool,
}

impl SearchOutcome {
    /// Outcome used when local search is skipped.
    pub fn skipped() -> Self {
        Self::default()
    }

    pub fn best_score(&self) -> f64 {
        self.hits.first().map(|h| h.score).unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}
