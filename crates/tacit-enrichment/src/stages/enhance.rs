//! Enhance stages. Each appends to the result and leaves the rest intact.

use std::collections::HashSet;

use serde_json::json;
use tacit_core::models::{Annotation, Citation, QueryResult};
use tacit_core::TrustState;

/// Upper bound on citations added per query.
const MAX_CITATIONS: usize = 5;

/// Weight applied to a candidate's score in the quality estimate.
const CANDIDATE_WEIGHT: f64 = 0.6;

/// Cite the supporting units, skipping any already cited.
pub fn citations(mut result: QueryResult) -> QueryResult {
    let cited: HashSet<String> = result.citations.iter().map(|c| c.unit_id.clone()).collect();
    let fresh: Vec<Citation> = result
        .matched
        .iter()
        .filter(|m| !cited.contains(&m.unit.id))
        .take(MAX_CITATIONS)
        .map(|m| Citation {
            unit_id: m.unit.id.clone(),
            name: m.unit.name.clone(),
            trust_state: m.unit.trust_state,
            score: m.score,
        })
        .collect();
    result.citations.extend(fresh);
    result
}

/// Trust-weighted mean score of the matched units, in [0,1].
pub fn quality_estimate(result: &QueryResult) -> f64 {
    if result.matched.is_empty() {
        return 0.0;
    }
    let total: f64 = result
        .matched
        .iter()
        .map(|m| match m.unit.trust_state {
            TrustState::Certified => m.score,
            TrustState::Candidate => m.score * CANDIDATE_WEIGHT,
        })
        .sum();
    (total / result.matched.len() as f64).clamp(0.0, 1.0)
}

pub fn quality_score(mut result: QueryResult) -> QueryResult {
    let quality = quality_estimate(&result);
    let certified = result.matched.iter().filter(|m| m.unit.is_certified()).count();
    result.annotations.push(Annotation {
        stage: "quality_score".to_string(),
        key: "quality_score".to_string(),
        value: json!({ "score": quality, "certified_matches": certified }),
    });
    result
}

pub fn usage_stats(mut result: QueryResult) -> QueryResult {
    let per_unit: serde_json::Map<String, serde_json::Value> = result
        .matched
        .iter()
        .map(|m| (m.unit.id.clone(), json!(m.unit.usage_count)))
        .collect();
    let total: u64 = result.matched.iter().map(|m| m.unit.usage_count).sum();
    result.annotations.push(Annotation {
        stage: "usage_stats".to_string(),
        key: "usage_stats".to_string(),
        value: json!({ "total": total, "units": per_unit }),
    });
    result
}
