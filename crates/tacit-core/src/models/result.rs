use serde::{Deserialize, Serialize};

use super::generation::{DocumentReference, TokenUsage};
use super::query::UnitScore;
use super::search::ScoredUnit;
use crate::knowledge::TrustState;

/// A supporting-unit citation added by an enhance stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub unit_id: String,
    pub name: String,
    pub trust_state: TrustState,
    pub score: f64,
}

/// Free-form information attached by an enhance stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub stage: String,
    pub key: String,
    pub value: serde_json::Value,
}

/// What generation contributed to a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub provider: String,
    pub model_id: String,
    pub claimed_confidence: Option<f64>,
    /// Confidence after the ceiling was applied.
    pub applied_confidence: f64,
    pub usage: TokenUsage,
    /// Candidate unit the answer was recorded as (new or deduplicated).
    pub candidate_id: Option<String>,
    pub deduplicated: bool,
}

/// The working result that flows through the enricher chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    pub query: String,
    pub domain: String,
    pub answer: String,
    pub confidence: f64,
    pub matched: Vec<ScoredUnit>,
    /// Specialists whose output was merged into `matched`.
    pub specialists: Vec<String>,
    pub citations: Vec<Citation>,
    pub annotations: Vec<Annotation>,
    pub references: Vec<DocumentReference>,
    pub generation: Option<GenerationRecord>,
    /// Best certified unit the domain search found, kept whether or not a
    /// routed specialist selected it.
    #[serde(default)]
    pub certified_hit: Option<ScoredUnit>,
}

impl QueryResult {
    /// Build the pre-enrichment result from merged specialist matches.
    ///
    /// The answer is the best unit's solution; confidence is supplied by routing.
    pub fn from_matches(
        query: impl Into<String>,
        domain: impl Into<String>,
        matched: Vec<ScoredUnit>,
        specialists: Vec<String>,
        confidence: f64,
    ) -> Self {
        let answer = matched
            .first()
            .map(|m| m.unit.solution.clone())
            .unwrap_or_default();
        Self {
            query: query.into(),
            domain: domain.into(),
            answer,
            confidence,
            matched,
            specialists,
            citations: Vec::new(),
            annotations: Vec::new(),
            references: Vec::new(),
            generation: None,
            certified_hit: None,
        }
    }

    /// Remember the strongest certified unit among the raw search `hits`.
    pub fn with_certified_hit(mut self, hits: &[ScoredUnit]) -> Self {
        self.certified_hit = strongest_certified(hits).cloned();
        self
    }

    /// Take `unit` into the matches, re-rank, and answer from the new leader.
    /// Confidence only goes up.
    pub fn adopt(&mut self, unit: ScoredUnit) {
        if self.matched.iter().any(|m| m.unit.id == unit.unit.id) {
            return;
        }
        self.confidence = self.confidence.max(unit.score);
        self.matched.push(unit);
        self.matched.sort_by(ScoredUnit::ranking_cmp);
        if let Some(top) = self.matched.first() {
            self.answer = top.unit.solution.clone();
        }
    }

    pub fn generation_used(&self) -> bool {
        self.generation.is_some()
    }

    /// Best certified match, if any.
    pub fn best_certified(&self) -> Option<&ScoredUnit> {
        strongest_certified(&self.matched)
    }

    pub fn unit_scores(&self) -> Vec<UnitScore> {
        self.matched
            .iter()
            .map(|m| UnitScore {
                unit_id: m.unit.id.clone(),
                score: m.score,
            })
            .collect()
    }

    pub fn annotation(&self, key: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.key == key)
    }
}

fn strongest_certified(units: &[ScoredUnit]) -> Option<&ScoredUnit> {
    units
        .iter()
        .filter(|m| m.unit.is_certified())
        .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal))
}
