use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A human-submitted unit before it is stored as a candidate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitDraft {
    pub name: String,
    pub problem: String,
    pub solution: String,
    pub description: String,
    pub tags: BTreeSet<String>,
    pub confidence: Option<f64>,
}

/// Reviewer edits. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitEdit {
    pub name: Option<String>,
    pub problem: Option<String>,
    pub solution: Option<String>,
    pub description: Option<String>,
    pub tags: Option<BTreeSet<String>>,
    pub confidence: Option<f64>,
}

impl UnitEdit {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.problem.is_none()
            && self.solution.is_none()
            && self.description.is_none()
            && self.tags.is_none()
            && self.confidence.is_none()
    }
}

/// An explicit reviewer action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub reviewer: String,
    /// Confidence the reviewer assigns; promotion requires it to meet the
    /// certification threshold.
    pub confidence: Option<f64>,
    pub note: Option<String>,
}

impl Review {
    pub fn by(reviewer: impl Into<String>) -> Self {
        Self {
            reviewer: reviewer.into(),
            confidence: None,
            note: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// Advisory output of the offline review pass. Never applied automatically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromotionRecommendation {
    pub unit_id: String,
    pub domain: String,
    pub usage_count: u64,
    pub confidence: f64,
    pub reason: String,
}
