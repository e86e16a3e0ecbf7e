//! Closed sets of routing policies and specialist kinds, resolved by name.

use serde::{Deserialize, Serialize};
use tacit_core::errors::{TacitError, TacitResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingPolicy {
    /// Single highest-scoring specialist; ties go to the earliest declared.
    ConfidenceBased,
    /// Every specialist at or above the threshold, best first.
    MultiSpecialist,
    /// Every specialist, unconditionally.
    Parallel,
    /// Declared order, stopping at the first that reaches the threshold.
    Sequential,
}

const POLICY_TABLE: &[(&str, RoutingPolicy)] = &[
    ("confidence", RoutingPolicy::ConfidenceBased),
    ("confidence_based", RoutingPolicy::ConfidenceBased),
    ("multi", RoutingPolicy::MultiSpecialist),
    ("multi_specialist", RoutingPolicy::MultiSpecialist),
    ("parallel", RoutingPolicy::Parallel),
    ("sequential", RoutingPolicy::Sequential),
];

impl RoutingPolicy {
    pub fn from_name(name: &str) -> TacitResult<Self> {
        lookup(POLICY_TABLE, name)
            .ok_or_else(|| TacitError::validation(format!("unknown routing policy: {name}")))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConfidenceBased => "confidence",
            Self::MultiSpecialist => "multi",
            Self::Parallel => "parallel",
            Self::Sequential => "sequential",
        }
    }
}

/// How a specialist computes its score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialistKind {
    /// max(vocabulary overlap, best in-category search score).
    Hybrid,
    /// Vocabulary overlap only.
    Keyword,
    /// Best in-category search score only.
    Knowledge,
}

const KIND_TABLE: &[(&str, SpecialistKind)] = &[
    ("hybrid", SpecialistKind::Hybrid),
    ("keyword", SpecialistKind::Keyword),
    ("knowledge", SpecialistKind::Knowledge),
    ("semantic", SpecialistKind::Knowledge),
];

impl SpecialistKind {
    pub fn from_name(name: &str) -> TacitResult<Self> {
        lookup(KIND_TABLE, name)
            .ok_or_else(|| TacitError::validation(format!("unknown specialist kind: {name}")))
    }
}

fn lookup<T: Copy>(table: &[(&str, T)], name: &str) -> Option<T> {
    let needle = name.trim().to_ascii_lowercase().replace('-', "_");
    table.iter().find(|(n, _)| *n == needle).map(|(_, v)| *v)
}
