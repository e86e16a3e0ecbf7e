use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::confidence::Confidence;
use crate::constants::{TAG_CANDIDATE, TAG_GENERATED};
use crate::errors::{TacitError, TacitResult};

/// Trust state of a knowledge unit.
///
/// The transient "generated" state never reaches storage; generated answers
/// become `Candidate` as soon as they are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustState {
    Candidate,
    Certified,
}

impl TrustState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Candidate => "candidate",
            Self::Certified => "certified",
        }
    }

    /// Sort key: certified knowledge ranks ahead of candidates.
    pub fn rank(self) -> u8 {
        match self {
            Self::Certified => 0,
            Self::Candidate => 1,
        }
    }
}

impl fmt::Display for TrustState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrustState {
    type Err = TacitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "candidate" => Ok(Self::Candidate),
            "certified" => Ok(Self::Certified),
            other => Err(TacitError::validation(format!("unknown trust state: {other}"))),
        }
    }
}

/// Where a unit came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Authored,
    Generated,
}

impl Origin {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Authored => "authored",
            Self::Generated => "generated",
        }
    }
}

impl FromStr for Origin {
    type Err = TacitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "authored" => Ok(Self::Authored),
            "generated" => Ok(Self::Generated),
            other => Err(TacitError::validation(format!("unknown origin: {other}"))),
        }
    }
}

/// Provenance block. Review fields stay `None` until a reviewer acts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Provenance {
    /// Query text that triggered generation.
    pub origin_query: Option<String>,
    /// Identifier of the generating model.
    pub model_id: Option<String>,
    pub generated_at: Option<DateTime<Utc>>,
    pub reviewer: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// A stored problem/solution record with trust state and provenance.
///
/// Its embedding vector lives in the vector store under the same `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeUnit {
    pub id: String,
    pub domain: String,
    pub name: String,
    pub problem: String,
    pub solution: String,
    pub description: String,
    pub tags: BTreeSet<String>,
    pub trust_state: TrustState,
    pub confidence: Confidence,
    pub origin: Origin,
    pub provenance: Provenance,
    pub usage_count: u64,
    /// blake3 hash of the embeddable text fields.
    pub content_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Optimistic concurrency version, bumped on every stored update.
    #[serde(default)]
    pub version: u64,
}

impl KnowledgeUnit {
    /// Build a new authored candidate. The content hash is computed here.
    pub fn new_candidate(
        id: impl Into<String>,
        domain: impl Into<String>,
        name: impl Into<String>,
        problem: impl Into<String>,
        solution: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        let mut unit = Self {
            id: id.into(),
            domain: domain.into(),
            name: name.into(),
            problem: problem.into(),
            solution: solution.into(),
            description: String::new(),
            tags: BTreeSet::from([TAG_CANDIDATE.to_string()]),
            trust_state: TrustState::Candidate,
            confidence: Confidence::default(),
            origin: Origin::Authored,
            provenance: Provenance::default(),
            usage_count: 0,
            content_hash: String::new(),
            created_at: now,
            updated_at: now,
            version: 0,
        };
        unit.refresh_content_hash();
        unit
    }

    /// Compute the blake3 hash over the embeddable fields.
    ///
    /// Fields are separated by a NUL byte so that moving text between fields
    /// changes the hash.
    pub fn compute_content_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for part in [
            self.name.as_str(),
            self.problem.as_str(),
            self.solution.as_str(),
            self.description.as_str(),
            self.provenance.origin_query.as_deref().unwrap_or(""),
        ] {
            hasher.update(part.as_bytes());
            hasher.update(&[0]);
        }
        for tag in &self.tags {
            hasher.update(tag.as_bytes());
            hasher.update(&[0]);
        }
        hasher.finalize().to_hex().to_string()
    }

    pub fn refresh_content_hash(&mut self) {
        self.content_hash = self.compute_content_hash();
    }

    pub fn is_certified(&self) -> bool {
        self.trust_state == TrustState::Certified
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Tags that mark a unit as unreviewed.
    pub fn review_tags(&self) -> impl Iterator<Item = &str> {
        [TAG_CANDIDATE, TAG_GENERATED]
            .into_iter()
            .filter(|t| self.tags.contains(*t))
    }

    /// Certified ⇒ confidence ≥ threshold and a reviewer is recorded.
    pub fn check_invariants(&self, certification_threshold: f64) -> TacitResult<()> {
        if self.name.trim().is_empty() || self.solution.trim().is_empty() {
            return Err(TacitError::validation(format!(
                "unit {} requires a name and a solution",
                self.id
            )));
        }
        if self.is_certified() {
            if !self.confidence.meets(certification_threshold) {
                return Err(TacitError::validation(format!(
                    "certified unit {} has confidence {} below threshold {certification_threshold}",
                    self.id, self.confidence
                )));
            }
            if self.provenance.reviewer.as_deref().map_or(true, str::is_empty) {
                return Err(TacitError::validation(format!(
                    "certified unit {} has no reviewer",
                    self.id
                )));
            }
        }
        Ok(())
    }
}

/// Identity equality: two units are equal if they have the same ID.
impl PartialEq for KnowledgeUnit {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
