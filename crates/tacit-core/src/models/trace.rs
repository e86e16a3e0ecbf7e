//! Append-only per-request trace.
//!
//! A [`TraceBuilder`] collects events while the request runs. `finish` turns it
//! into an immutable [`QueryTrace`] that is retained for audit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::query::UnitScore;
use crate::errors::{ErrorKind, TacitError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceStage {
    Validation,
    Search,
    Routing,
    Specialist,
    Enrichment,
    Lifecycle,
    Formatting,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceDetail {
    Search {
        matched: Vec<UnitScore>,
        degraded: bool,
        truncated_units: Vec<String>,
        stale_units: Vec<String>,
    },
    SearchSkipped {
        reason: String,
    },
    SpecialistScore {
        specialist: String,
        score: f64,
    },
    Routed {
        selections: Vec<(String, f64)>,
        fallback_used: bool,
    },
    Merged {
        matched: Vec<UnitScore>,
        confidence: f64,
    },
    Enrichment {
        stage: String,
        mode: String,
        decision: String,
    },
    UsageRecorded {
        unit_ids: Vec<String>,
    },
    Rendered {
        format: String,
        bytes: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub stage: TraceStage,
    pub at: DateTime<Utc>,
    pub detail: TraceDetail,
}

/// An error attached to a trace with enough detail to reproduce it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceError {
    pub stage: TraceStage,
    pub kind: ErrorKind,
    pub message: String,
    pub recoverable: bool,
    pub at: DateTime<Utc>,
}

impl TraceError {
    pub fn from_error(stage: TraceStage, error: &TacitError) -> Self {
        Self {
            stage,
            kind: error.kind(),
            message: error.to_string(),
            recoverable: error.is_recoverable(),
            at: Utc::now(),
        }
    }
}

/// Completed, immutable record of one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryTrace {
    query_id: String,
    domain: String,
    query: String,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    events: Vec<TraceEvent>,
    errors: Vec<TraceError>,
    final_confidence: Option<f64>,
}

impl QueryTrace {
    pub fn query_id(&self) -> &str {
        &self.query_id
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn errors(&self) -> &[TraceError] {
        &self.errors
    }

    pub fn final_confidence(&self) -> Option<f64> {
        self.final_confidence
    }

    pub fn events_in(&self, stage: TraceStage) -> impl Iterator<Item = &TraceEvent> {
        self.events.iter().filter(move |e| e.stage == stage)
    }

    pub fn has_error(&self, kind: ErrorKind) -> bool {
        self.errors.iter().any(|e| e.kind == kind)
    }
}

/// Mutable, append-only collector used while a request is in flight.
#[derive(Debug, Clone)]
pub struct TraceBuilder {
    query_id: String,
    domain: String,
    query: String,
    started_at: DateTime<Utc>,
    events: Vec<TraceEvent>,
    errors: Vec<TraceError>,
}

impl TraceBuilder {
    pub fn start(
        query_id: impl Into<String>,
        domain: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            query_id: query_id.into(),
            domain: domain.into(),
            query: query.into(),
            started_at: Utc::now(),
            events: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn query_id(&self) -> &str {
        &self.query_id
    }

    pub fn record(&mut self, stage: TraceStage, detail: TraceDetail) {
        self.events.push(TraceEvent {
            stage,
            at: Utc::now(),
            detail,
        });
    }

    pub fn record_error(&mut self, stage: TraceStage, error: &TacitError) {
        self.errors.push(TraceError::from_error(stage, error));
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn finish(self, final_confidence: Option<f64>) -> QueryTrace {
        QueryTrace {
            query_id: self.query_id,
            domain: self.domain,
            query: self.query,
            started_at: self.started_at,
            completed_at: Utc::now(),
            events: self.events,
            errors: self.errors,
            final_confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_preserves_order_and_errors() {
        let mut b = TraceBuilder::start("q1", "diy", "how?");
        b.record(
            TraceStage::Search,
            TraceDetail::SearchSkipped {
                reason: "flag".into(),
            },
        );
        b.record_error(
            TraceStage::Enrichment,
            &TacitError::validation("bad stage"),
        );
        let trace = b.finish(Some(0.4));
        assert_eq!(trace.events().len(), 1);
        assert!(trace.has_error(ErrorKind::Validation));
        assert_eq!(trace.final_confidence(), Some(0.4));
        assert!(trace.completed_at() >= trace.started_at());
    }
}
