//! # tacit-observability
//!
//! Structured tracing with span definitions, a bounded per-query performance
//! log, degradation event tracking with alerting, and retention of completed
//! query traces for audit.

pub mod degradation;
pub mod engine;
pub mod query_log;
pub mod trace_store;
pub mod tracing_setup;

pub use degradation::{DegradationTracker, RecoveryStatus};
pub use engine::ObservabilityEngine;
pub use query_log::{QueryLog, QueryLogEntry};
pub use trace_store::TraceStore;
