//! [`ObservabilityEngine`] owns the query log, degradation tracker, and trace store.

use tacit_core::config::ObservabilityConfig;
use tacit_core::errors::{TacitError, TacitResult};
use tacit_core::models::{DegradationEvent, QueryTrace};

use crate::degradation::{evaluate_alerts, DegradationAlert, DegradationTracker};
use crate::query_log::{QueryLog, QueryLogEntry};
use crate::trace_store::TraceStore;

#[derive(Debug)]
pub struct ObservabilityEngine {
    pub query_log: QueryLog,
    pub degradation: DegradationTracker,
    pub traces: TraceStore,
}

impl ObservabilityEngine {
    pub fn new(config: &ObservabilityConfig) -> Self {
        Self {
            query_log: QueryLog::with_capacity(config.query_log_capacity),
            degradation: DegradationTracker::new(),
            traces: TraceStore::new(config.trace_retention),
        }
    }

    /// Log a finished query and retain its trace.
    pub fn record_query(&mut self, entry: QueryLogEntry, trace: QueryTrace) {
        crate::tracing_setup::events::query_completed(
            &entry.query_id,
            &entry.domain,
            entry.latency.as_millis() as u64,
            entry.matched,
            entry.generation_used,
        );
        self.query_log.record(entry);
        self.traces.insert(trace);
    }

    pub fn record_degradation(&mut self, event: DegradationEvent) {
        self.degradation.record(event);
    }

    pub fn mark_recovered(&mut self, component: &str) -> usize {
        self.degradation.mark_recovered(component)
    }

    pub fn degradation_alerts(&self) -> Vec<DegradationAlert> {
        evaluate_alerts(&self.degradation)
    }

    pub fn trace(&self, query_id: &str) -> Option<&QueryTrace> {
        self.traces.get(query_id)
    }

    /// Serialize current counters to JSON.
    pub fn snapshot(&self) -> TacitResult<serde_json::Value> {
        let active = serde_json::to_value(self.degradation.active_degradations())
            .map_err(TacitError::Serialization)?;
        Ok(serde_json::json!({
            "query_log_count": self.query_log.count(),
            "query_avg_latency_ms": self.query_log.avg_latency().as_millis() as u64,
            "query_p95_latency_ms": self.query_log.latency_percentile(0.95).as_millis() as u64,
            "generation_rate": self.query_log.generation_rate(),
            "active_degradations": active,
            "retained_traces": self.traces.len(),
        }))
    }
}

impl Default for ObservabilityEngine {
    fn default() -> Self {
        Self::new(&ObservabilityConfig::default())
    }
}
