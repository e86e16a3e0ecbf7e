//! Query performance logging: latency, match count, generation and degradation flags.

use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryLogEntry {
    pub query_id: String,
    pub domain: String,
    pub latency: Duration,
    pub matched: usize,
    pub confidence: f64,
    pub generation_used: bool,
    pub degraded: bool,
    pub timestamp_epoch_ms: i64,
}

impl QueryLogEntry {
    /// Create a new entry with the timestamp set to now.
    pub fn new(
        query_id: impl Into<String>,
        domain: impl Into<String>,
        latency: Duration,
        matched: usize,
        confidence: f64,
    ) -> Self {
        Self {
            query_id: query_id.into(),
            domain: domain.into(),
            latency,
            matched,
            confidence,
            generation_used: false,
            degraded: false,
            timestamp_epoch_ms: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn generated(mut self, used: bool) -> Self {
        self.generation_used = used;
        self
    }

    pub fn degraded(mut self, degraded: bool) -> Self {
        self.degraded = degraded;
        self
    }
}

/// Bounded, append-only ring of query entries.
#[derive(Debug, Clone)]
pub struct QueryLog {
    entries: VecDeque<QueryLogEntry>,
    max_entries: usize,
}

impl Default for QueryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryLog {
    pub fn new() -> Self {
        Self::with_capacity(50_000)
    }

    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries: max_entries.max(1),
        }
    }

    pub fn record(&mut self, entry: QueryLogEntry) {
        tracing::debug!(
            event = "query_logged",
            query_id = %entry.query_id,
            domain = %entry.domain,
            latency_ms = entry.latency.as_millis() as u64,
            matched = entry.matched,
            generation_used = entry.generation_used,
            degraded = entry.degraded,
            "query logged"
        );
        if self.entries.len() == self.max_entries {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn entries(&self) -> impl Iterator<Item = &QueryLogEntry> {
        self.entries.iter()
    }

    pub fn avg_latency(&self) -> Duration {
        if self.entries.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.entries.iter().map(|e| e.latency).sum();
        total / self.entries.len() as u32
    }

    /// Latency at the given percentile (0.0 to 1.0).
    pub fn latency_percentile(&self, p: f64) -> Duration {
        if self.entries.is_empty() {
            return Duration::ZERO;
        }
        let mut latencies: Vec<Duration> = self.entries.iter().map(|e| e.latency).collect();
        latencies.sort();
        let idx = ((p.clamp(0.0, 1.0) * (latencies.len() - 1) as f64).round() as usize)
            .min(latencies.len() - 1);
        latencies[idx]
    }

    /// Share of logged queries that fell back to generation.
    pub fn generation_rate(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let generated = self.entries.iter().filter(|e| e.generation_used).count();
        generated as f64 / self.entries.len() as f64
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(ms: u64) -> QueryLogEntry {
        QueryLogEntry::new(format!("q{ms}"), "diy", Duration::from_millis(ms), 1, 0.5)
    }

    #[test]
    fn latency_stats() {
        let mut log = QueryLog::new();
        for ms in [10, 20, 30, 40, 100] {
            log.record(entry(ms));
        }
        assert_eq!(log.avg_latency(), Duration::from_millis(40));
        assert_eq!(log.latency_percentile(0.5), Duration::from_millis(30));
        assert_eq!(log.latency_percentile(1.0), Duration::from_millis(100));
    }

    #[test]
    fn ring_drops_oldest() {
        let mut log = QueryLog::with_capacity(2);
        log.record(entry(1));
        log.record(entry(2).generated(true));
        log.record(entry(3));
        let ids: Vec<&str> = log.entries().map(|e| e.query_id.as_str()).collect();
        assert_eq!(ids, vec!["q2", "q3"]);
        assert_eq!(log.generation_rate(), 0.5);
    }

    #[test]
    fn empty_log_is_zero() {
        let log = QueryLog::new();
        assert_eq!(log.avg_latency(), Duration::ZERO);
        assert_eq!(log.latency_percentile(0.99), Duration::ZERO);
    }
}
