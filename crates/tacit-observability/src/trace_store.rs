//! Retention of completed query traces for audit.

use std::collections::{HashMap, VecDeque};

use tacit_core::models::QueryTrace;

/// Keeps the most recent `retention` traces, addressable by query id.
#[derive(Debug, Clone)]
pub struct TraceStore {
    order: VecDeque<String>,
    traces: HashMap<String, QueryTrace>,
    retention: usize,
}

impl TraceStore {
    pub fn new(retention: usize) -> Self {
        Self {
            order: VecDeque::new(),
            traces: HashMap::new(),
            retention: retention.max(1),
        }
    }

    pub fn insert(&mut self, trace: QueryTrace) {
        let id = trace.query_id().to_string();
        if self.traces.insert(id.clone(), trace).is_some() {
            self.order.retain(|existing| existing != &id);
        }
        self.order.push_back(id);
        while self.order.len() > self.retention {
            if let Some(evicted) = self.order.pop_front() {
                self.traces.remove(&evicted);
            }
        }
    }

    pub fn get(&self, query_id: &str) -> Option<&QueryTrace> {
        self.traces.get(query_id)
    }

    /// Most recent traces first.
    pub fn recent(&self, n: usize) -> Vec<&QueryTrace> {
        self.order
            .iter()
            .rev()
            .take(n)
            .filter_map(|id| self.traces.get(id))
            .collect()
    }

    /// Traces for `domain` that recorded at least one error.
    pub fn with_errors(&self, domain: &str) -> Vec<&QueryTrace> {
        self.order
            .iter()
            .filter_map(|id| self.traces.get(id))
            .filter(|t| t.domain() == domain && !t.errors().is_empty())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for TraceStore {
    fn default() -> Self {
        Self::new(10_000)
    }
}
