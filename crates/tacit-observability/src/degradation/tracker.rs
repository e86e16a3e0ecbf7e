//! History of fallbacks taken by the engine and whether each has cleared.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tacit_core::models::DegradationEvent;

use crate::tracing_setup::events;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryStatus {
    Active,
    Recovered,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedDegradation {
    pub event: DegradationEvent,
    pub recovery_status: RecoveryStatus,
    pub recovered_at: Option<DateTime<Utc>>,
}

impl TrackedDegradation {
    fn active_for(&self, component: &str) -> bool {
        self.recovery_status == RecoveryStatus::Active && self.event.component == component
    }
}

/// Oldest entries are dropped once `max_events` is reached.
#[derive(Debug, Clone)]
pub struct DegradationTracker {
    events: VecDeque<TrackedDegradation>,
    max_events: usize,
}

impl Default for DegradationTracker {
    fn default() -> Self {
        Self::with_capacity(10_000)
    }
}

impl DegradationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(max_events: usize) -> Self {
        Self {
            events: VecDeque::new(),
            max_events: max_events.max(1),
        }
    }

    pub fn record(&mut self, event: DegradationEvent) {
        events::degradation_triggered(&event.component, &event.failure, &event.fallback_used);
        if self.events.len() == self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(TrackedDegradation {
            event,
            recovery_status: RecoveryStatus::Active,
            recovered_at: None,
        });
    }

    /// Clear every open degradation of `component`. Returns how many cleared.
    pub fn mark_recovered(&mut self, component: &str) -> usize {
        let now = Utc::now();
        self.events
            .iter_mut()
            .filter(|t| t.active_for(component))
            .map(|t| {
                t.recovery_status = RecoveryStatus::Recovered;
                t.recovered_at = Some(now);
            })
            .count()
    }

    pub fn events(&self) -> impl Iterator<Item = &TrackedDegradation> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn active_degradations(&self) -> Vec<&TrackedDegradation> {
        self.events
            .iter()
            .filter(|t| t.recovery_status == RecoveryStatus::Active)
            .collect()
    }

    pub fn is_degraded(&self, component: &str) -> bool {
        self.events.iter().any(|t| t.active_for(component))
    }

    /// Events for `component` newer than `window_secs`, recovered or not.
    pub fn count_recent(&self, component: &str, window_secs: i64) -> usize {
        let since = Utc::now() - Duration::seconds(window_secs);
        self.events
            .iter()
            .filter(|t| t.event.component == component && t.event.timestamp > since)
            .count()
    }

    /// Time since the oldest still-open degradation of `component`.
    pub fn degraded_duration(&self, component: &str) -> Option<Duration> {
        self.events
            .iter()
            .filter(|t| t.active_for(component))
            .map(|t| t.event.timestamp)
            .min()
            .map(|since| Utc::now() - since)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovery_clears_active_state() {
        let mut tracker = DegradationTracker::new();
        tracker.record(DegradationEvent::now("encoder", "timeout", "lexical"));
        tracker.record(DegradationEvent::now("encoder", "timeout", "lexical"));
        tracker.record(DegradationEvent::now("generation", "empty", "local matches"));
        assert!(tracker.is_degraded("encoder"));
        assert_eq!(tracker.count_recent("encoder", 60), 2);

        assert_eq!(tracker.mark_recovered("encoder"), 2);
        assert!(!tracker.is_degraded("encoder"));
        assert_eq!(tracker.active_degradations().len(), 1);
        assert!(tracker.degraded_duration("generation").is_some());
    }

    #[test]
    fn history_is_bounded() {
        let mut tracker = DegradationTracker::with_capacity(3);
        for i in 0..5 {
            tracker.record(DegradationEvent::now("encoder", format!("f{i}"), "lexical"));
        }
        assert_eq!(tracker.len(), 3);
        assert_eq!(tracker.events().next().map(|t| t.event.failure.as_str()), Some("f2"));
    }
}
