use serde::{Deserialize, Serialize};

use super::defaults;

/// Logging, query log, and trace retention.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub json_logs: bool,
    pub query_log_capacity: usize,
    pub trace_retention: usize,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::DEFAULT_LOG_LEVEL.to_string(),
            json_logs: false,
            query_log_capacity: defaults::DEFAULT_QUERY_LOG_CAPACITY,
            trace_retention: defaults::DEFAULT_TRACE_RETENTION,
        }
    }
}
