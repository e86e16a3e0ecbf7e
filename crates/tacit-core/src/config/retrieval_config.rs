use serde::{Deserialize, Serialize};

use super::defaults;

/// Defaults for knowledge base search when a domain does not override them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub default_limit: usize,
    pub default_min_score: f64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_limit: defaults::DEFAULT_SEARCH_LIMIT,
            default_min_score: defaults::DEFAULT_MIN_SCORE,
        }
    }
}
