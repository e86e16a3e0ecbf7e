use serde::{Deserialize, Serialize};

use super::defaults;

/// Embedding encoder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Primary provider: "tfidf" (local hashed encoder) or "http".
    pub provider: String,
    pub dimensions: usize,
    /// Token budget for the text of one unit.
    pub token_budget: usize,
    pub l1_cache_size: u64,
    /// Append the local encoder behind a remote primary.
    pub local_fallback: bool,
    /// Remote endpoint for the "http" provider (OpenAI-compatible `/embeddings`).
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub api_key_env: Option<String>,
    pub timeout_ms: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: defaults::DEFAULT_EMBEDDING_PROVIDER.to_string(),
            dimensions: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            token_budget: defaults::DEFAULT_TOKEN_BUDGET,
            l1_cache_size: defaults::DEFAULT_EMBEDDING_CACHE_SIZE,
            local_fallback: defaults::DEFAULT_LOCAL_FALLBACK,
            endpoint: None,
            model: None,
            api_key_env: None,
            timeout_ms: defaults::DEFAULT_EMBEDDING_TIMEOUT_MS,
        }
    }
}
