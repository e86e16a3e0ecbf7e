use serde::{Deserialize, Serialize};

use super::defaults;

/// A named remote collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderEndpoint {
    /// Name enricher descriptors refer to.
    pub name: String,
    /// Base URL, e.g. `https://openrouter.ai/api/v1`.
    pub endpoint: String,
    #[serde(default)]
    pub model: Option<String>,
    /// Environment variable holding the bearer token.
    #[serde(default)]
    pub api_key_env: Option<String>,
}

/// Defaults for generation stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub timeout_ms: u64,
    pub model: String,
    pub min_confidence: f64,
    pub confidence_ceiling: f64,
    pub max_context_units: usize,
    /// OpenAI-compatible chat completion providers.
    pub providers: Vec<ProviderEndpoint>,
    /// JSON document search providers.
    pub document_search: Vec<ProviderEndpoint>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            timeout_ms: defaults::DEFAULT_GENERATION_TIMEOUT_MS,
            model: defaults::DEFAULT_GENERATION_MODEL.to_string(),
            min_confidence: defaults::DEFAULT_MIN_CONFIDENCE,
            confidence_ceiling: defaults::DEFAULT_CONFIDENCE_CEILING,
            max_context_units: defaults::DEFAULT_MAX_CONTEXT_UNITS,
            providers: Vec::new(),
            document_search: Vec::new(),
        }
    }
}
