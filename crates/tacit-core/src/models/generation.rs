use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request sent to an external generation provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    /// Supporting knowledge passed alongside the prompt.
    pub context: Vec<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// Provider response: text plus usage metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub text: String,
    pub model_id: String,
    pub usage: TokenUsage,
    /// Confidence the provider claims for its own answer, if any.
    pub claimed_confidence: Option<f64>,
}

/// A generated answer that has not been persisted yet.
///
/// This is the transient "generated" trust state: it exists only between the
/// provider call and the lifecycle manager turning it into a candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedAnswer {
    pub domain: String,
    pub query: String,
    pub text: String,
    pub model_id: String,
    pub claimed_confidence: Option<f64>,
    pub generated_at: DateTime<Utc>,
}

/// A reference returned by an external document/web search provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentReference {
    pub title: String,
    pub url: String,
    pub snippet: String,
}
