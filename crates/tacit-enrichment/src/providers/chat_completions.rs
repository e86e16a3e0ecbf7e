//! OpenAI-compatible `/chat/completions` client.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tacit_core::config::ProviderEndpoint;
use tacit_core::errors::{ProviderError, TacitResult};
use tacit_core::models::{GenerationRequest, GenerationResponse, TokenUsage};
use tacit_core::traits::IGenerationProvider;
use tracing::debug;

const SYSTEM_PROMPT: &str = "Answer the question concisely and practically. \
Use the supplied reference notes when they are relevant.";

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Generation over any endpoint that speaks the chat completions API.
///
/// Deadlines are applied by the calling stage, not here.
pub struct ChatCompletionsProvider {
    name: String,
    url: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl ChatCompletionsProvider {
    pub fn new(endpoint: &ProviderEndpoint, default_model: &str) -> TacitResult<Self> {
        let client = reqwest::Client::builder()
            .gzip(true)
            .build()
            .map_err(|e| super::client_error(&endpoint.name, e))?;
        Ok(Self {
            name: endpoint.name.clone(),
            url: format!("{}/chat/completions", endpoint.endpoint.trim_end_matches('/')),
            model: endpoint
                .model
                .clone()
                .unwrap_or_else(|| default_model.to_string()),
            api_key: super::bearer(endpoint.api_key_env.as_deref()),
            client,
        })
    }

    fn failure(&self, reason: impl Into<String>) -> tacit_core::TacitError {
        ProviderError::Failure {
            provider: self.name.clone(),
            reason: reason.into(),
        }
        .into()
    }

    fn body(&self, request: &GenerationRequest) -> serde_json::Value {
        let mut user = request.prompt.clone();
        if !request.context.is_empty() {
            user.push_str("\n\nReference notes:\n");
            for note in &request.context {
                user.push_str("- ");
                user.push_str(note);
                user.push('\n');
            }
        }
        let mut body = json!({
            "model": request.model.as_deref().unwrap_or(&self.model),
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": user },
            ],
        });
        if let Some(max) = request.max_tokens {
            body["max_tokens"] = json!(max);
        }
        body
    }
}

#[async_trait]
impl IGenerationProvider for ChatCompletionsProvider {
    async fn generate(&self, request: GenerationRequest) -> TacitResult<GenerationResponse> {
        let mut call = self.client.post(&self.url).json(&self.body(&request));
        if let Some(key) = &self.api_key {
            call = call.bearer_auth(key);
        }
        let response = call.send().await.map_err(|e| self.failure(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(self.failure(format!("HTTP {status}: {text}")));
        }
        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| self.failure(format!("unparseable response: {e}")))?;
        let text = parsed
            .choices
            .into_iter()
            .find_map(|c| c.message.content)
            .unwrap_or_default();
        let usage = parsed.usage.map_or(TokenUsage::default(), |u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
        });
        debug!(provider = %self.name, chars = text.len(), "completion received");
        Ok(GenerationResponse {
            text,
            model_id: parsed.model.unwrap_or_else(|| self.model.clone()),
            usage,
            claimed_confidence: None,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
