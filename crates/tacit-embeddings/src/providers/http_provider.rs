//! Remote embedding provider speaking the OpenAI-compatible `/embeddings` API.
//!
//! Uses the blocking `reqwest` client; callers on an async runtime must run
//! the encoder on a blocking thread.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tacit_core::config::EmbeddingConfig;
use tacit_core::errors::{ConfigError, EmbeddingError, TacitResult};
use tacit_core::traits::IEmbeddingProvider;
use tracing::{debug, warn};

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}

pub struct HttpEmbeddingProvider {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    dimensions: usize,
    /// Set after a transport failure; the chain skips this provider until
    /// the cooldown elapses.
    down_since: Mutex<Option<Instant>>,
}

const RETRY_COOLDOWN: Duration = Duration::from_secs(30);

impl HttpEmbeddingProvider {
    pub fn from_config(config: &EmbeddingConfig) -> TacitResult<Self> {
        let endpoint = config.endpoint.clone().ok_or_else(|| ConfigError::Parse {
            reason: "embedding provider \"http\" requires an endpoint".to_string(),
        })?;
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| EmbeddingError::ProviderUnavailable {
                provider: format!("http ({e})"),
            })?;
        let api_key = config
            .api_key_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok());
        Ok(Self {
            client,
            endpoint,
            model: config
                .model
                .clone()
                .unwrap_or_else(|| "text-embedding-3-small".to_string()),
            api_key,
            dimensions: config.dimensions,
            down_since: Mutex::new(None),
        })
    }

    fn mark_down(&self) {
        if let Ok(mut guard) = self.down_since.lock() {
            *guard = Some(Instant::now());
        }
    }

    fn request(&self, texts: &[String]) -> TacitResult<Vec<Vec<f32>>> {
        let url = format!("{}/embeddings", self.endpoint.trim_end_matches('/'));
        let mut req = self.client.post(&url).json(&EmbeddingRequest {
            model: &self.model,
            input: texts,
        });
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req.send().map_err(|e| {
            self.mark_down();
            warn!(endpoint = %url, error = %e, "embedding endpoint unreachable");
            EmbeddingError::ProviderUnavailable {
                provider: format!("http ({e})"),
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(EmbeddingError::InferenceFailed {
                reason: format!("embedding endpoint returned {status}"),
            }
            .into());
        }

        let mut body: EmbeddingResponse = resp.json().map_err(|e| EmbeddingError::InferenceFailed {
            reason: format!("invalid embedding response: {e}"),
        })?;
        if body.data.len() != texts.len() {
            return Err(EmbeddingError::InferenceFailed {
                reason: format!("expected {} embeddings, got {}", texts.len(), body.data.len()),
            }
            .into());
        }
        body.data.sort_by_key(|d| d.index);
        debug!(count = body.data.len(), model = %self.model, "remote embeddings received");

        body.data
            .into_iter()
            .map(|d| {
                if d.embedding.len() != self.dimensions {
                    return Err(EmbeddingError::DimensionMismatch {
                        expected: self.dimensions,
                        actual: d.embedding.len(),
                    }
                    .into());
                }
                Ok(d.embedding)
            })
            .collect()
    }
}

impl IEmbeddingProvider for HttpEmbeddingProvider {
    fn embed(&self, text: &str) -> TacitResult<Vec<f32>> {
        let mut vecs = self.request(&[text.to_string()])?;
        vecs.pop().ok_or_else(|| {
            EmbeddingError::InferenceFailed {
                reason: "empty embedding response".to_string(),
            }
            .into()
        })
    }

    fn embed_batch(&self, texts: &[String]) -> TacitResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request(texts)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "http"
    }

    fn is_available(&self) -> bool {
        match self.down_since.lock() {
            Ok(guard) => guard.map_or(true, |at| at.elapsed() >= RETRY_COOLDOWN),
            Err(_) => false,
        }
    }
}
