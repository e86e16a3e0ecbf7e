//! Ordered provider fallback chain.
//!
//! Providers are tried in order. Each fallback past the primary is recorded
//! as a [`DegradationEvent`] and logged.

use std::sync::Mutex;

use tacit_core::constants::COMPONENT_ENCODER;
use tacit_core::errors::{EmbeddingError, TacitResult};
use tacit_core::models::DegradationEvent;
use tacit_core::traits::IEmbeddingProvider;
use tracing::warn;

pub struct DegradationChain {
    chain: Vec<Box<dyn IEmbeddingProvider>>,
    events: Mutex<Vec<DegradationEvent>>,
}

impl Default for DegradationChain {
    fn default() -> Self {
        Self::new()
    }
}

impl DegradationChain {
    pub fn new() -> Self {
        Self {
            chain: Vec::new(),
            events: Mutex::new(Vec::new()),
        }
    }

    /// Add a provider to the end of the chain.
    pub fn push(&mut self, provider: Box<dyn IEmbeddingProvider>) {
        self.chain.push(provider);
    }

    fn record_fallback(&self, used: &str, failure: String) {
        if let Ok(mut events) = self.events.lock() {
            events.push(DegradationEvent::now(COMPONENT_ENCODER, failure, used));
        }
    }

    fn run<T>(
        &self,
        op: &str,
        call: impl Fn(&dyn IEmbeddingProvider) -> TacitResult<T>,
    ) -> TacitResult<(T, &str)> {
        let mut last_error = None;
        let mut skipped = Vec::new();

        for provider in &self.chain {
            if !provider.is_available() {
                skipped.push(provider.name());
                continue;
            }
            match call(provider.as_ref()) {
                Ok(value) => {
                    if !skipped.is_empty() {
                        self.record_fallback(
                            provider.name(),
                            format!("{} unavailable", skipped.join(", ")),
                        );
                    }
                    return Ok((value, provider.name()));
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        op,
                        error = %e,
                        "embedding provider failed, trying next in chain"
                    );
                    skipped.push(provider.name());
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            EmbeddingError::ProviderUnavailable {
                provider: format!("all {} providers exhausted", self.chain.len()),
            }
            .into()
        }))
    }

    /// Embed with the first provider that succeeds. Returns the provider name.
    pub fn embed(&self, text: &str) -> TacitResult<(Vec<f32>, &str)> {
        self.run("embed", |p| p.embed(text))
    }

    pub fn embed_batch(&self, texts: &[String]) -> TacitResult<(Vec<Vec<f32>>, &str)> {
        self.run("embed_batch", |p| p.embed_batch(texts))
    }

    /// Whether any provider currently reports itself available.
    pub fn any_available(&self) -> bool {
        self.chain.iter().any(|p| p.is_available())
    }

    /// Name of the first available provider.
    pub fn active_provider_name(&self) -> &str {
        self.chain
            .iter()
            .find(|p| p.is_available())
            .map(|p| p.name())
            .unwrap_or("none")
    }

    pub fn drain_events(&self) -> Vec<DegradationEvent> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}
