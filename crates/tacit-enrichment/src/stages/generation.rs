//! Generation-backed stages.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tacit_core::errors::{ProviderError, TacitResult};
use tacit_core::models::{
    GeneratedAnswer, GenerationRequest, GenerationResponse, QueryResult, ScoredUnit,
};
use tacit_core::traits::IGenerationProvider;
use tacit_core::Confidence;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Provider call settings shared by fallback and replace stages.
#[derive(Clone)]
pub struct GenerationStage {
    pub provider: Arc<dyn IGenerationProvider>,
    /// Fallback activates below this confidence.
    pub min_confidence: f64,
    /// Confidence of any generated answer never exceeds this.
    pub ceiling: f64,
    pub timeout: Duration,
    pub model: Option<String>,
    pub max_context_units: usize,
}

/// A successful provider call, not yet persisted.
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    pub answer: GeneratedAnswer,
    pub response: GenerationResponse,
    /// Claimed (or default) confidence after the ceiling.
    pub applied_confidence: f64,
}

impl GenerationStage {
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Why the fallback should stay idle, if it should.
    ///
    /// A certified unit at or above `min_confidence` always wins over
    /// generation, whatever the merged confidence says and whether or not
    /// routing selected it.
    pub fn skip_reason(&self, result: &QueryResult) -> Option<String> {
        let certified = result
            .best_certified()
            .into_iter()
            .chain(result.certified_hit.as_ref())
            .filter(|c| c.score >= self.min_confidence)
            .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal));
        if let Some(certified) = certified {
            return Some(format!(
                "certified unit {} scored {:.3}",
                certified.unit.id, certified.score
            ));
        }
        if result.matched.is_empty() || result.confidence < self.min_confidence {
            return None;
        }
        Some(format!(
            "confidence {:.3} meets {:.3}",
            result.confidence, self.min_confidence
        ))
    }

    /// A certified search hit strong enough to stand in for generation that
    /// routing left out of the matches.
    pub fn unrouted_certified(&self, result: &QueryResult) -> Option<ScoredUnit> {
        result
            .certified_hit
            .as_ref()
            .filter(|hit| hit.score >= self.min_confidence)
            .filter(|hit| !result.matched.iter().any(|m| m.unit.id == hit.unit.id))
            .cloned()
    }

    fn request(&self, result: &QueryResult) -> GenerationRequest {
        GenerationRequest {
            prompt: result.query.clone(),
            context: result
                .matched
                .iter()
                .take(self.max_context_units)
                .map(|m| format!("{}: {}", m.unit.name, m.unit.solution))
                .collect(),
            model: self.model.clone(),
            max_tokens: None,
        }
    }

    /// Call the provider under the stage deadline and the request's token.
    ///
    /// Empty output is a provider failure; nothing is fabricated in its place.
    pub async fn generate(
        &self,
        result: &QueryResult,
        default_confidence: f64,
        cancel: &CancellationToken,
    ) -> TacitResult<GenerationOutput> {
        let name = self.provider.name().to_string();
        let request = self.request(result);
        debug!(provider = %name, context = request.context.len(), "calling generation provider");
        let response = tokio::select! {
            _ = cancel.cancelled() => {
                return Err(ProviderError::Cancelled { provider: name }.into());
            }
            called = tokio::time::timeout(self.timeout, self.provider.generate(request)) => {
                called.map_err(|_| ProviderError::Timeout {
                    provider: name.clone(),
                    timeout_ms: self.timeout.as_millis() as u64,
                })??
            }
        };
        if response.text.trim().is_empty() {
            return Err(ProviderError::Failure {
                provider: name,
                reason: "empty completion".to_string(),
            }
            .into());
        }
        let applied_confidence = Confidence::new(
            response.claimed_confidence.unwrap_or(default_confidence),
        )
        .capped(self.ceiling)
        .value();
        info!(
            provider = %name,
            model = %response.model_id,
            claimed = ?response.claimed_confidence,
            applied = applied_confidence,
            "generation succeeded"
        );
        Ok(GenerationOutput {
            answer: GeneratedAnswer {
                domain: result.domain.clone(),
                query: result.query.clone(),
                text: response.text.trim().to_string(),
                model_id: response.model_id.clone(),
                claimed_confidence: response.claimed_confidence,
                generated_at: Utc::now(),
            },
            response,
            applied_confidence,
        })
    }
}
