//! The enricher chain: stages run strictly in declared order.

use std::sync::Arc;

use tacit_core::config::{EnricherDescriptor, GenerationConfig};
use tacit_core::constants::COMPONENT_GENERATION;
use tacit_core::errors::{TacitError, TacitResult};
use tacit_core::models::{
    DegradationEvent, GenerationRecord, QueryResult, TraceBuilder, TraceDetail, TraceStage,
};
use tacit_lifecycle::{CandidateRecord, LifecycleManager};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::contract;
use crate::registry::ProviderRegistry;
use crate::stages::{enhance, EnrichMode, Enricher, GenerationOutput, GenerationStage};

/// Per-request collaborators handed to every stage.
#[derive(Clone)]
pub struct StageContext {
    pub lifecycle: Arc<LifecycleManager>,
    /// Cancelled when the request is abandoned.
    pub cancel: CancellationToken,
}

#[derive(Debug, Clone)]
pub struct ChainOutcome {
    pub result: QueryResult,
    /// Provider failures the chain degraded around.
    pub degradations: Vec<DegradationEvent>,
}

enum StageResult {
    Applied(QueryResult, String),
    Skipped(QueryResult, String),
}

#[derive(Debug, Clone, Default)]
pub struct EnricherChain {
    stages: Vec<Enricher>,
}

impl EnricherChain {
    pub fn new(stages: Vec<Enricher>) -> Self {
        Self { stages }
    }

    /// Resolve every descriptor. The first unknown kind or provider fails
    /// the whole chain.
    pub fn from_descriptors(
        descriptors: &[EnricherDescriptor],
        registry: &ProviderRegistry,
        defaults: &GenerationConfig,
    ) -> TacitResult<Self> {
        let stages = descriptors
            .iter()
            .map(|d| Enricher::resolve(d, registry, defaults))
            .collect::<TacitResult<Vec<_>>>()?;
        Ok(Self { stages })
    }

    pub fn stages(&self) -> &[Enricher] {
        &self.stages
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run all stages over `result`.
    ///
    /// Recoverable stage errors are recorded and the stage's output dropped;
    /// anything else aborts the chain.
    pub async fn run(
        &self,
        mut result: QueryResult,
        ctx: &StageContext,
        trace: &mut TraceBuilder,
    ) -> TacitResult<ChainOutcome> {
        let mut degradations = Vec::new();
        for stage in &self.stages {
            let kind = stage.kind().as_str();
            let mode = stage.mode();
            let before = result.clone();
            let decision = match apply(stage, result, ctx).await {
                Ok(StageResult::Applied(next, note)) => {
                    let checked = match mode {
                        EnrichMode::Enhance => contract::check_enhance(kind, &before, &next),
                        EnrichMode::Fallback | EnrichMode::Replace => Ok(()),
                    };
                    match checked {
                        Ok(()) => {
                            result = next;
                            note
                        }
                        Err(violation) => {
                            warn!(stage = kind, error = %violation, "stage output discarded");
                            trace.record_error(TraceStage::Enrichment, &violation);
                            result = before;
                            "discarded".to_string()
                        }
                    }
                }
                Ok(StageResult::Skipped(unchanged, reason)) => {
                    result = unchanged;
                    format!("skipped: {reason}")
                }
                Err(e) if e.is_recoverable() => {
                    warn!(stage = kind, error = %e, "stage failed, continuing");
                    trace.record_error(TraceStage::Enrichment, &e);
                    if matches!(e, TacitError::Provider(_)) && mode != EnrichMode::Enhance {
                        degradations.push(DegradationEvent::now(
                            COMPONENT_GENERATION,
                            e.to_string(),
                            "local matches",
                        ));
                    }
                    result = before;
                    format!("failed: {e}")
                }
                Err(e) => {
                    trace.record_error(TraceStage::Enrichment, &e);
                    return Err(e);
                }
            };
            debug!(stage = kind, mode = mode.as_str(), decision = %decision, "stage finished");
            trace.record(
                TraceStage::Enrichment,
                TraceDetail::Enrichment {
                    stage: kind.to_string(),
                    mode: mode.as_str().to_string(),
                    decision,
                },
            );
        }
        Ok(ChainOutcome {
            result,
            degradations,
        })
    }
}

async fn apply(stage: &Enricher, result: QueryResult, ctx: &StageContext) -> TacitResult<StageResult> {
    let applied = |r| Ok(StageResult::Applied(r, "applied".to_string()));
    match stage {
        Enricher::Citations => applied(enhance::citations(result)),
        Enricher::QualityScore => applied(enhance::quality_score(result)),
        Enricher::UsageStats => applied(enhance::usage_stats(result)),
        Enricher::DocumentSearch(documents) => applied(documents.apply(result, &ctx.cancel).await?),
        Enricher::GenerationFallback(generation) => {
            if let Some(reason) = generation.skip_reason(&result) {
                if let Some(hit) = generation.unrouted_certified(&result) {
                    let note = format!("answered from unrouted certified unit {}", hit.unit.id);
                    let mut next = result;
                    next.adopt(hit);
                    return Ok(StageResult::Applied(next, note));
                }
                return Ok(StageResult::Skipped(result, reason));
            }
            let output = generate(generation, &result, ctx).await?;
            let record = record_candidate(ctx, &output, generation.ceiling).await?;
            let note = candidate_note(&record);
            let mut next = result;
            next.answer = output.answer.text.clone();
            next.confidence = output.applied_confidence;
            next.generation = Some(generation_record(generation, &output, &record));
            Ok(StageResult::Applied(next, note))
        }
        Enricher::GenerationReplace(generation) => {
            let output = generate(generation, &result, ctx).await?;
            let record = record_candidate(ctx, &output, generation.ceiling).await?;
            let note = candidate_note(&record);
            let mut next = QueryResult::from_matches(
                result.query,
                result.domain,
                Vec::new(),
                Vec::new(),
                output.applied_confidence,
            );
            next.answer = output.answer.text.clone();
            next.generation = Some(generation_record(generation, &output, &record));
            Ok(StageResult::Applied(next, note))
        }
    }
}

async fn generate(
    stage: &GenerationStage,
    result: &QueryResult,
    ctx: &StageContext,
) -> TacitResult<GenerationOutput> {
    let default_confidence = ctx.lifecycle.config().candidate_confidence;
    stage.generate(result, default_confidence, &ctx.cancel).await
}

/// Persist the answer as a candidate on a blocking thread. No lock is held
/// while the provider call above was in flight.
async fn record_candidate(
    ctx: &StageContext,
    output: &GenerationOutput,
    ceiling: f64,
) -> TacitResult<CandidateRecord> {
    let lifecycle = ctx.lifecycle.clone();
    let answer = output.answer.clone();
    tokio::task::spawn_blocking(move || lifecycle.record_generated(&answer, ceiling))
        .await
        .map_err(|e| TacitError::TaskFailed {
            reason: e.to_string(),
        })?
}

fn candidate_note(record: &CandidateRecord) -> String {
    if record.deduplicated {
        format!("generated, matched existing candidate {}", record.unit_id)
    } else {
        format!("generated, recorded candidate {}", record.unit_id)
    }
}

fn generation_record(
    stage: &GenerationStage,
    output: &GenerationOutput,
    record: &CandidateRecord,
) -> GenerationRecord {
    GenerationRecord {
        provider: stage.provider_name().to_string(),
        model_id: output.response.model_id.clone(),
        claimed_confidence: output.response.claimed_confidence,
        applied_confidence: output.applied_confidence,
        usage: output.response.usage,
        candidate_id: Some(record.unit_id.clone()),
        deduplicated: record.deduplicated,
    }
}
