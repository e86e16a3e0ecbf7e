//! The query orchestrator: one request, start to finish.
//!
//! Order per query: validate, search the knowledge base once, route and
//! dispatch specialists over that single search, run the enricher chain,
//! count usage, render, then log the trace. Blocking work (storage, the
//! encoder, lifecycle writes) runs on the blocking pool.

use std::sync::{Arc, Mutex, PoisonError};

use tacit_core::constants::{COMPONENT_ENCODER, COMPONENT_GENERATION, MAX_QUERY_CHARS};
use tacit_core::errors::{TacitError, TacitResult};
use tacit_core::models::{
    DegradationEvent, OutputFormat, QueryRequest, QueryResponse, QueryResult, SearchOutcome,
    TraceBuilder, TraceDetail, TraceStage,
};
use tacit_enrichment::StageContext;
use tacit_lifecycle::LifecycleManager;
use tacit_observability::{ObservabilityEngine, QueryLogEntry};
use tacit_retrieval::{KnowledgeBase, SearchRequest};
use tacit_routing::{Dispatch, Routing};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn, Instrument};

use crate::context::QueryContext;
use crate::domain::DomainRegistry;

/// What a successful run hands to `finish`.
struct RunOutput {
    result: QueryResult,
    searched: bool,
    search_degraded: bool,
    /// Degradations caused by this query's enrichment.
    degradations: Vec<DegradationEvent>,
    format: OutputFormat,
    rendered: String,
}

pub struct QueryOrchestrator {
    kb: Arc<KnowledgeBase>,
    lifecycle: Arc<LifecycleManager>,
    domains: Arc<DomainRegistry>,
    observability: Arc<Mutex<ObservabilityEngine>>,
}

impl QueryOrchestrator {
    pub fn new(
        kb: Arc<KnowledgeBase>,
        lifecycle: Arc<LifecycleManager>,
        domains: Arc<DomainRegistry>,
        observability: Arc<Mutex<ObservabilityEngine>>,
    ) -> Self {
        Self {
            kb,
            lifecycle,
            domains,
            observability,
        }
    }

    pub fn domains(&self) -> &Arc<DomainRegistry> {
        &self.domains
    }

    pub fn observability(&self) -> &Arc<Mutex<ObservabilityEngine>> {
        &self.observability
    }

    pub async fn submit(&self, request: QueryRequest) -> TacitResult<QueryResponse> {
        self.submit_with_cancel(request, CancellationToken::new()).await
    }

    /// Run a query. Cancelling `cancel` abandons any in-flight provider call;
    /// the query then completes with its local result.
    pub async fn submit_with_cancel(
        &self,
        request: QueryRequest,
        cancel: CancellationToken,
    ) -> TacitResult<QueryResponse> {
        validate_query(&request.text)?;
        let domain = self.domains.get(&request.domain)?;
        let ctx = QueryContext::new(request, domain, cancel);
        let mut trace = TraceBuilder::start(&ctx.query_id, ctx.domain_name(), ctx.query());
        let span = tacit_observability::query_span!(ctx.query_id, ctx.domain_name());

        match self.run(&ctx, &mut trace).instrument(span).await {
            Ok(output) => Ok(self.finish(&ctx, output, trace)),
            Err(e) => {
                if e.is_fatal_for_domain() {
                    self.domains.halt(ctx.domain_name(), e.to_string());
                }
                warn!(query_id = %ctx.query_id, domain = ctx.domain_name(), error = %e, "query failed");
                self.lock_observability().traces.insert(trace.finish(None));
                Err(e)
            }
        }
    }

    async fn run(&self, ctx: &QueryContext, trace: &mut TraceBuilder) -> TacitResult<RunOutput> {
        let search = self.search(ctx, trace).await?;
        {
            let drained = self.kb.drain_degradation_events();
            if !drained.is_empty() {
                let mut obs = self.lock_observability();
                for event in drained {
                    obs.record_degradation(event);
                }
            }
        }

        let (routing, dispatch, search) = self.route(ctx, search).await?;
        for (specialist, score) in &routing.assessments {
            trace.record(
                TraceStage::Specialist,
                TraceDetail::SpecialistScore {
                    specialist: specialist.clone(),
                    score: *score,
                },
            );
        }
        trace.record(
            TraceStage::Routing,
            TraceDetail::Routed {
                selections: routing.selections.clone(),
                fallback_used: routing.fallback_used,
            },
        );

        let result = QueryResult::from_matches(
            ctx.query(),
            ctx.domain_name(),
            dispatch.matched,
            dispatch.specialists,
            dispatch.confidence,
        )
        .with_certified_hit(&search.hits);
        trace.record(
            TraceStage::Routing,
            TraceDetail::Merged {
                matched: result.unit_scores(),
                confidence: result.confidence,
            },
        );

        let chain = ctx.domain.chain();
        let stage_ctx = StageContext {
            lifecycle: self.lifecycle.clone(),
            cancel: ctx.cancel.clone(),
        };
        let enriched = chain
            .run(result, &stage_ctx, trace)
            .instrument(tacit_observability::enrichment_span!(chain.stages().len()))
            .await?;
        let result = enriched.result;

        self.record_usage(&result, trace).await;

        let (format, rendered) = ctx.domain.formatter().render(&result, ctx.request.flags.format);
        trace.record(
            TraceStage::Formatting,
            TraceDetail::Rendered {
                format: format.as_str().to_string(),
                bytes: rendered.len(),
            },
        );

        Ok(RunOutput {
            result,
            searched: search.searched,
            search_degraded: search.degraded,
            degradations: enriched.degradations,
            format,
            rendered,
        })
    }

    /// Route and dispatch on the blocking pool, since specialists fan out
    /// over rayon. Every selected specialist finishes before this returns.
    async fn route(
        &self,
        ctx: &QueryContext,
        search: SearchOutcome,
    ) -> TacitResult<(Routing, Dispatch, SearchOutcome)> {
        let domain = ctx.domain.clone();
        let query = ctx.query().to_string();
        let span = tacit_observability::routing_span!(
            domain.router().policy().as_str(),
            domain.router().specialists().len()
        );
        tokio::task::spawn_blocking(move || {
            let _entered = span.entered();
            let router = domain.router();
            let routing = router.route(&query, &search);
            let dispatch = router.dispatch(&routing, &search);
            (routing, dispatch, search)
        })
        .await
        .map_err(|e| TacitError::TaskFailed {
            reason: e.to_string(),
        })
    }

    /// The single knowledge base search for this query, or none when skipped.
    async fn search(&self, ctx: &QueryContext, trace: &mut TraceBuilder) -> TacitResult<SearchOutcome> {
        if let Some(reason) = ctx.search_skip_reason() {
            debug!(query_id = %ctx.query_id, reason, "search skipped");
            trace.record(
                TraceStage::Search,
                TraceDetail::SearchSkipped {
                    reason: reason.to_string(),
                },
            );
            return Ok(SearchOutcome::skipped());
        }

        let config = ctx.domain.config();
        let request = SearchRequest::new(&config.name, ctx.query()).with_descriptor(&config.search);
        let kb = self.kb.clone();
        let span = tacit_observability::search_span!(config.name, config.search.limit);
        let searched = tokio::task::spawn_blocking(move || {
            let _entered = span.entered();
            kb.search(&request)
        })
        .await
        .map_err(|e| TacitError::TaskFailed {
            reason: e.to_string(),
        })?;
        let outcome = match searched {
            Ok(outcome) => outcome,
            Err(e) => {
                trace.record_error(TraceStage::Search, &e);
                return Err(e);
            }
        };

        if outcome.degraded {
            trace.record_error(
                TraceStage::Search,
                &TacitError::DegradedSearch {
                    component: COMPONENT_ENCODER.to_string(),
                    fallback: "lexical".to_string(),
                },
            );
        }
        trace.record(
            TraceStage::Search,
            TraceDetail::Search {
                matched: outcome
                    .hits
                    .iter()
                    .map(|h| tacit_core::models::UnitScore {
                        unit_id: h.unit.id.clone(),
                        score: h.score,
                    })
                    .collect(),
                degraded: outcome.degraded,
                truncated_units: outcome.truncated_units.clone(),
                stale_units: outcome.stale_units.clone(),
            },
        );
        Ok(outcome)
    }

    /// Count one use for every unit that contributed to the answer.
    ///
    /// A generated answer that matched an existing candidate was already
    /// counted when it was recorded, so that unit is skipped here.
    async fn record_usage(&self, result: &QueryResult, trace: &mut TraceBuilder) {
        let already_counted = result
            .generation
            .as_ref()
            .filter(|g| g.deduplicated)
            .and_then(|g| g.candidate_id.clone());
        let ids: Vec<String> = result
            .matched
            .iter()
            .map(|m| m.unit.id.clone())
            .filter(|id| Some(id) != already_counted.as_ref())
            .collect();
        if ids.is_empty() {
            return;
        }

        let lifecycle = self.lifecycle.clone();
        let batch = ids.clone();
        let recorded = tokio::task::spawn_blocking(move || lifecycle.record_usage(&batch))
            .await
            .map_err(|e| TacitError::TaskFailed {
                reason: e.to_string(),
            })
            .and_then(|r| r);
        match recorded {
            Ok(()) => trace.record(TraceStage::Lifecycle, TraceDetail::UsageRecorded { unit_ids: ids }),
            Err(e) => {
                warn!(error = %e, "usage not recorded");
                trace.record_error(TraceStage::Lifecycle, &e);
            }
        }
    }

    fn finish(&self, ctx: &QueryContext, output: RunOutput, trace: TraceBuilder) -> QueryResponse {
        let RunOutput {
            result,
            searched,
            search_degraded,
            degradations,
            format,
            rendered,
        } = output;
        let trace = trace.finish(Some(result.confidence));
        let elapsed = ctx.started.elapsed();
        let degraded = search_degraded || !degradations.is_empty();
        let generation_used = result.generation_used();

        let response = QueryResponse {
            query_id: ctx.query_id.clone(),
            answer: result.answer.clone(),
            rendered,
            format,
            confidence: result.confidence,
            units: result.unit_scores(),
            processing_time_ms: elapsed.as_millis() as u64,
            generation_used,
            candidate_id: result.generation.as_ref().and_then(|g| g.candidate_id.clone()),
            degraded,
            trace: ctx.request.flags.include_trace.then(|| trace.clone()),
        };

        let entry = QueryLogEntry::new(
            &ctx.query_id,
            ctx.domain_name(),
            elapsed,
            result.matched.len(),
            result.confidence,
        )
        .generated(generation_used)
        .degraded(degraded);

        let mut obs = self.lock_observability();
        for event in degradations {
            obs.record_degradation(event);
        }
        if searched && !search_degraded && obs.degradation.is_degraded(COMPONENT_ENCODER) {
            obs.mark_recovered(COMPONENT_ENCODER);
        }
        if generation_used && obs.degradation.is_degraded(COMPONENT_GENERATION) {
            obs.mark_recovered(COMPONENT_GENERATION);
        }
        obs.record_query(entry, trace);
        response
    }

    fn lock_observability(&self) -> std::sync::MutexGuard<'_, ObservabilityEngine> {
        self.observability
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Reject malformed queries before any work is done.
pub fn validate_query(text: &str) -> TacitResult<()> {
    if text.trim().is_empty() {
        return Err(TacitError::validation("query text must not be empty"));
    }
    let chars = text.chars().count();
    if chars > MAX_QUERY_CHARS {
        return Err(TacitError::validation(format!(
            "query is {chars} characters, limit is {MAX_QUERY_CHARS}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tacit_core::ErrorKind;

    #[test]
    fn blank_and_oversized_queries_are_rejected() {
        assert_eq!(validate_query("  \n").unwrap_err().kind(), ErrorKind::Validation);
        let long = "a".repeat(MAX_QUERY_CHARS + 1);
        assert_eq!(validate_query(&long).unwrap_err().kind(), ErrorKind::Validation);
        assert!(validate_query("How do I hammer in a nail?").is_ok());
    }
}
