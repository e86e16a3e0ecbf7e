//! KnowledgeBase: unit ownership, vector upkeep, and hybrid search.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tacit_core::config::SearchDescriptor;
use tacit_core::constants::COMPONENT_ENCODER;
use tacit_core::errors::{EmbeddingError, TacitResult};
use tacit_core::knowledge::StoredEmbedding;
use tacit_core::models::{DegradationEvent, ScoredUnit, SearchOutcome, SearchWeights};
use tacit_core::traits::IKnowledgeStorage;
use tacit_core::KnowledgeUnit;
use tacit_embeddings::{EmbeddingEngine, QueryEncoding, UnitEncoding};
use tracing::{debug, info, warn};

use crate::{lexical, semantic};

/// Parameters for one search pass.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub domain: String,
    pub query: String,
    pub weights: SearchWeights,
    pub limit: usize,
    pub min_score: f64,
}

impl SearchRequest {
    pub fn new(domain: impl Into<String>, query: impl Into<String>) -> Self {
        let defaults = SearchDescriptor::default();
        Self {
            domain: domain.into(),
            query: query.into(),
            weights: defaults.weights,
            limit: defaults.limit,
            min_score: defaults.min_score,
        }
    }

    /// Search parameters taken from a domain's search descriptor.
    pub fn with_descriptor(mut self, descriptor: &SearchDescriptor) -> Self {
        self.weights = descriptor.weights;
        self.limit = descriptor.limit;
        self.min_score = descriptor.min_score;
        self
    }

    pub fn with_weights(mut self, weights: SearchWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// What indexing did to a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexReport {
    pub unit_id: String,
    pub truncated: bool,
}

/// Per-domain knowledge store with hybrid search.
///
/// Synchronous: async callers run it on a blocking thread.
pub struct KnowledgeBase {
    storage: Arc<dyn IKnowledgeStorage>,
    encoder: Arc<EmbeddingEngine>,
    searches: AtomicU64,
    events: Mutex<Vec<DegradationEvent>>,
}

impl KnowledgeBase {
    pub fn new(storage: Arc<dyn IKnowledgeStorage>, encoder: Arc<EmbeddingEngine>) -> Self {
        info!(
            encoder = encoder.active_provider(),
            dims = encoder.dimensions(),
            "KnowledgeBase initialized"
        );
        Self {
            storage,
            encoder,
            searches: AtomicU64::new(0),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn storage(&self) -> &Arc<dyn IKnowledgeStorage> {
        &self.storage
    }

    pub fn encoder(&self) -> &Arc<EmbeddingEngine> {
        &self.encoder
    }

    /// Number of search passes run since construction.
    pub fn search_count(&self) -> u64 {
        self.searches.load(Ordering::Relaxed)
    }

    /// Store a new unit and index it.
    pub fn add_unit(&self, unit: &KnowledgeUnit) -> TacitResult<IndexReport> {
        self.storage.create(unit)?;
        self.index_unit(unit)
    }

    /// Compute and store the vector for `unit` under its current content hash.
    pub fn index_unit(&self, unit: &KnowledgeUnit) -> TacitResult<IndexReport> {
        let encoding = self.encoder.encode_unit(unit)?;
        self.store_encoding(unit, encoding)
    }

    fn index_batch(&self, units: &[KnowledgeUnit]) -> TacitResult<Vec<IndexReport>> {
        if units.is_empty() {
            return Ok(Vec::new());
        }
        let encodings = self.encoder.encode_units(units)?;
        units
            .iter()
            .zip(encodings)
            .map(|(unit, encoding)| self.store_encoding(unit, encoding))
            .collect()
    }

    fn store_encoding(&self, unit: &KnowledgeUnit, encoding: UnitEncoding) -> TacitResult<IndexReport> {
        let truncated = encoding.text.truncated();
        self.storage.store_embedding(
            &StoredEmbedding::new(
                unit.id.clone(),
                unit.content_hash.clone(),
                encoding.provider,
                encoding.vector,
            )
            .with_question(encoding.question),
        )?;
        Ok(IndexReport {
            unit_id: unit.id.clone(),
            truncated,
        })
    }

    /// Re-index every unit in `domain` whose vector is missing, stale, or
    /// from an encoder other than the active one.
    pub fn refresh_stale(&self, domain: &str) -> TacitResult<Vec<IndexReport>> {
        let units = self.storage.list_by_domain(domain)?;
        let vectors = self.vectors_by_unit(domain)?;
        let active = self.encoder.active_provider();
        let stale: Vec<KnowledgeUnit> = units
            .into_iter()
            .filter(|u| vectors.get(&u.id).map_or(true, |v| !v.is_current(u, active)))
            .collect();
        if !stale.is_empty() {
            info!(domain, count = stale.len(), "re-indexing stale vectors");
        }
        self.index_batch(&stale)
    }

    /// Load a pattern file into `domain`, storing and indexing every unit.
    pub fn import(&self, path: &Path, domain: &str) -> TacitResult<Vec<IndexReport>> {
        let units = tacit_storage::load_documents(path, domain)?;
        for unit in &units {
            unit.check_invariants(tacit_core::Confidence::CERTIFICATION)?;
            self.storage.create(unit)?;
        }
        let reports = self.index_batch(&units)?;
        info!(
            domain,
            path = %path.display(),
            units = reports.len(),
            truncated = reports.iter().filter(|r| r.truncated).count(),
            "imported pattern file"
        );
        Ok(reports)
    }

    fn vectors_by_unit(&self, domain: &str) -> TacitResult<HashMap<String, StoredEmbedding>> {
        Ok(self
            .storage
            .embeddings_for_domain(domain)?
            .into_iter()
            .map(|e| (e.unit_id.clone(), e))
            .collect())
    }

    /// Encode the query, or `None` when the encoder is unavailable.
    fn query_vector(&self, query: &str) -> TacitResult<Option<QueryEncoding>> {
        match self.encoder.encode_query(query) {
            Ok(encoding) => Ok(Some(encoding)),
            Err(e) if e.is_recoverable() => {
                warn!(error = %e, "encoder unavailable, falling back to lexical-only search");
                self.record_event(DegradationEvent::now(
                    COMPONENT_ENCODER,
                    e.to_string(),
                    "lexical",
                ));
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn record_event(&self, event: DegradationEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    /// Degradation events from this knowledge base and its encoder.
    pub fn drain_degradation_events(&self) -> Vec<DegradationEvent> {
        let mut drained = self.encoder.drain_degradation_events();
        if let Ok(mut events) = self.events.lock() {
            drained.append(&mut events);
        }
        drained
    }

    /// Ranked hybrid search over one domain.
    ///
    /// Units whose vector is missing, stale, or from a different encoder
    /// than the query's are left out of semantic scoring entirely and listed
    /// in `stale_units`. When the encoder is unavailable the search runs
    /// lexical-only and `degraded` is set; it is also set when an encoder
    /// switch left vectors unusable. A unit's semantic score is the better of
    /// its full-text and question vectors. A vector whose dimensionality
    /// differs from the query's is fatal.
    pub fn search(&self, request: &SearchRequest) -> TacitResult<SearchOutcome> {
        self.searches.fetch_add(1, Ordering::Relaxed);
        let domain = request.domain.as_str();
        let units = self.storage.list_by_domain(domain)?;
        let mut outcome = SearchOutcome {
            searched: true,
            ..SearchOutcome::default()
        };
        if units.is_empty() || request.limit == 0 {
            debug!(domain, "search over empty domain");
            return Ok(outcome);
        }

        let semantic_needed = request.weights.semantic > 0.0;
        let query_vector = if semantic_needed {
            self.query_vector(&request.query)?
        } else {
            None
        };
        outcome.degraded = semantic_needed && query_vector.is_none();
        let vectors = match query_vector {
            Some(_) => self.vectors_by_unit(domain)?,
            None => HashMap::new(),
        };

        let query_tokens = lexical::content_tokens(&request.query);
        let mut other_encoder = 0usize;
        let mut hits = Vec::with_capacity(units.len());
        for unit in units {
            let lexical = lexical::overlap(&query_tokens, &lexical::unit_tokens(&unit));
            let (score, semantic) = match &query_vector {
                Some(q) => {
                    let stored = match vectors.get(&unit.id) {
                        Some(v) if v.is_current(&unit, &q.provider) => v,
                        Some(v) if !v.is_stale_for(&unit) => {
                            other_encoder += 1;
                            outcome.stale_units.push(unit.id.clone());
                            continue;
                        }
                        _ => {
                            outcome.stale_units.push(unit.id.clone());
                            continue;
                        }
                    };
                    let s = semantic_score(&q.vector, stored)?;
                    (request.weights.combine(s, lexical), Some(s))
                }
                // Degraded or lexical-only domains rank purely on overlap.
                None if outcome.degraded => (lexical, None),
                None => (request.weights.combine(0.0, lexical), None),
            };
            if score > 0.0 && score >= request.min_score {
                hits.push(ScoredUnit {
                    unit,
                    score,
                    semantic,
                    lexical,
                });
            }
        }

        if other_encoder > 0 {
            warn!(domain, count = other_encoder, "vectors from another encoder left out");
            outcome.degraded = true;
        }
        hits.sort_by(ScoredUnit::ranking_cmp);
        hits.truncate(request.limit);
        outcome.truncated_units = hits
            .iter()
            .filter(|h| self.encoder.encoding_text(&h.unit).truncated())
            .map(|h| h.unit.id.clone())
            .collect();
        if !outcome.stale_units.is_empty() {
            warn!(domain, stale = outcome.stale_units.len(), "units excluded for stale vectors");
        }
        debug!(
            domain,
            hits = hits.len(),
            best = hits.first().map(|h| h.score).unwrap_or(0.0),
            degraded = outcome.degraded,
            "search complete"
        );
        outcome.hits = hits;
        Ok(outcome)
    }
}

/// Best cosine between the query and either of a unit's vectors.
fn semantic_score(query: &[f32], stored: &StoredEmbedding) -> TacitResult<f64> {
    let vectors = std::iter::once(&stored.vector).chain(stored.question_vector.as_ref());
    let mut best = 0.0f64;
    for vector in vectors {
        if vector.len() != query.len() {
            return Err(EmbeddingError::DimensionMismatch {
                expected: query.len(),
                actual: vector.len(),
            }
            .into());
        }
        best = best.max(semantic::cosine(query, vector));
    }
    Ok(best)
}
