//! LifecycleManager: serialized writes per domain, optimistic per unit.

use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;
use tacit_core::config::LifecycleConfig;
use tacit_core::errors::{TacitError, TacitResult};
use tacit_core::models::{GeneratedAnswer, PromotionRecommendation, Review, UnitDraft, UnitEdit};
use tacit_core::traits::IKnowledgeStorage;
use tacit_core::{Confidence, KnowledgeUnit, Origin, TrustState};
use tacit_retrieval::KnowledgeBase;
use tracing::{debug, info, warn};

use crate::{dedup, recommend, transitions};

/// Where a generated answer ended up.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRecord {
    pub unit_id: String,
    pub confidence: f64,
    /// An existing candidate already covered the question.
    pub deduplicated: bool,
}

pub struct LifecycleManager {
    kb: Arc<KnowledgeBase>,
    config: LifecycleConfig,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl LifecycleManager {
    pub fn new(kb: Arc<KnowledgeBase>, config: LifecycleConfig) -> Self {
        Self {
            kb,
            config,
            locks: DashMap::new(),
        }
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    fn storage(&self) -> &Arc<dyn IKnowledgeStorage> {
        self.kb.storage()
    }

    fn domain_lock(&self, domain: &str) -> Arc<Mutex<()>> {
        self.locks.entry(domain.to_string()).or_default().clone()
    }

    fn load(&self, id: &str) -> TacitResult<KnowledgeUnit> {
        self.storage()
            .get(id)?
            .ok_or_else(|| TacitError::UnitNotFound { id: id.to_string() })
    }

    /// Index after a write. A failed index leaves the vector stale, which
    /// search already handles, so it is logged rather than returned.
    fn reindex(&self, unit: &KnowledgeUnit) {
        if let Err(e) = self.kb.index_unit(unit) {
            warn!(unit = %unit.id, error = %e, "indexing deferred, vector left stale");
        }
    }

    /// Load, change, store. A version conflict gets one retry on a fresh read.
    fn modify<F>(&self, id: &str, mut change: F) -> TacitResult<KnowledgeUnit>
    where
        F: FnMut(&mut KnowledgeUnit) -> TacitResult<()>,
    {
        let domain = self.load(id)?.domain;
        let lock = self.domain_lock(&domain);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut retried = false;
        loop {
            let mut unit = self.load(id)?;
            let before = unit.content_hash.clone();
            change(&mut unit)?;
            unit.refresh_content_hash();
            unit.check_invariants(self.config.certification_threshold)?;
            match self.storage().update(&unit) {
                Ok(version) => {
                    unit.version = version;
                    if unit.content_hash != before {
                        self.reindex(&unit);
                    }
                    return Ok(unit);
                }
                Err(TacitError::ConcurrencyConflict { .. }) if !retried => {
                    debug!(unit = id, "version conflict, retrying on fresh read");
                    retried = true;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Store a human-authored draft as a candidate.
    pub fn submit(&self, domain: &str, draft: UnitDraft) -> TacitResult<KnowledgeUnit> {
        let unit = transitions::candidate_from_draft(domain, draft, self.config.candidate_confidence)?;
        let lock = self.domain_lock(domain);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.storage().create(&unit)?;
        self.reindex(&unit);
        info!(domain, unit = %unit.id, "candidate submitted");
        Ok(unit)
    }

    /// Persist a generated answer as a candidate, or count it against an
    /// existing candidate for the same question.
    ///
    /// Confidence is the provider's claim (or the configured default), capped
    /// at `ceiling`.
    pub fn record_generated(
        &self,
        answer: &GeneratedAnswer,
        ceiling: f64,
    ) -> TacitResult<CandidateRecord> {
        let domain = answer.domain.as_str();
        let confidence = Confidence::new(
            answer
                .claimed_confidence
                .unwrap_or(self.config.candidate_confidence),
        )
        .capped(ceiling)
        .value();

        let lock = self.domain_lock(domain);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let existing = self
            .storage()
            .list_by_trust_state(domain, TrustState::Candidate)?
            .into_iter()
            .filter(|u| u.origin == Origin::Generated)
            .find(|u| {
                let question = u.provenance.origin_query.as_deref().unwrap_or(&u.problem);
                dedup::is_duplicate(&answer.query, question, self.config.dedup_similarity)
            });
        if let Some(unit) = existing {
            let usage = self.storage().increment_usage(&unit.id)?;
            info!(domain, unit = %unit.id, usage, "generated answer deduplicated");
            return Ok(CandidateRecord {
                unit_id: unit.id,
                confidence: unit.confidence.value(),
                deduplicated: true,
            });
        }

        let unit = transitions::candidate_from_answer(answer, confidence);
        self.storage().create(&unit)?;
        self.reindex(&unit);
        info!(domain, unit = %unit.id, confidence, model = %answer.model_id, "generated candidate recorded");
        Ok(CandidateRecord {
            unit_id: unit.id,
            confidence,
            deduplicated: false,
        })
    }

    /// Count a match against each unit. Trust state and confidence are untouched.
    pub fn record_usage(&self, ids: &[String]) -> TacitResult<()> {
        for id in ids {
            self.storage().increment_usage(id)?;
        }
        Ok(())
    }

    pub fn edit(&self, id: &str, changes: &UnitEdit) -> TacitResult<KnowledgeUnit> {
        let threshold = self.config.certification_threshold;
        let unit = self.modify(id, |unit| transitions::edit(unit, changes, threshold).map(|_| ()))?;
        info!(unit = id, "unit edited");
        Ok(unit)
    }

    /// Candidate → Certified. The only path to certification.
    pub fn promote(&self, id: &str, review: &Review) -> TacitResult<KnowledgeUnit> {
        let threshold = self.config.certification_threshold;
        let unit = self.modify(id, |unit| transitions::promote(unit, review, threshold))?;
        info!(unit = id, reviewer = %review.reviewer, confidence = unit.confidence.value(), "unit certified");
        Ok(unit)
    }

    /// Certified → Candidate.
    pub fn demote(&self, id: &str, review: &Review) -> TacitResult<KnowledgeUnit> {
        let unit = self.modify(id, |unit| transitions::demote(unit, review))?;
        info!(unit = id, reviewer = %review.reviewer, "unit demoted");
        Ok(unit)
    }

    pub fn delete(&self, id: &str) -> TacitResult<()> {
        let domain = self.load(id)?.domain;
        let lock = self.domain_lock(&domain);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.storage().delete(id)?;
        info!(domain = %domain, unit = id, "unit deleted");
        Ok(())
    }

    /// Candidates awaiting review, most used first.
    pub fn review_queue(&self, domain: &str) -> TacitResult<Vec<KnowledgeUnit>> {
        let mut queue = self
            .storage()
            .list_by_trust_state(domain, TrustState::Candidate)?;
        queue.sort_by(|a, b| {
            b.usage_count
                .cmp(&a.usage_count)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(queue)
    }

    /// Advisory promotion list for reviewers.
    pub fn recommend_promotions(
        &self,
        domain: &str,
        min_usage: u64,
    ) -> TacitResult<Vec<PromotionRecommendation>> {
        let candidates = self
            .storage()
            .list_by_trust_state(domain, TrustState::Candidate)?;
        let recs = recommend::recommend(&candidates, min_usage);
        debug!(domain, count = recs.len(), "promotion recommendations built");
        Ok(recs)
    }
}
