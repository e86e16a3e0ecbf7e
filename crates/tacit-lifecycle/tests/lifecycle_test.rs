use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use chrono::Utc;
use tacit_core::config::{EmbeddingConfig, LifecycleConfig};
use tacit_core::constants::{TAG_CANDIDATE, TAG_GENERATED};
use tacit_core::errors::{TacitError, TacitResult};
use tacit_core::knowledge::StoredEmbedding;
use tacit_core::models::{GeneratedAnswer, Review, UnitDraft, UnitEdit};
use tacit_core::traits::IKnowledgeStorage;
use tacit_core::{ErrorKind, KnowledgeUnit, Origin, TrustState};
use tacit_embeddings::EmbeddingEngine;
use tacit_lifecycle::LifecycleManager;
use tacit_retrieval::{KnowledgeBase, SearchRequest};
use tacit_storage::StorageEngine;

fn manager_over(storage: Arc<dyn IKnowledgeStorage>) -> (Arc<KnowledgeBase>, LifecycleManager) {
    let encoder = Arc::new(EmbeddingEngine::new(EmbeddingConfig::default()).unwrap());
    let kb = Arc::new(KnowledgeBase::new(storage, encoder));
    let manager = LifecycleManager::new(kb.clone(), LifecycleConfig::default());
    (kb, manager)
}

fn manager() -> (Arc<KnowledgeBase>, LifecycleManager) {
    manager_over(Arc::new(StorageEngine::open_in_memory().unwrap()))
}

fn answer(query: &str, claimed: Option<f64>) -> GeneratedAnswer {
    GeneratedAnswer {
        domain: "diy".into(),
        query: query.into(),
        text: "Adjust the idle and mixture screws a quarter turn at a time.".into(),
        model_id: "mock-model".into(),
        claimed_confidence: claimed,
        generated_at: Utc::now(),
    }
}

fn draft(name: &str) -> UnitDraft {
    UnitDraft {
        name: name.into(),
        problem: "walls are bare".into(),
        solution: "hang a frame on a picture hook".into(),
        ..Default::default()
    }
}

#[test]
fn generated_answer_becomes_capped_candidate() {
    let (kb, lm) = manager();
    let record = lm
        .record_generated(&answer("How do I tune a carburetor?", Some(0.95)), 0.7)
        .unwrap();
    assert!(!record.deduplicated);
    assert_eq!(record.confidence, 0.7);

    let unit = kb.storage().get(&record.unit_id).unwrap().unwrap();
    assert_eq!(unit.trust_state, TrustState::Candidate);
    assert_eq!(unit.origin, Origin::Generated);
    assert!(unit.has_tag(TAG_CANDIDATE) && unit.has_tag(TAG_GENERATED));
    assert!(unit.confidence.value() <= 0.7);
    assert_eq!(unit.provenance.model_id.as_deref(), Some("mock-model"));
    assert!(kb.storage().get_embedding(&unit.id).unwrap().is_some());
}

#[test]
fn unclaimed_confidence_uses_default() {
    let (_, lm) = manager();
    let record = lm
        .record_generated(&answer("how do I tune a carburetor", None), 0.7)
        .unwrap();
    assert_eq!(record.confidence, 0.5);
}

#[test]
fn rephrased_question_is_deduplicated() {
    let (kb, lm) = manager();
    let first = lm
        .record_generated(&answer("How do I tune a carburetor?", None), 0.7)
        .unwrap();
    let second = lm
        .record_generated(&answer("how to tune the carburetor", None), 0.7)
        .unwrap();
    assert!(second.deduplicated);
    assert_eq!(second.unit_id, first.unit_id);
    assert_eq!(kb.storage().count_by_domain("diy").unwrap(), 1);
    assert_eq!(kb.storage().get(&first.unit_id).unwrap().unwrap().usage_count, 1);
}

#[test]
fn concurrent_duplicates_collapse_to_one_candidate() {
    let (kb, lm) = manager();
    let lm = Arc::new(lm);
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let lm = lm.clone();
            thread::spawn(move || {
                lm.record_generated(&answer("How do I tune a carburetor?", Some(0.6)), 0.7)
                    .unwrap()
            })
        })
        .collect();
    let records: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(records.iter().filter(|r| !r.deduplicated).count(), 1);
    assert_eq!(kb.storage().count_by_domain("diy").unwrap(), 1);
    let unit = kb.storage().get(&records[0].unit_id).unwrap().unwrap();
    assert_eq!(unit.usage_count, 7);
}

#[test]
fn promotion_is_explicit_and_checked() {
    let (kb, lm) = manager();
    let unit = lm.submit("diy", draft("Hang a picture")).unwrap();
    assert!(unit.has_tag(TAG_CANDIDATE));

    lm.record_usage(&vec![unit.id.clone(); 50]).unwrap();
    let stored = kb.storage().get(&unit.id).unwrap().unwrap();
    assert_eq!(stored.trust_state, TrustState::Candidate);
    assert_eq!(stored.usage_count, 50);
    assert_eq!(stored.confidence, unit.confidence);

    let err = lm
        .promote(&unit.id, &Review::by("ann").with_confidence(0.6))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let certified = lm
        .promote(&unit.id, &Review::by("ann").with_confidence(0.85))
        .unwrap();
    assert!(certified.is_certified());
    assert!(!certified.has_tag(TAG_CANDIDATE));
    assert_eq!(certified.provenance.reviewer.as_deref(), Some("ann"));
    assert!(certified.provenance.reviewed_at.is_some());
    assert_eq!(kb.storage().get(&unit.id).unwrap().unwrap().usage_count, 50);
}

#[test]
fn demotion_returns_unit_to_review_queue() {
    let (_, lm) = manager();
    let unit = lm.submit("diy", draft("Hang a picture")).unwrap();
    lm.promote(&unit.id, &Review::by("ann").with_confidence(0.9))
        .unwrap();
    assert!(lm.review_queue("diy").unwrap().is_empty());

    let demoted = lm.demote(&unit.id, &Review::by("bob")).unwrap();
    assert_eq!(demoted.trust_state, TrustState::Candidate);
    assert_eq!(lm.review_queue("diy").unwrap().len(), 1);
    assert!(lm.demote(&unit.id, &Review::by("bob")).is_err());
}

#[test]
fn edit_reindexes_changed_content() {
    let (kb, lm) = manager();
    let unit = lm.submit("diy", draft("Hang a picture")).unwrap();
    let edited = lm
        .edit(
            &unit.id,
            &UnitEdit {
                solution: Some("use two hooks for wide frames".into()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_ne!(edited.content_hash, unit.content_hash);
    let outcome = kb
        .search(&SearchRequest::new("diy", "hang a picture"))
        .unwrap();
    assert!(outcome.stale_units.is_empty());
    assert_eq!(outcome.hits[0].unit.id, unit.id);
}

#[test]
fn missing_unit_is_not_found() {
    let (_, lm) = manager();
    let err = lm.promote("ghost", &Review::by("ann")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(lm.delete("ghost").is_err());
}

#[test]
fn recommendations_never_promote() {
    let (kb, lm) = manager();
    let busy = lm.submit("diy", draft("Hang a picture")).unwrap();
    let quiet = lm.submit("diy", draft("Patch a hole")).unwrap();
    lm.record_usage(&[busy.id.clone(), busy.id.clone(), busy.id.clone()])
        .unwrap();

    let recs = lm.recommend_promotions("diy", 2).unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].unit_id, busy.id);
    for id in [&busy.id, &quiet.id] {
        assert!(!kb.storage().get(id).unwrap().unwrap().is_certified());
    }

    let queue = lm.review_queue("diy").unwrap();
    assert_eq!(queue[0].id, busy.id);
}

/// Storage that reports a version conflict on the next `n` updates.
struct ConflictingStorage {
    inner: StorageEngine,
    conflicts: AtomicUsize,
}

impl IKnowledgeStorage for ConflictingStorage {
    fn create(&self, unit: &KnowledgeUnit) -> TacitResult<()> {
        self.inner.create(unit)
    }
    fn get(&self, id: &str) -> TacitResult<Option<KnowledgeUnit>> {
        self.inner.get(id)
    }
    fn update(&self, unit: &KnowledgeUnit) -> TacitResult<u64> {
        let remaining = self.conflicts.load(Ordering::SeqCst);
        if remaining > 0 {
            self.conflicts.store(remaining - 1, Ordering::SeqCst);
            return Err(TacitError::ConcurrencyConflict {
                unit_id: unit.id.clone(),
            });
        }
        self.inner.update(unit)
    }
    fn delete(&self, id: &str) -> TacitResult<()> {
        self.inner.delete(id)
    }
    fn list_by_domain(&self, domain: &str) -> TacitResult<Vec<KnowledgeUnit>> {
        self.inner.list_by_domain(domain)
    }
    fn list_by_trust_state(
        &self,
        domain: &str,
        state: TrustState,
    ) -> TacitResult<Vec<KnowledgeUnit>> {
        self.inner.list_by_trust_state(domain, state)
    }
    fn find_by_content_hash(
        &self,
        domain: &str,
        content_hash: &str,
    ) -> TacitResult<Option<KnowledgeUnit>> {
        self.inner.find_by_content_hash(domain, content_hash)
    }
    fn count_by_domain(&self, domain: &str) -> TacitResult<usize> {
        self.inner.count_by_domain(domain)
    }
    fn increment_usage(&self, id: &str) -> TacitResult<u64> {
        self.inner.increment_usage(id)
    }
    fn store_embedding(&self, embedding: &StoredEmbedding) -> TacitResult<()> {
        self.inner.store_embedding(embedding)
    }
    fn get_embedding(&self, unit_id: &str) -> TacitResult<Option<StoredEmbedding>> {
        self.inner.get_embedding(unit_id)
    }
    fn embeddings_for_domain(&self, domain: &str) -> TacitResult<Vec<StoredEmbedding>> {
        self.inner.embeddings_for_domain(domain)
    }
    fn delete_embedding(&self, unit_id: &str) -> TacitResult<()> {
        self.inner.delete_embedding(unit_id)
    }
}

fn conflicting(n: usize) -> Arc<ConflictingStorage> {
    Arc::new(ConflictingStorage {
        inner: StorageEngine::open_in_memory().unwrap(),
        conflicts: AtomicUsize::new(n),
    })
}

#[test]
fn single_conflict_is_retried() {
    let storage = conflicting(0);
    let (_, lm) = manager_over(storage.clone());
    let unit = lm.submit("diy", draft("Hang a picture")).unwrap();
    storage.conflicts.store(1, Ordering::SeqCst);
    let certified = lm
        .promote(&unit.id, &Review::by("ann").with_confidence(0.9))
        .unwrap();
    assert!(certified.is_certified());
}

#[test]
fn repeated_conflict_is_surfaced() {
    let storage = conflicting(0);
    let (_, lm) = manager_over(storage.clone());
    let unit = lm.submit("diy", draft("Hang a picture")).unwrap();
    storage.conflicts.store(2, Ordering::SeqCst);
    let err = lm
        .promote(&unit.id, &Review::by("ann").with_confidence(0.9))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConcurrencyConflict);
}
