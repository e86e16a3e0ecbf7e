use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tacit_core::config::EmbeddingConfig;
use tacit_core::errors::{EmbeddingError, TacitResult};
use tacit_core::traits::IEmbeddingProvider;
use tacit_core::KnowledgeUnit;
use tacit_embeddings::{DegradationChain, EmbeddingEngine, EncodingField, TfIdfEncoder};

/// Provider that is never reachable.
struct OfflineProvider;

impl IEmbeddingProvider for OfflineProvider {
    fn embed(&self, _text: &str) -> TacitResult<Vec<f32>> {
        Err(EmbeddingError::ProviderUnavailable {
            provider: "offline".into(),
        }
        .into())
    }
    fn embed_batch(&self, _texts: &[String]) -> TacitResult<Vec<Vec<f32>>> {
        self.embed("").map(|v| vec![v])
    }
    fn dimensions(&self) -> usize {
        64
    }
    fn name(&self) -> &str {
        "offline"
    }
    fn is_available(&self) -> bool {
        false
    }
}

/// Remote stand-in whose reachability the test controls.
struct SwitchableRemote {
    online: Arc<AtomicBool>,
}

impl IEmbeddingProvider for SwitchableRemote {
    fn embed(&self, _text: &str) -> TacitResult<Vec<f32>> {
        Ok(vec![0.125; 64])
    }
    fn embed_batch(&self, texts: &[String]) -> TacitResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| vec![0.125; 64]).collect())
    }
    fn dimensions(&self) -> usize {
        64
    }
    fn name(&self) -> &str {
        "remote"
    }
    fn is_available(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}

fn config(dimensions: usize, token_budget: usize) -> EmbeddingConfig {
    EmbeddingConfig {
        dimensions,
        token_budget,
        ..Default::default()
    }
}

#[test]
fn offline_primary_without_local_fallback_is_unavailable() {
    let mut chain = DegradationChain::new();
    chain.push(Box::new(OfflineProvider));
    let engine = EmbeddingEngine::with_chain(config(64, 256), chain);
    assert!(!engine.is_available());
    let err = engine.encode_query("anything").unwrap_err();
    assert!(err.is_recoverable());
}

#[test]
fn offline_primary_falls_back_to_local_encoder() {
    let mut chain = DegradationChain::new();
    chain.push(Box::new(OfflineProvider));
    chain.push(Box::new(TfIdfEncoder::new(64)));
    let engine = EmbeddingEngine::with_chain(config(64, 256), chain);
    let v = engine.encode_query("hang a picture frame").unwrap();
    assert_eq!(v.vector.len(), 64);
    assert_eq!(v.provider, "tfidf");
    let events = engine.drain_degradation_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].fallback_used, "tfidf");
}

#[test]
fn over_budget_unit_is_truncated_identically_every_time() {
    let engine = EmbeddingEngine::new(config(128, 24)).unwrap();
    let mut unit = KnowledgeUnit::new_candidate(
        "long",
        "diy",
        "Refinish a hardwood floor",
        "The floor is scratched, dull and has water stains near the kitchen door",
        "Sand with progressively finer grit then apply two coats of polyurethane",
    );
    unit.description = "word ".repeat(200);
    unit.tags.insert("flooring".into());

    let a = engine.encode_unit(&unit).unwrap();
    let b = engine.encode_unit(&unit).unwrap();
    assert!(a.text.truncated());
    assert_eq!(a.text.dropped.first(), Some(&EncodingField::Description));
    assert_eq!(a.text.text.as_bytes(), b.text.text.as_bytes());
    assert!(a.text.text.starts_with("Refinish a hardwood floor"));
    assert!(a.text.text.contains("polyurethane"));
    assert_eq!(a.vector, b.vector);
}

#[test]
fn cached_vectors_never_cross_encoders() {
    let online = Arc::new(AtomicBool::new(true));
    let mut chain = DegradationChain::new();
    chain.push(Box::new(SwitchableRemote {
        online: online.clone(),
    }));
    chain.push(Box::new(TfIdfEncoder::new(64)));
    let engine = EmbeddingEngine::with_chain(config(64, 256), chain);
    let unit = KnowledgeUnit::new_candidate("u1", "diy", "Oil a hinge", "door squeaks", "oil it");

    let remote_query = engine.encode_query("door squeaks").unwrap();
    let remote_unit = engine.encode_unit(&unit).unwrap();
    assert_eq!(remote_query.provider, "remote");
    assert_eq!(remote_unit.provider, "remote");

    online.store(false, Ordering::SeqCst);
    let local_query = engine.encode_query("door squeaks").unwrap();
    let local_unit = engine.encode_unit(&unit).unwrap();
    assert_eq!(local_query.provider, "tfidf");
    assert_eq!(local_unit.provider, "tfidf");
    assert_ne!(local_query.vector, remote_query.vector);
    assert_ne!(local_unit.vector, remote_unit.vector);

    online.store(true, Ordering::SeqCst);
    assert_eq!(engine.encode_query("door squeaks").unwrap(), remote_query);
}
