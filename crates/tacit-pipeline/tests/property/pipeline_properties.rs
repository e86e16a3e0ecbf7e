use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use proptest::prelude::*;
use tacit_core::config::{DomainConfig, StorageConfig, TacitConfig};
use tacit_core::errors::TacitResult;
use tacit_core::models::{GenerationRequest, GenerationResponse, QueryRequest, TokenUsage};
use tacit_core::traits::{IGenerationProvider, IKnowledgeStorage};
use tacit_enrichment::ProviderRegistry;
use tacit_pipeline::Tacit;
use test_fixtures::{domain_patterns_path, domain_toml};

const FALLBACK_MIN: f64 = 0.6;

struct CountingProvider(AtomicUsize);

#[async_trait]
impl IGenerationProvider for CountingProvider {
    async fn generate(&self, request: GenerationRequest) -> TacitResult<GenerationResponse> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(GenerationResponse {
            text: format!("answer to {}", request.prompt),
            model_id: "counting".into(),
            usage: TokenUsage::default(),
            claimed_confidence: Some(1.0),
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}

const WORDS: &[&str] = &[
    "hammer", "nail", "shelf", "faucet", "leak", "drain", "light", "switch", "paint", "wall",
    "carburetor", "roses", "how", "do", "I", "fix", "build", "replace",
];

fn queries() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::collection::vec(prop::sample::select(WORDS), 1..7).prop_map(|w| w.join(" ")),
        1..5,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn one_search_per_query_and_certified_beats_generation(batch in queries()) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let provider = Arc::new(CountingProvider(AtomicUsize::new(0)));
        let mut providers = ProviderRegistry::new();
        providers.register_generation(provider.clone());
        let config = TacitConfig {
            storage: StorageConfig { db_path: ":memory:".into(), ..Default::default() },
            ..Default::default()
        };
        let tacit = Tacit::with_providers(config, providers).unwrap();
        tacit.register_domain(DomainConfig::from_toml(&domain_toml("diy")).unwrap()).unwrap();
        tacit.import(&domain_patterns_path("diy"), "diy").unwrap();
        let storage = tacit.knowledge_base().storage().clone();

        for (i, text) in batch.iter().enumerate() {
            let calls_before = provider.0.load(Ordering::SeqCst);
            let response = rt.block_on(tacit.query(QueryRequest::new("diy", text.as_str()))).unwrap();
            prop_assert_eq!(tacit.knowledge_base().search_count(), i as u64 + 1);
            prop_assert!(response.confidence <= 1.0);

            let strong_certified = response.units.iter().any(|u| {
                u.score >= FALLBACK_MIN
                    && storage.get(&u.unit_id).unwrap().map_or(false, |unit| unit.is_certified())
            });
            if strong_certified {
                prop_assert!(!response.generation_used);
                prop_assert_eq!(provider.0.load(Ordering::SeqCst), calls_before);
            }
            if response.generation_used {
                prop_assert!(response.confidence <= 0.7);
            }
        }
    }
}
