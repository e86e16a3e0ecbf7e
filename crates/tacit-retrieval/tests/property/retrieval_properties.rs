use std::sync::Arc;

use proptest::prelude::*;
use tacit_core::config::EmbeddingConfig;
use tacit_core::KnowledgeUnit;
use tacit_embeddings::EmbeddingEngine;
use tacit_retrieval::{lexical, semantic, KnowledgeBase, SearchRequest};
use tacit_storage::StorageEngine;

proptest! {
    #[test]
    fn cosine_stays_in_unit_interval(
        a in prop::collection::vec(-10.0f32..10.0, 8),
        b in prop::collection::vec(-10.0f32..10.0, 8),
    ) {
        let c = semantic::cosine(&a, &b);
        prop_assert!((0.0..=1.0).contains(&c));
    }

    #[test]
    fn overlap_stays_in_unit_interval(q in "[a-z ]{0,40}", u in "[a-z ]{0,80}") {
        let s = lexical::overlap(&lexical::content_tokens(&q), &lexical::content_tokens(&u));
        prop_assert!((0.0..=1.0).contains(&s));
    }

    #[test]
    fn search_is_sorted_and_bounded(query in "[a-z]{3,8}( [a-z]{3,8}){0,3}", limit in 1usize..6) {
        let encoder = Arc::new(EmbeddingEngine::new(EmbeddingConfig::default()).unwrap());
        let kb = KnowledgeBase::new(Arc::new(StorageEngine::open_in_memory().unwrap()), encoder);
        for (i, word) in ["hammer nail", "paint wall", "fix faucet", "wire switch", "sand deck"]
            .iter()
            .enumerate()
        {
            let unit = KnowledgeUnit::new_candidate(format!("u{i}"), "d", *word, "", *word);
            kb.add_unit(&unit).unwrap();
        }
        let outcome = kb.search(&SearchRequest::new("d", query).with_limit(limit)).unwrap();
        prop_assert!(outcome.hits.len() <= limit);
        for pair in outcome.hits.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }
}
