use proptest::prelude::*;
use tacit_core::models::{QueryResult, ScoredUnit};
use tacit_core::{KnowledgeUnit, TrustState};
use tacit_enrichment::contract::check_enhance;
use tacit_enrichment::stages::enhance;

fn arb_result() -> impl Strategy<Value = QueryResult> {
    prop::collection::vec((0u8..20, 0.0f64..1.0, any::<bool>(), 0u64..100), 0..8).prop_map(
        |hits| {
            let mut matched: Vec<ScoredUnit> = hits
                .into_iter()
                .map(|(id, score, certified, usage)| {
                    let mut unit =
                        KnowledgeUnit::new_candidate(format!("u{id}"), "d", "n", "p", "s");
                    unit.usage_count = usage;
                    if certified {
                        unit.trust_state = TrustState::Certified;
                    }
                    ScoredUnit { unit, score, semantic: Some(score), lexical: 0.0 }
                })
                .collect();
            matched.sort_by(ScoredUnit::ranking_cmp);
            let confidence = matched.first().map(|m| m.score).unwrap_or(0.0);
            QueryResult::from_matches("q", "d", matched, vec![], confidence)
        },
    )
}

proptest! {
    #[test]
    fn enhance_stages_keep_their_contract(input in arb_result()) {
        let staged = [
            ("citations", enhance::citations as fn(QueryResult) -> QueryResult),
            ("quality_score", enhance::quality_score),
            ("usage_stats", enhance::usage_stats),
        ];
        let mut current = input;
        for (name, stage) in staged {
            let next = stage(current.clone());
            prop_assert!(check_enhance(name, &current, &next).is_ok());
            current = next;
        }
    }

    #[test]
    fn quality_is_bounded(input in arb_result()) {
        let q = enhance::quality_estimate(&input);
        prop_assert!((0.0..=1.0).contains(&q));
    }
}
