use proptest::prelude::*;
use tacit_core::models::ScoredUnit;
use tacit_core::{KnowledgeUnit, TrustState};
use tacit_routing::merge_matches;

fn scored(id: u8, score: f64, certified: bool, usage: u64) -> ScoredUnit {
    let mut unit = KnowledgeUnit::new_candidate(format!("u{id}"), "d", "n", "", "s");
    unit.usage_count = usage;
    if certified {
        unit.trust_state = TrustState::Certified;
    }
    ScoredUnit {
        unit,
        score,
        semantic: Some(score),
        lexical: 0.0,
    }
}

fn arb_hits() -> impl Strategy<Value = Vec<ScoredUnit>> {
    prop::collection::vec((0u8..12, 0.0f64..1.0, any::<bool>(), 0u64..5), 0..12)
        .prop_map(|v| v.into_iter().map(|(i, s, c, u)| scored(i, s, c, u)).collect())
}

proptest! {
    #[test]
    fn merge_has_unique_ids_and_is_sorted(a in arb_hits(), b in arb_hits()) {
        let merged = merge_matches([a, b]);
        let mut ids: Vec<&str> = merged.iter().map(|m| m.unit.id.as_str()).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), total);
        for pair in merged.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn merge_is_order_independent(a in arb_hits(), b in arb_hits()) {
        let ab: Vec<(String, f64)> = merge_matches([a.clone(), b.clone()])
            .into_iter().map(|m| (m.unit.id, m.score)).collect();
        let ba: Vec<(String, f64)> = merge_matches([b, a])
            .into_iter().map(|m| (m.unit.id, m.score)).collect();
        prop_assert_eq!(ab, ba);
    }
}
