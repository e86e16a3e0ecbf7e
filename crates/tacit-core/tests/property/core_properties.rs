//! Property tests for tacit-core: confidence bounds and ranking determinism.

use proptest::prelude::*;
use tacit_core::Confidence;

proptest! {
    #[test]
    fn confidence_always_in_unit_range(v in proptest::num::f64::ANY) {
        let c = Confidence::new(v).value();
        prop_assert!((0.0..=1.0).contains(&c));
    }

    #[test]
    fn capped_never_exceeds_ceiling(v in 0.0f64..=1.0, ceiling in 0.0f64..=1.0) {
        prop_assert!(Confidence::new(v).capped(ceiling).value() <= ceiling);
    }
}

use tacit_core::models::ScoredUnit;
use tacit_core::{KnowledgeUnit, TrustState};

fn build(entries: &[(f64, bool, u64)]) -> Vec<ScoredUnit> {
    entries
        .iter()
        .enumerate()
        .map(|(i, (score, certified, usage))| {
            let mut unit = KnowledgeUnit::new_candidate(format!("u{i:03}"), "d", "n", "p", "s");
            if *certified {
                unit.trust_state = TrustState::Certified;
            }
            unit.usage_count = *usage;
            ScoredUnit {
                unit,
                score: *score,
                semantic: None,
                lexical: *score,
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn ranking_is_deterministic_under_permutation(
        entries in proptest::collection::vec((0.0f64..=1.0, any::<bool>(), 0u64..5), 1..20)
    ) {
        let mut forward = build(&entries);
        let mut reversed = build(&entries);
        reversed.reverse();
        forward.sort_by(ScoredUnit::ranking_cmp);
        reversed.sort_by(ScoredUnit::ranking_cmp);
        let a: Vec<_> = forward.iter().map(|s| s.unit.id.clone()).collect();
        let b: Vec<_> = reversed.iter().map(|s| s.unit.id.clone()).collect();
        prop_assert_eq!(a, b);
        for pair in forward.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }
}
