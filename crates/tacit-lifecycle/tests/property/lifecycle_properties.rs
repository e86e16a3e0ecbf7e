use proptest::prelude::*;
use tacit_core::models::{Review, UnitEdit};
use tacit_core::KnowledgeUnit;
use tacit_lifecycle::transitions;

#[derive(Debug, Clone)]
enum Action {
    Promote(f64),
    Demote,
    SetConfidence(f64),
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        (0.0f64..1.0).prop_map(Action::Promote),
        Just(Action::Demote),
        (0.0f64..1.0).prop_map(Action::SetConfidence),
    ]
}

proptest! {
    /// Whatever reviewers attempt, a certified unit always meets the threshold
    /// and names its reviewer.
    #[test]
    fn certified_invariants_hold(actions in prop::collection::vec(arb_action(), 0..20)) {
        let threshold = 0.8;
        let mut unit = KnowledgeUnit::new_candidate("u", "d", "n", "p", "s");
        for action in actions {
            let mut next = unit.clone();
            let applied = match action {
                Action::Promote(c) => {
                    transitions::promote(&mut next, &Review::by("r").with_confidence(c), threshold)
                }
                Action::Demote => transitions::demote(&mut next, &Review::by("r")),
                Action::SetConfidence(c) => transitions::edit(
                    &mut next,
                    &UnitEdit { confidence: Some(c), ..Default::default() },
                    threshold,
                )
                .map(|_| ()),
            };
            if applied.is_ok() {
                unit = next;
            }
            prop_assert!(unit.check_invariants(threshold).is_ok());
        }
    }
}
