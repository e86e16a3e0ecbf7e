//! Property tests for encoding-text truncation.

use proptest::prelude::*;
use tacit_core::KnowledgeUnit;
use tacit_embeddings::text::encoding_text;
use tacit_embeddings::TokenCounter;

fn unit(name: &str, problem: &str, solution: &str, description: &str) -> KnowledgeUnit {
    let mut u = KnowledgeUnit::new_candidate("p", "d", name, problem, solution);
    u.description = description.to_string();
    u
}

proptest! {
    #[test]
    fn truncation_is_deterministic(
        name in "[a-z ]{1,30}",
        problem in "[a-z ]{0,200}",
        solution in "[a-z ]{1,60}",
        description in "[a-z ]{0,400}",
        budget in 1usize..120,
    ) {
        let counter = TokenCounter::whitespace();
        let u = unit(&name, &problem, &solution, &description);
        let a = encoding_text(&u, &counter, budget);
        let b = encoding_text(&u, &counter, budget);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn name_and_solution_always_survive(
        name in "[a-z]{1,12}( [a-z]{1,12}){0,3}",
        solution in "[a-z]{1,12}( [a-z]{1,12}){0,5}",
        description in "[a-z ]{0,300}",
        budget in 1usize..60,
    ) {
        let counter = TokenCounter::whitespace();
        let u = unit(&name, "some problem text", &solution, &description);
        let enc = encoding_text(&u, &counter, budget);
        prop_assert!(enc.text.contains(name.trim()));
        prop_assert!(enc.text.contains(solution.trim()));
    }

    #[test]
    fn result_fits_budget_unless_only_core_fields_remain(
        description in "[a-z ]{0,300}",
        budget in 8usize..80,
    ) {
        let counter = TokenCounter::whitespace();
        let u = unit("fix door", "door sticks in summer", "plane the top edge", &description);
        let enc = encoding_text(&u, &counter, budget);
        let core_only = counter.count("fix door\nplane the top edge");
        prop_assert!(enc.tokens <= budget || enc.tokens == core_only);
    }
}
