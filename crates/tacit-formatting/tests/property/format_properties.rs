use proptest::prelude::*;
use tacit_core::models::{OutputFormat, QueryResult, ScoredUnit};
use tacit_core::KnowledgeUnit;
use tacit_formatting::render;

fn result_with(units: usize) -> QueryResult {
    let matched = (0..units)
        .map(|i| ScoredUnit {
            unit: KnowledgeUnit::new_candidate(format!("unit-{i:03}"), "d", format!("name {i}"), "p", "s"),
            score: 1.0 - i as f64 / 100.0,
            semantic: None,
            lexical: 0.5,
        })
        .collect();
    QueryResult::from_matches("q", "d", matched, vec![], 0.5)
}

fn formats() -> impl Strategy<Value = OutputFormat> {
    prop_oneof![
        Just(OutputFormat::Html),
        Just(OutputFormat::Markdown),
        Just(OutputFormat::Chat),
        Just(OutputFormat::Digest),
    ]
}

proptest! {
    #[test]
    fn shown_units_respect_cap(units in 0usize..12, cap in 0usize..6, format in formats()) {
        let result = result_with(units);
        let out = render(&result, format, cap);
        let shown = (0..units).filter(|i| out.contains(&format!("unit-{i:03}")) || out.contains(&format!("name {i}"))).count();
        prop_assert_eq!(shown, units.min(cap));
    }

    #[test]
    fn rendering_is_deterministic_and_pure(units in 0usize..6, format in formats()) {
        let result = result_with(units);
        let before = serde_json::to_string(&result).unwrap();
        let a = render(&result, format, 3);
        let b = render(&result, format, 3);
        prop_assert_eq!(a, b);
        prop_assert_eq!(before, serde_json::to_string(&result).unwrap());
    }
}
