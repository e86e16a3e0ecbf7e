use tacit_core::models::*;
use tacit_core::{Confidence, KnowledgeUnit, TrustState};

fn scored(id: &str, score: f64, state: TrustState, usage: u64) -> ScoredUnit {
    let mut unit = KnowledgeUnit::new_candidate(id, "diy", id, "p", "s");
    unit.trust_state = state;
    unit.usage_count = usage;
    ScoredUnit {
        unit,
        score,
        semantic: Some(score),
        lexical: 0.0,
    }
}

#[test]
fn ranking_prefers_score_then_certified_then_usage_then_id() {
    let mut hits = vec![
        scored("c", 0.5, TrustState::Candidate, 10),
        scored("b", 0.5, TrustState::Certified, 0),
        scored("a", 0.9, TrustState::Candidate, 0),
        scored("d", 0.5, TrustState::Candidate, 10),
        scored("e", 0.5, TrustState::Candidate, 50),
    ];
    hits.sort_by(ScoredUnit::ranking_cmp);
    let ids: Vec<_> = hits.iter().map(|h| h.unit.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "e", "c", "d"]);
}

#[test]
fn weights_combine_linearly() {
    let w = SearchWeights {
        semantic: 0.7,
        lexical: 0.3,
    };
    assert!((w.combine(1.0, 0.0) - 0.7).abs() < 1e-9);
    assert!((w.combine(0.5, 1.0) - 0.65).abs() < 1e-9);
}

#[test]
fn output_format_resolves_aliases_and_rejects_unknown() {
    assert_eq!(OutputFormat::from_name("TLDR").unwrap(), OutputFormat::Digest);
    assert_eq!(OutputFormat::from_name("markup").unwrap(), OutputFormat::Html);
    assert!(OutputFormat::from_name("pdf").is_err());
}

#[test]
fn query_result_answer_comes_from_best_match() {
    let matched = vec![
        scored("a", 0.9, TrustState::Candidate, 0),
        scored("b", 0.4, TrustState::Certified, 0),
    ];
    let result = QueryResult::from_matches("q", "diy", matched, vec!["s1".into()], 0.9);
    assert_eq!(result.answer, "s");
    assert_eq!(result.best_certified().map(|m| m.unit.id.as_str()), Some("b"));
    assert!(!result.generation_used());
    assert_eq!(result.unit_scores().len(), 2);
}

#[test]
fn confidence_clamps_and_caps() {
    assert_eq!(Confidence::new(1.7).value(), 1.0);
    assert_eq!(Confidence::new(f64::NAN).value(), 0.0);
    assert_eq!(Confidence::new(0.95).capped(0.7).value(), 0.7);
}
