//! Offline promotion recommendations.
//!
//! Output is advisory. Nothing here changes a unit's trust state.

use std::cmp::Ordering;

use tacit_core::models::PromotionRecommendation;
use tacit_core::KnowledgeUnit;

/// Rank candidates used at least `min_usage` times, most used first.
pub fn recommend(candidates: &[KnowledgeUnit], min_usage: u64) -> Vec<PromotionRecommendation> {
    let mut picked: Vec<&KnowledgeUnit> = candidates
        .iter()
        .filter(|u| !u.is_certified() && u.usage_count >= min_usage)
        .collect();
    picked.sort_by(|a, b| {
        b.usage_count
            .cmp(&a.usage_count)
            .then_with(|| {
                b.confidence
                    .value()
                    .partial_cmp(&a.confidence.value())
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.id.cmp(&b.id))
    });
    picked
        .into_iter()
        .map(|u| PromotionRecommendation {
            unit_id: u.id.clone(),
            domain: u.domain.clone(),
            usage_count: u.usage_count,
            confidence: u.confidence.value(),
            reason: format!(
                "matched {} times at confidence {:.2}",
                u.usage_count,
                u.confidence.value()
            ),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_by_usage_then_confidence() {
        let mut a = KnowledgeUnit::new_candidate("a", "d", "a", "", "s");
        a.usage_count = 3;
        let mut b = KnowledgeUnit::new_candidate("b", "d", "b", "", "s");
        b.usage_count = 7;
        let mut c = KnowledgeUnit::new_candidate("c", "d", "c", "", "s");
        c.usage_count = 1;
        let recs = recommend(&[a, b, c], 2);
        let ids: Vec<&str> = recs.iter().map(|r| r.unit_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
