use std::collections::HashMap;

use tacit_core::models::ScoredUnit;

/// Merge matches from several specialists.
///
/// A unit reported by more than one specialist keeps its highest score. The
/// result is in ranking order: score desc, certified before candidate, usage
/// desc, id asc. Certified units are never dropped in favour of candidates.
pub fn merge_matches<I>(outputs: I) -> Vec<ScoredUnit>
where
    I: IntoIterator<Item = Vec<ScoredUnit>>,
{
    let mut best: HashMap<String, ScoredUnit> = HashMap::new();
    for hit in outputs.into_iter().flatten() {
        match best.get(&hit.unit.id) {
            Some(existing) if existing.score >= hit.score => {}
            _ => {
                best.insert(hit.unit.id.clone(), hit);
            }
        }
    }
    let mut merged: Vec<ScoredUnit> = best.into_values().collect();
    merged.sort_by(ScoredUnit::ranking_cmp);
    merged
}
