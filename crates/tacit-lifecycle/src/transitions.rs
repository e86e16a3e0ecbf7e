//! Pure state transitions on a single unit.
//!
//! The manager loads, applies one of these, and stores with an optimistic
//! version check.

use chrono::Utc;
use tacit_core::constants::{GENERATED_NAME_MAX_CHARS, TAG_CANDIDATE, TAG_GENERATED};
use tacit_core::errors::{TacitError, TacitResult};
use tacit_core::models::{GeneratedAnswer, Review, UnitDraft, UnitEdit};
use tacit_core::{Confidence, KnowledgeUnit, Origin, TrustState};

/// A human-authored draft as a new candidate.
pub fn candidate_from_draft(
    domain: &str,
    draft: UnitDraft,
    default_confidence: f64,
) -> TacitResult<KnowledgeUnit> {
    let id = uuid::Uuid::new_v4().to_string();
    let mut unit = KnowledgeUnit::new_candidate(id, domain, draft.name, draft.problem, draft.solution);
    unit.description = draft.description;
    unit.tags = draft.tags;
    unit.tags.insert(TAG_CANDIDATE.to_string());
    unit.confidence = Confidence::new(draft.confidence.unwrap_or(default_confidence));
    unit.refresh_content_hash();
    unit.check_invariants(Confidence::CERTIFICATION)?;
    Ok(unit)
}

/// The generated answer persisted as a candidate with capped confidence.
pub fn candidate_from_answer(answer: &GeneratedAnswer, confidence: f64) -> KnowledgeUnit {
    let id = uuid::Uuid::new_v4().to_string();
    let name: String = answer.query.trim().chars().take(GENERATED_NAME_MAX_CHARS).collect();
    let mut unit = KnowledgeUnit::new_candidate(
        id,
        answer.domain.as_str(),
        name,
        answer.query.trim(),
        answer.text.trim(),
    );
    unit.origin = Origin::Generated;
    unit.confidence = Confidence::new(confidence);
    unit.tags.insert(TAG_CANDIDATE.to_string());
    unit.tags.insert(TAG_GENERATED.to_string());
    unit.provenance.origin_query = Some(answer.query.clone());
    unit.provenance.model_id = Some(answer.model_id.clone());
    unit.provenance.generated_at = Some(answer.generated_at);
    unit.refresh_content_hash();
    unit
}

fn require_reviewer(review: &Review) -> TacitResult<&str> {
    let reviewer = review.reviewer.trim();
    if reviewer.is_empty() {
        return Err(TacitError::validation("reviewer id is required"));
    }
    Ok(reviewer)
}

/// Candidate → Certified.
pub fn promote(unit: &mut KnowledgeUnit, review: &Review, threshold: f64) -> TacitResult<()> {
    let reviewer = require_reviewer(review)?.to_string();
    if unit.is_certified() {
        return Err(TacitError::validation(format!("unit {} is already certified", unit.id)));
    }
    let confidence = Confidence::new(review.confidence.unwrap_or(unit.confidence.value()));
    if !confidence.meets(threshold) {
        return Err(TacitError::validation(format!(
            "confidence {confidence} is below the certification threshold {threshold}"
        )));
    }
    let now = Utc::now();
    unit.trust_state = TrustState::Certified;
    unit.confidence = confidence;
    unit.tags.remove(TAG_CANDIDATE);
    unit.tags.remove(TAG_GENERATED);
    unit.provenance.reviewer = Some(reviewer);
    unit.provenance.reviewed_at = Some(now);
    unit.updated_at = now;
    Ok(())
}

/// Certified → Candidate. Review tags come back.
pub fn demote(unit: &mut KnowledgeUnit, review: &Review) -> TacitResult<()> {
    let reviewer = require_reviewer(review)?.to_string();
    if !unit.is_certified() {
        return Err(TacitError::validation(format!("unit {} is not certified", unit.id)));
    }
    let now = Utc::now();
    unit.trust_state = TrustState::Candidate;
    if let Some(c) = review.confidence {
        unit.confidence = Confidence::new(c);
    }
    unit.tags.insert(TAG_CANDIDATE.to_string());
    if unit.origin == Origin::Generated {
        unit.tags.insert(TAG_GENERATED.to_string());
    }
    unit.provenance.reviewer = Some(reviewer);
    unit.provenance.reviewed_at = Some(now);
    unit.updated_at = now;
    Ok(())
}

/// Apply reviewer edits. Returns whether the embeddable content changed.
pub fn edit(unit: &mut KnowledgeUnit, changes: &UnitEdit, threshold: f64) -> TacitResult<bool> {
    if changes.is_empty() {
        return Ok(false);
    }
    let review_tags: Vec<String> = unit.review_tags().map(str::to_string).collect();
    if let Some(name) = &changes.name {
        unit.name = name.clone();
    }
    if let Some(problem) = &changes.problem {
        unit.problem = problem.clone();
    }
    if let Some(solution) = &changes.solution {
        unit.solution = solution.clone();
    }
    if let Some(description) = &changes.description {
        unit.description = description.clone();
    }
    if let Some(tags) = &changes.tags {
        unit.tags = tags.clone();
        unit.tags.extend(review_tags);
    }
    if let Some(c) = changes.confidence {
        unit.confidence = Confidence::new(c);
    }
    unit.check_invariants(threshold)?;
    let before = unit.content_hash.clone();
    unit.refresh_content_hash();
    unit.updated_at = Utc::now();
    Ok(unit.content_hash != before)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate() -> KnowledgeUnit {
        let mut u = KnowledgeUnit::new_candidate("u1", "diy", "Tune", "carb", "adjust screws");
        u.tags.insert(TAG_CANDIDATE.into());
        u.tags.insert(TAG_GENERATED.into());
        u.origin = Origin::Generated;
        u
    }

    #[test]
    fn promotion_requires_threshold() {
        let mut u = candidate();
        let err = promote(&mut u, &Review::by("ann").with_confidence(0.5), 0.8).unwrap_err();
        assert_eq!(err.kind(), tacit_core::ErrorKind::Validation);
        assert_eq!(u.trust_state, TrustState::Candidate);
    }

    #[test]
    fn promotion_requires_reviewer() {
        let mut u = candidate();
        assert!(promote(&mut u, &Review::by("  ").with_confidence(0.9), 0.8).is_err());
    }

    #[test]
    fn promote_then_demote_restores_tags() {
        let mut u = candidate();
        promote(&mut u, &Review::by("ann").with_confidence(0.9), 0.8).unwrap();
        assert!(u.is_certified());
        assert_eq!(u.review_tags().count(), 0);
        assert_eq!(u.provenance.reviewer.as_deref(), Some("ann"));
        u.check_invariants(0.8).unwrap();

        demote(&mut u, &Review::by("bob")).unwrap();
        assert_eq!(u.trust_state, TrustState::Candidate);
        assert!(u.has_tag(TAG_CANDIDATE) && u.has_tag(TAG_GENERATED));
    }

    #[test]
    fn edit_keeps_review_tags_and_reports_hash_change() {
        let mut u = candidate();
        let changed = edit(
            &mut u,
            &UnitEdit {
                tags: Some(["engines".to_string()].into()),
                ..Default::default()
            },
            0.8,
        )
        .unwrap();
        assert!(changed);
        assert!(u.has_tag("engines") && u.has_tag(TAG_CANDIDATE));
    }

    #[test]
    fn edit_cannot_drop_certified_below_threshold() {
        let mut u = candidate();
        promote(&mut u, &Review::by("ann").with_confidence(0.9), 0.8).unwrap();
        let changes = UnitEdit {
            confidence: Some(0.3),
            ..Default::default()
        };
        assert!(edit(&mut u, &changes, 0.8).is_err());
    }

    #[test]
    fn generated_name_is_bounded() {
        let answer = GeneratedAnswer {
            domain: "diy".into(),
            query: "x".repeat(300),
            text: "answer".into(),
            model_id: "m".into(),
            claimed_confidence: None,
            generated_at: Utc::now(),
        };
        let unit = candidate_from_answer(&answer, 0.5);
        assert_eq!(unit.name.chars().count(), GENERATED_NAME_MAX_CHARS);
        assert_eq!(unit.origin, Origin::Generated);
    }
}
