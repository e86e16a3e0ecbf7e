//! Enhance-stage contract: output must extend input, never rewrite it.

use tacit_core::errors::{TacitError, TacitResult};
use tacit_core::models::QueryResult;

fn extends<T: PartialEq>(before: &[T], after: &[T]) -> bool {
    after.len() >= before.len() && after[..before.len()] == *before
}

/// Check that `after` only adds to `before`.
pub fn check_enhance(stage: &str, before: &QueryResult, after: &QueryResult) -> TacitResult<()> {
    let violation = |reason: &str| {
        Err(TacitError::StageContract {
            stage: stage.to_string(),
            reason: reason.to_string(),
        })
    };
    if after.answer != before.answer {
        return violation("answer was rewritten");
    }
    if after.confidence != before.confidence {
        return violation("confidence was changed");
    }
    let ids = |r: &QueryResult| -> Vec<(String, f64)> {
        r.matched.iter().map(|m| (m.unit.id.clone(), m.score)).collect()
    };
    if ids(after) != ids(before) {
        return violation("matched units were altered");
    }
    if after.generation != before.generation {
        return violation("generation record was altered");
    }
    if !extends(&before.citations, &after.citations) {
        return violation("citations were removed or reordered");
    }
    if !extends(&before.annotations, &after.annotations) {
        return violation("annotations were removed or overwritten");
    }
    if !extends(&before.references, &after.references) {
        return violation("references were removed or reordered");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tacit_core::models::Annotation;

    fn result() -> QueryResult {
        QueryResult::from_matches("q", "diy", Vec::new(), Vec::new(), 0.4)
    }

    #[test]
    fn appending_is_allowed() {
        let before = result();
        let mut after = before.clone();
        after.annotations.push(Annotation {
            stage: "s".into(),
            key: "k".into(),
            value: serde_json::json!(1),
        });
        assert!(check_enhance("s", &before, &after).is_ok());
    }

    #[test]
    fn raising_confidence_is_a_violation() {
        let before = result();
        let mut after = before.clone();
        after.confidence = 0.9;
        let err = check_enhance("s", &before, &after).unwrap_err();
        assert!(err.is_recoverable());
    }
}
