//! Near-duplicate detection for generated questions.

use std::collections::BTreeSet;

use tacit_retrieval::lexical;

/// Stable key for a question: hash of its sorted content tokens.
///
/// Case, punctuation, word order and stop words do not change the key.
pub fn question_key(question: &str) -> String {
    let tokens = lexical::content_tokens(question);
    let joined = tokens.into_iter().collect::<Vec<_>>().join(" ");
    blake3::hash(joined.as_bytes()).to_hex().to_string()
}

/// Jaccard similarity of two questions' content tokens.
pub fn similarity(a: &str, b: &str) -> f64 {
    jaccard(&lexical::content_tokens(a), &lexical::content_tokens(b))
}

fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Whether `candidate` asks effectively the same question as `query`.
pub fn is_duplicate(query: &str, candidate: &str, threshold: f64) -> bool {
    question_key(query) == question_key(candidate) || similarity(query, candidate) >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_ignores_case_punctuation_and_order() {
        assert_eq!(
            question_key("How do I tune a carburetor?"),
            question_key("tune carburetor, how")
        );
    }

    #[test]
    fn different_questions_are_not_duplicates() {
        assert!(!is_duplicate(
            "how do I tune a carburetor",
            "how do I replace a spark plug",
            0.9
        ));
    }

    #[test]
    fn similarity_of_empty_questions_is_zero() {
        assert_eq!(similarity("the", "a"), 0.0);
    }
}
