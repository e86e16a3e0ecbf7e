//! Token overlap scoring.

use std::collections::BTreeSet;

use tacit_core::KnowledgeUnit;

const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "am", "an", "and", "any", "are", "as", "at", "be",
    "been", "but", "by", "can", "could", "did", "do", "does", "doing", "for", "from", "get",
    "had", "has", "have", "he", "her", "his", "how", "i", "if", "in", "into", "is", "it", "its",
    "just", "me", "my", "no", "not", "of", "on", "or", "our", "out", "she", "should", "so",
    "some", "than", "that", "the", "their", "them", "then", "there", "these", "they", "this",
    "to", "up", "us", "was", "we", "what", "when", "where", "which", "who", "why", "will",
    "with", "would", "you", "your",
];

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.binary_search(&token).is_ok()
}

/// Lower-cased content tokens with stop words removed.
pub fn content_tokens(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .filter(|t| !is_stop_word(t))
        .collect()
}

/// Tokens of every searchable field of a unit.
pub fn unit_tokens(unit: &KnowledgeUnit) -> BTreeSet<String> {
    let mut tokens = content_tokens(&unit.name);
    for field in [&unit.problem, &unit.solution, &unit.description] {
        tokens.extend(content_tokens(field));
    }
    for tag in &unit.tags {
        tokens.extend(content_tokens(tag));
    }
    tokens
}

/// |Q ∩ U| / |Q|. Zero when the query has no content tokens.
pub fn overlap(query: &BTreeSet<String>, unit: &BTreeSet<String>) -> f64 {
    if query.is_empty() {
        return 0.0;
    }
    let shared = query.intersection(unit).count();
    shared as f64 / query.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_words_are_sorted_for_binary_search() {
        assert!(STOP_WORDS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn tokens_drop_stop_words_and_punctuation() {
        let t = content_tokens("How do I hammer in a nail?");
        assert_eq!(
            t.into_iter().collect::<Vec<_>>(),
            vec!["hammer".to_string(), "nail".to_string()]
        );
    }

    #[test]
    fn overlap_is_fraction_of_query() {
        let q = content_tokens("hammer nail wall");
        let u = content_tokens("drive the nail with a hammer");
        assert!((overlap(&q, &u) - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(overlap(&content_tokens("the of"), &u), 0.0);
    }
}
