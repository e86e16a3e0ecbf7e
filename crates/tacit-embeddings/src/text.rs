//! Encoding text assembly under a token budget.
//!
//! A unit is encoded from `name`, `problem`, `solution`, `description`, the
//! origin query, and its non-review tags. When the assembled text exceeds the
//! budget, secondary fields are dropped one at a time in [`DROP_ORDER`] until
//! it fits. Name and solution are never dropped, even if they alone exceed
//! the budget.
//!
//! Units also get a second, question-only text (name and problem) so a query
//! phrased like the stored question is not diluted by the solution body.

use serde::{Deserialize, Serialize};
use tacit_core::constants::{TAG_CANDIDATE, TAG_GENERATED};
use tacit_core::KnowledgeUnit;

use crate::tokens::TokenCounter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingField {
    Description,
    Problem,
    Origin,
    Tags,
}

/// Fixed drop priority, first dropped first.
pub const DROP_ORDER: [EncodingField; 4] = [
    EncodingField::Description,
    EncodingField::Problem,
    EncodingField::Origin,
    EncodingField::Tags,
];

/// Text handed to the encoder for one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedText {
    pub text: String,
    pub tokens: usize,
    /// Fields removed to fit the budget, in drop order.
    pub dropped: Vec<EncodingField>,
}

impl EncodedText {
    pub fn truncated(&self) -> bool {
        !self.dropped.is_empty()
    }
}

fn assemble(unit: &KnowledgeUnit, dropped: &[EncodingField]) -> String {
    let keep = |f: EncodingField| !dropped.contains(&f);
    let mut parts: Vec<String> = Vec::with_capacity(6);

    parts.push(unit.name.trim().to_string());
    if keep(EncodingField::Problem) && !unit.problem.trim().is_empty() {
        parts.push(unit.problem.trim().to_string());
    }
    parts.push(unit.solution.trim().to_string());
    if keep(EncodingField::Description) && !unit.description.trim().is_empty() {
        parts.push(unit.description.trim().to_string());
    }
    if keep(EncodingField::Origin) {
        if let Some(origin) = unit.provenance.origin_query.as_deref() {
            if !origin.trim().is_empty() {
                parts.push(origin.trim().to_string());
            }
        }
    }
    if keep(EncodingField::Tags) {
        let tags: Vec<&str> = unit
            .tags
            .iter()
            .map(String::as_str)
            .filter(|t| *t != TAG_CANDIDATE && *t != TAG_GENERATED)
            .collect();
        if !tags.is_empty() {
            parts.push(format!("tags: {}", tags.join(" ")));
        }
    }
    parts.retain(|p| !p.is_empty());
    parts.join("\n")
}

/// Build the encoding text for `unit` within `budget` tokens.
///
/// Identical input always yields byte-identical output.
pub fn encoding_text(unit: &KnowledgeUnit, counter: &TokenCounter, budget: usize) -> EncodedText {
    let mut dropped = Vec::new();
    let mut text = assemble(unit, &dropped);
    let mut tokens = counter.count(&text);

    for field in DROP_ORDER {
        if tokens <= budget {
            break;
        }
        dropped.push(field);
        let next = assemble(unit, &dropped);
        if next == text {
            // Field was empty; nothing removed.
            dropped.pop();
            continue;
        }
        text = next;
        tokens = counter.count(&text);
    }

    EncodedText {
        text,
        tokens,
        dropped,
    }
}

/// The question a unit answers: its name, plus the problem statement when it
/// says something different and still fits `budget`.
pub fn question_text(unit: &KnowledgeUnit, counter: &TokenCounter, budget: usize) -> String {
    let name = unit.name.trim();
    let problem = unit.problem.trim();
    if problem.is_empty() || problem.eq_ignore_ascii_case(name) {
        return name.to_string();
    }
    let both = format!("{name}\n{problem}");
    if counter.count(&both) <= budget {
        both
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> KnowledgeUnit {
        let mut u = KnowledgeUnit::new_candidate(
            "u1",
            "diy",
            "Hang a shelf",
            "The wall is drywall and the shelf keeps sagging",
            "Use wall anchors rated for the load",
        );
        u.description = "Long background on drywall construction and anchor types".into();
        u.tags.insert("carpentry".into());
        u
    }

    #[test]
    fn fits_without_dropping() {
        let enc = encoding_text(&unit(), &TokenCounter::whitespace(), 1_000);
        assert!(!enc.truncated());
        assert!(enc.text.contains("drywall construction"));
        assert!(enc.text.contains("tags: carpentry"));
        assert!(!enc.text.contains("candidate"));
    }

    #[test]
    fn drops_description_first() {
        let counter = TokenCounter::whitespace();
        let full = encoding_text(&unit(), &counter, 1_000).tokens;
        let enc = encoding_text(&unit(), &counter, full - 1);
        assert_eq!(enc.dropped, vec![EncodingField::Description]);
        assert!(enc.text.contains("sagging"));
    }

    #[test]
    fn always_keeps_name_and_solution() {
        let enc = encoding_text(&unit(), &TokenCounter::whitespace(), 1);
        assert_eq!(enc.dropped, vec![EncodingField::Description, EncodingField::Problem, EncodingField::Tags]);
        assert_eq!(enc.text, "Hang a shelf\nUse wall anchors rated for the load");
    }

    #[test]
    fn question_text_skips_a_repeated_problem() {
        let counter = TokenCounter::whitespace();
        let mut u = unit();
        assert_eq!(
            question_text(&u, &counter, 1_000),
            "Hang a shelf\nThe wall is drywall and the shelf keeps sagging"
        );
        assert_eq!(question_text(&u, &counter, 3), "Hang a shelf");
        u.problem = "hang a SHELF".into();
        assert_eq!(question_text(&u, &counter, 1_000), "Hang a shelf");
    }
}
