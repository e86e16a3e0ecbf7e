//! Single-line compact digest.

use tacit_core::models::QueryResult;

use super::{answer_text, shown};

/// Answer text beyond this many characters is cut with an ellipsis.
const MAX_ANSWER_CHARS: usize = 160;

pub struct DigestFormatter;

impl DigestFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format(&self, result: &QueryResult, max_units: usize) -> String {
        let flat = answer_text(result).split_whitespace().collect::<Vec<_>>().join(" ");
        let mut line: String = flat.chars().take(MAX_ANSWER_CHARS).collect();
        if flat.chars().count() > MAX_ANSWER_CHARS {
            line.push('…');
        }
        let ids: Vec<&str> = shown(result, max_units)
            .iter()
            .map(|m| m.unit.id.as_str())
            .collect();
        line.push_str(&format!(" [confidence {:.2}", result.confidence));
        if !ids.is_empty() {
            line.push_str(&format!("; units {}", ids.join(",")));
        }
        if result.generation_used() {
            line.push_str("; generated");
        }
        line.push(']');
        line
    }
}

impl Default for DigestFormatter {
    fn default() -> Self {
        Self::new()
    }
}
