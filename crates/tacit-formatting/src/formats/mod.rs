//! Output formats: HTML, Markdown, chat envelope, digest.

pub mod chat;
pub mod digest;
pub mod html;
pub mod markdown;

pub use chat::ChatFormatter;
pub use digest::DigestFormatter;
pub use html::HtmlFormatter;
pub use markdown::MarkdownFormatter;

use tacit_core::models::{QueryResult, ScoredUnit};

/// Shown in place of an empty answer.
pub(crate) const NO_ANSWER: &str = "No answer found.";

/// Supporting units to display, capped at `max_units`.
pub(crate) fn shown(result: &QueryResult, max_units: usize) -> &[ScoredUnit] {
    &result.matched[..result.matched.len().min(max_units)]
}

pub(crate) fn answer_text(result: &QueryResult) -> &str {
    let answer = result.answer.trim();
    if answer.is_empty() {
        NO_ANSWER
    } else {
        answer
    }
}
