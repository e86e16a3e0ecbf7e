//! Markdown output format.

use tacit_core::models::QueryResult;

use super::{answer_text, shown};

pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format(&self, result: &QueryResult, max_units: usize) -> String {
        let mut md = String::new();
        md.push_str(&format!("## {}\n\n", escape_markdown_header(&result.query)));
        md.push_str(answer_text(result));
        md.push_str("\n\n");
        md.push_str(&format!("*Confidence: {:.2}*", result.confidence));
        if let Some(generation) = &result.generation {
            md.push_str(&format!(" *(generated by {})*", generation.provider));
        }
        md.push_str("\n\n");

        let units = shown(result, max_units);
        if !units.is_empty() {
            md.push_str("### Sources\n\n");
            for m in units {
                md.push_str(&format!(
                    "- **{}** ({}, {:.2}): {}\n",
                    escape_inline(&m.unit.name),
                    m.unit.trust_state.as_str(),
                    m.score,
                    escape_inline(&m.unit.problem)
                ));
            }
            md.push('\n');
        }

        if !result.references.is_empty() {
            md.push_str("### Further reading\n\n");
            for r in &result.references {
                md.push_str(&format!("- [{}]({})\n", escape_inline(&r.title), r.url));
            }
            md.push('\n');
        }
        md
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_markdown_header(s: &str) -> String {
    s.replace('#', "\\#").replace('\n', " ").replace('\r', "")
}

fn escape_inline(s: &str) -> String {
    s.replace('*', "\\*")
        .replace('[', "\\[")
        .replace(']', "\\]")
        .replace('\n', " ")
}
