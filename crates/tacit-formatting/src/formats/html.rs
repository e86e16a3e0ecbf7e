//! HTML fragment output format.

use tacit_core::models::QueryResult;

use super::{answer_text, shown};

pub struct HtmlFormatter;

impl HtmlFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format(&self, result: &QueryResult, max_units: usize) -> String {
        let mut html = String::new();
        html.push_str(&format!(
            "<article class=\"answer\" data-domain=\"{}\" data-confidence=\"{:.2}\">\n",
            escape_html(&result.domain),
            result.confidence
        ));
        html.push_str(&format!("  <h2>{}</h2>\n", escape_html(&result.query)));
        html.push_str(&format!("  <p>{}</p>\n", escape_html(answer_text(result))));
        if let Some(generation) = &result.generation {
            html.push_str(&format!(
                "  <p class=\"generated\">Generated by {}</p>\n",
                escape_html(&generation.provider)
            ));
        }

        let units = shown(result, max_units);
        if !units.is_empty() {
            html.push_str("  <ul class=\"sources\">\n");
            for m in units {
                html.push_str(&format!(
                    "    <li class=\"{}\" data-score=\"{:.2}\">{}</li>\n",
                    m.unit.trust_state.as_str(),
                    m.score,
                    escape_html(&m.unit.name)
                ));
            }
            html.push_str("  </ul>\n");
        }
        if !result.references.is_empty() {
            html.push_str("  <ul class=\"references\">\n");
            for r in &result.references {
                html.push_str(&format!(
                    "    <li><a href=\"{}\">{}</a></li>\n",
                    escape_html(&r.url),
                    escape_html(&r.title)
                ));
            }
            html.push_str("  </ul>\n");
        }
        html.push_str("</article>\n");
        html
    }
}

impl Default for HtmlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_is_escaped() {
        let r = QueryResult::from_matches("<b>nails</b> & screws?", "diy", vec![], vec![], 0.0);
        let html = HtmlFormatter::new().format(&r, 3);
        assert!(html.contains("<h2>&lt;b&gt;nails&lt;/b&gt; &amp; screws?</h2>"));
        assert!(html.contains("<p>No answer found.</p>"));
        assert!(!html.contains("class=\"sources\""));
    }
}
