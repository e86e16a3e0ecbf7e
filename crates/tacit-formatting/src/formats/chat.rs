//! Chat message envelope (JSON).

use serde::Serialize;
use tacit_core::models::QueryResult;

use super::{answer_text, shown};

pub struct ChatFormatter;

impl ChatFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format(&self, result: &QueryResult, max_units: usize) -> String {
        let message = ChatMessage {
            role: "assistant",
            content: answer_text(result),
            confidence: result.confidence,
            generated: result.generation_used(),
            sources: shown(result, max_units)
                .iter()
                .map(|m| ChatSource {
                    id: &m.unit.id,
                    name: &m.unit.name,
                    trust_state: m.unit.trust_state.as_str(),
                    score: m.score,
                })
                .collect(),
            links: result.references.iter().map(|r| r.url.as_str()).collect(),
        };
        serde_json::to_string(&message).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "chat envelope serialization failed");
            "{\"role\":\"assistant\",\"content\":\"\"}".to_string()
        })
    }
}

impl Default for ChatFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
    confidence: f64,
    generated: bool,
    sources: Vec<ChatSource<'a>>,
    links: Vec<&'a str>,
}

#[derive(Serialize)]
struct ChatSource<'a> {
    id: &'a str,
    name: &'a str,
    trust_state: &'static str,
    score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_is_valid_json() {
        let mut r = QueryResult::from_matches("hi", "assistant", vec![], vec![], 0.7);
        r.answer = "Hello \"there\"".into();
        let json: serde_json::Value =
            serde_json::from_str(&ChatFormatter::new().format(&r, 3)).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "Hello \"there\"");
        assert_eq!(json["sources"].as_array().unwrap().len(), 0);
    }
}
