//! Pattern document import.
//!
//! A domain's patterns are kept as a JSON array (`.json`) or one object per
//! line (`.jsonl`). Documents map onto [`KnowledgeUnit`]s; missing optional
//! fields take their defaults and the content hash is always recomputed.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tacit_core::errors::{StorageError, TacitResult};
use tacit_core::knowledge::{Confidence, KnowledgeUnit, Origin, Provenance, TrustState};

/// On-disk shape of one pattern record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternDocument {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    pub name: String,
    #[serde(default)]
    pub problem: String,
    pub solution: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub trust_state: Option<TrustState>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub origin: Option<Origin>,
    #[serde(default)]
    pub provenance: Provenance,
    #[serde(default)]
    pub usage_count: u64,
}

impl PatternDocument {
    /// Convert into a unit in `domain`. A document naming another domain is
    /// rejected.
    pub fn into_unit(self, domain: &str, location: &str) -> TacitResult<KnowledgeUnit> {
        if let Some(doc_domain) = &self.domain {
            if doc_domain != domain {
                return Err(StorageError::MalformedDocument {
                    location: location.to_string(),
                    reason: format!("document domain {doc_domain} does not match {domain}"),
                }
                .into());
            }
        }
        if self.name.trim().is_empty() || self.solution.trim().is_empty() {
            return Err(StorageError::MalformedDocument {
                location: location.to_string(),
                reason: "name and solution are required".to_string(),
            }
            .into());
        }

        let now = Utc::now();
        let mut unit = KnowledgeUnit {
            id: self
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            domain: domain.to_string(),
            name: self.name,
            problem: self.problem,
            solution: self.solution,
            description: self.description,
            tags: self.tags,
            trust_state: self.trust_state.unwrap_or(TrustState::Candidate),
            confidence: self.confidence.map(Confidence::new).unwrap_or_default(),
            origin: self.origin.unwrap_or(Origin::Authored),
            provenance: self.provenance,
            usage_count: self.usage_count,
            content_hash: String::new(),
            created_at: now,
            updated_at: now,
            version: 0,
        };
        if unit.trust_state == TrustState::Candidate {
            unit.tags.insert(tacit_core::constants::TAG_CANDIDATE.to_string());
        }
        unit.refresh_content_hash();
        Ok(unit)
    }
}

/// Parse documents from a string. JSON Lines when `lines` is set.
pub fn parse_documents(
    text: &str,
    lines: bool,
    domain: &str,
    source: &str,
) -> TacitResult<Vec<KnowledgeUnit>> {
    if lines {
        text.lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(n, line)| {
                let location = format!("{source}:{}", n + 1);
                let doc: PatternDocument =
                    serde_json::from_str(line).map_err(|e| StorageError::MalformedDocument {
                        location: location.clone(),
                        reason: e.to_string(),
                    })?;
                doc.into_unit(domain, &location)
            })
            .collect()
    } else {
        let docs: Vec<PatternDocument> =
            serde_json::from_str(text).map_err(|e| StorageError::MalformedDocument {
                location: source.to_string(),
                reason: e.to_string(),
            })?;
        docs.into_iter()
            .enumerate()
            .map(|(i, doc)| doc.into_unit(domain, &format!("{source}[{i}]")))
            .collect()
    }
}

/// Load documents from a `.json` or `.jsonl` file.
pub fn load_documents(path: &Path, domain: &str) -> TacitResult<Vec<KnowledgeUnit>> {
    let source = path.display().to_string();
    let text = std::fs::read_to_string(path).map_err(|e| StorageError::MalformedDocument {
        location: source.clone(),
        reason: e.to_string(),
    })?;
    let lines = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jsonl"));
    parse_documents(&text, lines, domain, &source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json_array() {
        let text = r#"[
            {"id": "a", "name": "Hammer a nail", "solution": "Tap, then drive", "tags": ["carpentry"]},
            {"id": "b", "name": "Build a shelf", "solution": "Use brackets", "trust_state": "certified",
             "confidence": 0.9, "provenance": {"reviewer": "ana"}}
        ]"#;
        let units = parse_documents(text, false, "diy", "mem").unwrap();
        assert_eq!(units.len(), 2);
        assert!(units[0].has_tag("candidate"));
        assert!(units[1].is_certified());
        assert!(!units[1].has_tag("candidate"));
        assert_eq!(units[1].content_hash, units[1].compute_content_hash());
    }

    #[test]
    fn jsonl_reports_line_of_bad_record() {
        let text = "{\"name\": \"ok\", \"solution\": \"fine\"}\n\n{\"name\": \"broken\"\n";
        let err = parse_documents(text, true, "diy", "pats.jsonl").unwrap_err();
        assert!(err.to_string().contains("pats.jsonl:3"));
    }

    #[test]
    fn rejects_foreign_domain() {
        let text = r#"[{"domain": "cooking", "name": "x", "solution": "y"}]"#;
        assert!(parse_documents(text, false, "diy", "mem").is_err());
    }
}
