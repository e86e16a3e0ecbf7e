use serde::{Deserialize, Serialize};

use super::trace::QueryTrace;
use crate::errors::{TacitError, TacitResult};

/// Output encodings supported by the formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Structured markup (HTML fragment).
    Html,
    /// Plain structured text (Markdown).
    Markdown,
    /// Chat message envelope (JSON).
    Chat,
    /// Single-line compact digest.
    Digest,
}

/// Name → format lookup table. Resolved once when configuration loads.
const FORMAT_TABLE: &[(&str, OutputFormat)] = &[
    ("html", OutputFormat::Html),
    ("markup", OutputFormat::Html),
    ("markdown", OutputFormat::Markdown),
    ("text", OutputFormat::Markdown),
    ("chat", OutputFormat::Chat),
    ("digest", OutputFormat::Digest),
    ("tldr", OutputFormat::Digest),
];

impl OutputFormat {
    pub fn from_name(name: &str) -> TacitResult<Self> {
        let needle = name.trim().to_ascii_lowercase();
        FORMAT_TABLE
            .iter()
            .find(|(n, _)| *n == needle)
            .map(|(_, f)| *f)
            .ok_or_else(|| TacitError::validation(format!("unknown output format: {name}")))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Markdown => "markdown",
            Self::Chat => "chat",
            Self::Digest => "digest",
        }
    }
}

/// Optional per-request flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryFlags {
    pub include_trace: bool,
    /// Skip the knowledge base search entirely.
    pub skip_local_search: bool,
    /// Override the domain's configured output format.
    pub format: Option<OutputFormat>,
}

/// A natural-language query against one domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub text: String,
    pub domain: String,
    #[serde(default)]
    pub flags: QueryFlags,
}

impl QueryRequest {
    pub fn new(domain: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            domain: domain.into(),
            flags: QueryFlags::default(),
        }
    }

    pub fn with_flags(mut self, flags: QueryFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// A unit id with the score it contributed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitScore {
    pub unit_id: String,
    pub score: f64,
}

/// Response to a query submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub query_id: String,
    pub answer: String,
    /// Answer rendered in the requested format.
    pub rendered: String,
    pub format: OutputFormat,
    pub confidence: f64,
    pub units: Vec<UnitScore>,
    pub processing_time_ms: u64,
    pub generation_used: bool,
    /// Candidate unit recorded for this query's generated answer.
    pub candidate_id: Option<String>,
    pub degraded: bool,
    pub trace: Option<QueryTrace>,
}
