//! Per-domain pipeline descriptor.
//!
//! Descriptors carry names, not behavior. The pipeline resolves every name
//! through a lookup table when the domain is registered, so an unknown
//! policy or stage kind fails at load time rather than mid-query.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::errors::{ConfigError, TacitError, TacitResult};
use crate::models::SearchWeights;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterDescriptor {
    /// Routing policy name (`confidence`, `multi`, `parallel`, `sequential`).
    pub policy: String,
    /// Minimum specialist score for selection, in [0,1].
    pub threshold: f64,
    /// Specialist used when no score reaches `threshold`.
    pub fallback_specialist: Option<String>,
}

impl Default for RouterDescriptor {
    fn default() -> Self {
        Self {
            policy: "confidence".to_string(),
            threshold: 0.3,
            fallback_specialist: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchDescriptor {
    pub weights: SearchWeights,
    pub limit: usize,
    pub min_score: f64,
}

impl Default for SearchDescriptor {
    fn default() -> Self {
        Self {
            weights: SearchWeights::default(),
            limit: defaults::DEFAULT_SEARCH_LIMIT,
            min_score: defaults::DEFAULT_MIN_SCORE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialistDescriptor {
    pub id: String,
    #[serde(default = "default_specialist_kind")]
    pub kind: String,
    /// Terms this specialist recognises in a query.
    #[serde(default)]
    pub vocabulary: BTreeSet<String>,
    /// Tags a unit must carry (any of) to be considered by this specialist.
    /// Empty means every unit.
    #[serde(default)]
    pub categories: BTreeSet<String>,
    /// Minimum unit score this specialist keeps.
    #[serde(default)]
    pub threshold: f64,
}

fn default_specialist_kind() -> String {
    "hybrid".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnricherDescriptor {
    /// Stage kind, e.g. `citations`, `generation_fallback`.
    pub kind: String,
    pub min_confidence: Option<f64>,
    pub confidence_ceiling: Option<f64>,
    pub timeout_ms: Option<u64>,
    /// Provider name for stages that call out.
    pub provider: Option<String>,
    pub model: Option<String>,
    pub max_context_units: Option<usize>,
}

impl EnricherDescriptor {
    pub fn of_kind(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            min_confidence: None,
            confidence_ceiling: None,
            timeout_ms: None,
            provider: None,
            model: None,
            max_context_units: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterDescriptor {
    pub format: String,
    /// Upper bound on units rendered into the output.
    pub max_units: usize,
}

impl Default for FormatterDescriptor {
    fn default() -> Self {
        Self {
            format: defaults::DEFAULT_FORMAT.to_string(),
            max_units: defaults::DEFAULT_MAX_RENDERED_UNITS,
        }
    }
}

/// Everything the pipeline needs to serve one domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub router: RouterDescriptor,
    #[serde(default)]
    pub search: SearchDescriptor,
    #[serde(default)]
    pub specialists: Vec<SpecialistDescriptor>,
    #[serde(default)]
    pub enrichers: Vec<EnricherDescriptor>,
    #[serde(default)]
    pub formatter: FormatterDescriptor,
    /// Route every query straight to generation, no local search.
    #[serde(default)]
    pub pure_generation: bool,
    /// Tags units in this domain may use. Empty allows any tag.
    #[serde(default)]
    pub tag_vocabulary: BTreeSet<String>,
}

impl DomainConfig {
    /// Minimal domain with one hybrid specialist and no enrichers.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            specialists: vec![SpecialistDescriptor {
                id: format!("{name}-general"),
                kind: default_specialist_kind(),
                vocabulary: BTreeSet::new(),
                categories: BTreeSet::new(),
                threshold: 0.0,
            }],
            name,
            description: String::new(),
            router: RouterDescriptor::default(),
            search: SearchDescriptor::default(),
            enrichers: Vec::new(),
            formatter: FormatterDescriptor::default(),
            pure_generation: false,
            tag_vocabulary: BTreeSet::new(),
        }
    }

    pub fn from_toml(toml_str: &str) -> TacitResult<Self> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> TacitResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&text)
    }

    /// Numeric and structural checks. Name resolution happens at registration.
    pub fn validate(&self) -> TacitResult<()> {
        if self.name.trim().is_empty() {
            return Err(TacitError::validation("domain name must not be empty"));
        }
        if !(0.0..=1.0).contains(&self.router.threshold) {
            return Err(TacitError::validation(format!(
                "router threshold {} outside [0,1]",
                self.router.threshold
            )));
        }
        let w = self.search.weights;
        if w.semantic < 0.0 || w.lexical < 0.0 || w.semantic + w.lexical <= 0.0 {
            return Err(TacitError::validation(
                "search weights must be non-negative and not both zero",
            ));
        }
        if self.search.limit == 0 {
            return Err(TacitError::validation("search limit must be positive"));
        }
        if !self.pure_generation && self.specialists.is_empty() {
            return Err(TacitError::validation(format!(
                "domain {} has no specialists",
                self.name
            )));
        }
        let mut seen = BTreeSet::new();
        for s in &self.specialists {
            if !seen.insert(s.id.as_str()) {
                return Err(TacitError::validation(format!(
                    "duplicate specialist id: {}",
                    s.id
                )));
            }
            if !(0.0..=1.0).contains(&s.threshold) {
                return Err(TacitError::validation(format!(
                    "specialist {} threshold outside [0,1]",
                    s.id
                )));
            }
        }
        if let Some(fallback) = &self.router.fallback_specialist {
            if !seen.contains(fallback.as_str()) {
                return Err(TacitError::validation(format!(
                    "fallback specialist {fallback} is not declared"
                )));
            }
        }
        for e in &self.enrichers {
            for (label, v) in [
                ("min_confidence", e.min_confidence),
                ("confidence_ceiling", e.confidence_ceiling),
            ] {
                if let Some(v) = v {
                    if !(0.0..=1.0).contains(&v) {
                        return Err(ConfigError::MalformedStage {
                            stage: e.kind.clone(),
                            reason: format!("{label} {v} outside [0,1]"),
                        }
                        .into());
                    }
                }
            }
            if e.timeout_ms == Some(0) {
                return Err(ConfigError::MalformedStage {
                    stage: e.kind.clone(),
                    reason: "timeout_ms must be positive".to_string(),
                }
                .into());
            }
        }
        if self.formatter.max_units == 0 {
            return Err(TacitError::validation("formatter max_units must be positive"));
        }
        Ok(())
    }

    /// Whether `tag` is allowed by this domain's vocabulary.
    pub fn allows_tag(&self, tag: &str) -> bool {
        self.tag_vocabulary.is_empty()
            || self.tag_vocabulary.contains(tag)
            || tag == crate::constants::TAG_CANDIDATE
            || tag == crate::constants::TAG_GENERATED
    }
}
