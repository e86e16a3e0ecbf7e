//! Stage kinds, modes, and load-time resolution.

mod documents;
pub mod enhance;
mod generation;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tacit_core::config::{EnricherDescriptor, GenerationConfig};
use tacit_core::errors::{ConfigError, TacitError, TacitResult};
use tacit_core::traits::IDocumentSearchProvider;

pub use documents::DocumentSearchStage;
pub use generation::{GenerationOutput, GenerationStage};

use crate::registry::ProviderRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichMode {
    Enhance,
    Fallback,
    Replace,
}

impl EnrichMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Enhance => "enhance",
            Self::Fallback => "fallback",
            Self::Replace => "replace",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnricherKind {
    Citations,
    QualityScore,
    UsageStats,
    DocumentSearch,
    GenerationFallback,
    GenerationReplace,
}

const KIND_TABLE: &[(&str, EnricherKind)] = &[
    ("citations", EnricherKind::Citations),
    ("quality_score", EnricherKind::QualityScore),
    ("usage_stats", EnricherKind::UsageStats),
    ("document_search", EnricherKind::DocumentSearch),
    ("web_search", EnricherKind::DocumentSearch),
    ("generation_fallback", EnricherKind::GenerationFallback),
    ("fallback", EnricherKind::GenerationFallback),
    ("generation_replace", EnricherKind::GenerationReplace),
    ("replace", EnricherKind::GenerationReplace),
];

impl EnricherKind {
    pub fn from_name(name: &str) -> TacitResult<Self> {
        let needle = name.trim().to_ascii_lowercase().replace('-', "_");
        KIND_TABLE
            .iter()
            .find(|(n, _)| *n == needle)
            .map(|(_, k)| *k)
            .ok_or_else(|| TacitError::validation(format!("unknown enricher kind: {name}")))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Citations => "citations",
            Self::QualityScore => "quality_score",
            Self::UsageStats => "usage_stats",
            Self::DocumentSearch => "document_search",
            Self::GenerationFallback => "generation_fallback",
            Self::GenerationReplace => "generation_replace",
        }
    }

    pub fn mode(self) -> EnrichMode {
        match self {
            Self::Citations | Self::QualityScore | Self::UsageStats | Self::DocumentSearch => {
                EnrichMode::Enhance
            }
            Self::GenerationFallback => EnrichMode::Fallback,
            Self::GenerationReplace => EnrichMode::Replace,
        }
    }
}

/// A stage resolved from its descriptor, ready to run.
#[derive(Clone)]
pub enum Enricher {
    Citations,
    QualityScore,
    UsageStats,
    DocumentSearch(DocumentSearchStage),
    GenerationFallback(GenerationStage),
    GenerationReplace(GenerationStage),
}

impl std::fmt::Debug for Enricher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind().as_str())
    }
}

const DEFAULT_DOCUMENT_LIMIT: usize = 3;

impl Enricher {
    pub fn kind(&self) -> EnricherKind {
        match self {
            Self::Citations => EnricherKind::Citations,
            Self::QualityScore => EnricherKind::QualityScore,
            Self::UsageStats => EnricherKind::UsageStats,
            Self::DocumentSearch(_) => EnricherKind::DocumentSearch,
            Self::GenerationFallback(_) => EnricherKind::GenerationFallback,
            Self::GenerationReplace(_) => EnricherKind::GenerationReplace,
        }
    }

    pub fn mode(&self) -> EnrichMode {
        self.kind().mode()
    }

    /// Resolve a descriptor. Unknown kinds and providers fail here, at load.
    pub fn resolve(
        descriptor: &EnricherDescriptor,
        registry: &ProviderRegistry,
        defaults: &GenerationConfig,
    ) -> TacitResult<Self> {
        let kind = EnricherKind::from_name(&descriptor.kind)?;
        let timeout = Duration::from_millis(descriptor.timeout_ms.unwrap_or(defaults.timeout_ms));
        let provider_name = || {
            descriptor.provider.clone().ok_or_else(|| {
                TacitError::from(ConfigError::MalformedStage {
                    stage: kind.as_str().to_string(),
                    reason: "no provider configured".to_string(),
                })
            })
        };
        Ok(match kind {
            EnricherKind::Citations => Self::Citations,
            EnricherKind::QualityScore => Self::QualityScore,
            EnricherKind::UsageStats => Self::UsageStats,
            EnricherKind::DocumentSearch => {
                let provider: Arc<dyn IDocumentSearchProvider> =
                    registry.documents(&provider_name()?)?;
                Self::DocumentSearch(DocumentSearchStage::new(
                    provider,
                    descriptor.max_context_units.unwrap_or(DEFAULT_DOCUMENT_LIMIT),
                    timeout,
                ))
            }
            EnricherKind::GenerationFallback | EnricherKind::GenerationReplace => {
                let provider = registry.generation(&provider_name()?)?;
                let min_confidence = descriptor.min_confidence.unwrap_or(defaults.min_confidence);
                let ceiling = descriptor
                    .confidence_ceiling
                    .unwrap_or(defaults.confidence_ceiling);
                let stage = GenerationStage {
                    provider,
                    min_confidence,
                    ceiling,
                    timeout,
                    model: descriptor.model.clone().or_else(|| Some(defaults.model.clone())),
                    max_context_units: descriptor
                        .max_context_units
                        .unwrap_or(defaults.max_context_units),
                };
                if kind == EnricherKind::GenerationFallback {
                    Self::GenerationFallback(stage)
                } else {
                    Self::GenerationReplace(stage)
                }
            }
        })
    }
}
