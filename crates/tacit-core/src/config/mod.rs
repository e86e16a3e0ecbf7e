//! Configuration: global engine settings plus per-domain descriptors.

pub mod defaults;
mod domain_config;
mod embedding_config;
mod generation_config;
mod lifecycle_config;
mod observability_config;
mod retrieval_config;
mod storage_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use domain_config::{
    DomainConfig, EnricherDescriptor, FormatterDescriptor, RouterDescriptor, SearchDescriptor,
    SpecialistDescriptor,
};
pub use embedding_config::EmbeddingConfig;
pub use generation_config::{GenerationConfig, ProviderEndpoint};
pub use lifecycle_config::LifecycleConfig;
pub use observability_config::ObservabilityConfig;
pub use retrieval_config::RetrievalConfig;
pub use storage_config::StorageConfig;

use crate::errors::{ConfigError, TacitError, TacitResult};

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TacitConfig {
    pub storage: StorageConfig,
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
    pub lifecycle: LifecycleConfig,
    pub generation: GenerationConfig,
    pub observability: ObservabilityConfig,
}

impl TacitConfig {
    /// Parse from a TOML string. Missing sections use defaults.
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

    pub fn validate(&self) -> TacitResult<()> {
        if self.embedding.dimensions == 0 {
            return Err(TacitError::validation("embedding dimensions must be positive"));
        }
        if self.embedding.token_budget == 0 {
            return Err(TacitError::validation("embedding token budget must be positive"));
        }
        let l = &self.lifecycle;
        for (label, v) in [
            ("certification_threshold", l.certification_threshold),
            ("candidate_confidence", l.candidate_confidence),
            ("dedup_similarity", l.dedup_similarity),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(TacitError::validation(format!("{label} {v} outside [0,1]")));
            }
        }
        if self.generation.timeout_ms == 0 {
            return Err(TacitError::validation("generation timeout must be positive"));
        }
        Ok(())
    }
}
