use serde::{Deserialize, Serialize};

use super::{ConfigError, EmbeddingError, ProviderError, StorageError};

/// Top-level error type for the Tacit pipeline.
#[derive(Debug, thiserror::Error)]
pub enum TacitError {
    #[error("validation failed: {reason}")]
    Validation { reason: String },

    #[error("domain not found: {domain}")]
    DomainNotFound { domain: String },

    #[error("knowledge unit not found: {id}")]
    UnitNotFound { id: String },

    #[error("degraded search: {component} unavailable, using {fallback}")]
    DegradedSearch { component: String, fallback: String },

    #[error("concurrent write conflict on unit {unit_id}")]
    ConcurrencyConflict { unit_id: String },

    #[error("domain {domain} is halted: {cause}")]
    DomainHalted { domain: String, cause: String },

    #[error("stage {stage} violated its contract: {reason}")]
    StageContract { stage: String, reason: String },

    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("background task failed: {reason}")]
    TaskFailed { reason: String },
}

/// Stable classification attached to query traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    DegradedSearch,
    ProviderTimeout,
    ProviderFailure,
    ConcurrencyConflict,
    DomainHalted,
    StageContract,
    DimensionMismatch,
    Embedding,
    Storage,
    Config,
    Serialization,
    Internal,
}

impl TacitError {
    /// Shorthand for a validation error.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Classify this error for traces and metrics.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::DomainNotFound { .. } | Self::UnitNotFound { .. } => ErrorKind::NotFound,
            Self::DegradedSearch { .. } => ErrorKind::DegradedSearch,
            Self::ConcurrencyConflict { .. } => ErrorKind::ConcurrencyConflict,
            Self::DomainHalted { .. } => ErrorKind::DomainHalted,
            Self::StageContract { .. } => ErrorKind::StageContract,
            Self::Embedding(EmbeddingError::DimensionMismatch { .. }) => {
                ErrorKind::DimensionMismatch
            }
            Self::Embedding(_) => ErrorKind::Embedding,
            Self::Provider(ProviderError::Timeout { .. } | ProviderError::Cancelled { .. }) => {
                ErrorKind::ProviderTimeout
            }
            Self::Provider(ProviderError::Failure { .. }) => ErrorKind::ProviderFailure,
            Self::Storage(_) => ErrorKind::Storage,
            Self::Config(_) => ErrorKind::Config,
            Self::Serialization(_) => ErrorKind::Serialization,
            Self::TaskFailed { .. } => ErrorKind::Internal,
        }
    }

    /// Recoverable errors degrade the current query only.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::DegradedSearch { .. }
                | Self::ConcurrencyConflict { .. }
                | Self::StageContract { .. }
                | Self::Provider(_)
                | Self::Embedding(
                    EmbeddingError::ProviderUnavailable { .. }
                        | EmbeddingError::InferenceFailed { .. }
                )
        )
    }

    /// Fatal errors halt the affected domain until it is re-registered.
    pub fn is_fatal_for_domain(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::Embedding(EmbeddingError::DimensionMismatch { .. })
        )
    }
}
