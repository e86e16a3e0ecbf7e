//! Embedding providers and construction from configuration.

mod http_provider;
mod tfidf;

pub use http_provider::HttpEmbeddingProvider;
pub use tfidf::TfIdfEncoder;

use tacit_core::config::EmbeddingConfig;
use tacit_core::errors::{ConfigError, TacitResult};
use tacit_core::traits::IEmbeddingProvider;

/// Build the primary provider named by `config.provider`.
pub fn create_provider(config: &EmbeddingConfig) -> TacitResult<Box<dyn IEmbeddingProvider>> {
    match config.provider.as_str() {
        "tfidf" | "local" => Ok(Box::new(TfIdfEncoder::new(config.dimensions))),
        "http" | "remote" => Ok(Box::new(HttpEmbeddingProvider::from_config(config)?)),
        other => Err(ConfigError::Parse {
            reason: format!("unknown embedding provider: {other}"),
        }
        .into()),
    }
}
