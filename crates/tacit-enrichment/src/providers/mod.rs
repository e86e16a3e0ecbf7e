//! Remote collaborators reachable over HTTP.

mod chat_completions;
mod document_search;

pub use chat_completions::ChatCompletionsProvider;
pub use document_search::HttpDocumentSearch;

use std::sync::Arc;

use tacit_core::config::GenerationConfig;
use tacit_core::errors::TacitResult;

use crate::registry::ProviderRegistry;

/// Registry holding every provider declared in configuration.
pub fn registry_from_config(config: &GenerationConfig) -> TacitResult<ProviderRegistry> {
    let mut registry = ProviderRegistry::new();
    for endpoint in &config.providers {
        registry.register_generation(Arc::new(ChatCompletionsProvider::new(
            endpoint,
            &config.model,
        )?));
    }
    for endpoint in &config.document_search {
        registry.register_documents(Arc::new(HttpDocumentSearch::new(endpoint)?));
    }
    Ok(registry)
}

fn bearer(api_key_env: Option<&str>) -> Option<String> {
    api_key_env.and_then(|var| std::env::var(var).ok())
}

fn client_error(provider: &str, e: reqwest::Error) -> tacit_core::TacitError {
    tacit_core::errors::ConfigError::Parse {
        reason: format!("http client for {provider}: {e}"),
    }
    .into()
}
