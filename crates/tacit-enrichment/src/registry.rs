//! Named external collaborators referenced by enricher descriptors.

use std::collections::HashMap;
use std::sync::Arc;

use tacit_core::errors::{TacitError, TacitResult};
use tacit_core::traits::{IDocumentSearchProvider, IGenerationProvider};

#[derive(Default, Clone)]
pub struct ProviderRegistry {
    generation: HashMap<String, Arc<dyn IGenerationProvider>>,
    documents: HashMap<String, Arc<dyn IDocumentSearchProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register under the provider's own name. Replaces any previous entry.
    pub fn register_generation(&mut self, provider: Arc<dyn IGenerationProvider>) {
        self.generation.insert(provider.name().to_string(), provider);
    }

    pub fn register_documents(&mut self, provider: Arc<dyn IDocumentSearchProvider>) {
        self.documents.insert(provider.name().to_string(), provider);
    }

    /// Take every provider from `other`; its entries win on name clashes.
    pub fn merge(&mut self, other: ProviderRegistry) {
        self.generation.extend(other.generation);
        self.documents.extend(other.documents);
    }

    pub fn generation(&self, name: &str) -> TacitResult<Arc<dyn IGenerationProvider>> {
        self.generation
            .get(name)
            .cloned()
            .ok_or_else(|| TacitError::validation(format!("unknown generation provider: {name}")))
    }

    pub fn documents(&self, name: &str) -> TacitResult<Arc<dyn IDocumentSearchProvider>> {
        self.documents.get(name).cloned().ok_or_else(|| {
            TacitError::validation(format!("unknown document search provider: {name}"))
        })
    }

    pub fn generation_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.generation.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("generation", &self.generation_names())
            .field("documents", &self.documents.keys().collect::<Vec<_>>())
            .finish()
    }
}
