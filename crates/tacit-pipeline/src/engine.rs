//! [`Tacit`]: the assembled engine, built from one `TacitConfig`.

use std::path::Path;
use std::sync::{Arc, Mutex};

use tacit_core::config::{DomainConfig, TacitConfig};
use tacit_core::errors::TacitResult;
use tacit_core::models::{QueryRequest, QueryResponse};
use tacit_embeddings::EmbeddingEngine;
use tacit_enrichment::providers::registry_from_config;
use tacit_enrichment::ProviderRegistry;
use tacit_lifecycle::LifecycleManager;
use tacit_observability::{tracing_setup, ObservabilityEngine};
use tacit_retrieval::{IndexReport, KnowledgeBase};
use tacit_storage::StorageEngine;
use tracing::info;

use crate::domain::{DomainPipeline, DomainRegistry};
use crate::orchestrator::QueryOrchestrator;

pub struct Tacit {
    config: TacitConfig,
    kb: Arc<KnowledgeBase>,
    lifecycle: Arc<LifecycleManager>,
    orchestrator: QueryOrchestrator,
}

impl Tacit {
    /// Open storage, build the encoder and the configured providers.
    pub fn open(config: TacitConfig) -> TacitResult<Self> {
        Self::with_providers(config, ProviderRegistry::new())
    }

    /// Like [`Tacit::open`], adding providers built by the host. They win
    /// over configured providers of the same name.
    pub fn with_providers(config: TacitConfig, extra: ProviderRegistry) -> TacitResult<Self> {
        config.validate()?;
        tracing_setup::init(&config.observability)?;

        let storage = Arc::new(StorageEngine::from_config(&config.storage)?);
        let encoder = Arc::new(EmbeddingEngine::new(config.embedding.clone())?);
        let kb = Arc::new(KnowledgeBase::new(storage, encoder));
        let lifecycle = Arc::new(LifecycleManager::new(kb.clone(), config.lifecycle.clone()));

        let mut providers = registry_from_config(&config.generation)?;
        providers.merge(extra);
        let domains = Arc::new(DomainRegistry::new(providers, config.generation.clone()));
        let observability = Arc::new(Mutex::new(ObservabilityEngine::new(&config.observability)));
        let orchestrator =
            QueryOrchestrator::new(kb.clone(), lifecycle.clone(), domains, observability);

        info!(
            db = %config.storage.db_path,
            encoder = kb.encoder().active_provider(),
            "tacit engine ready"
        );
        Ok(Self {
            config,
            kb,
            lifecycle,
            orchestrator,
        })
    }

    pub fn config(&self) -> &TacitConfig {
        &self.config
    }

    pub fn knowledge_base(&self) -> &Arc<KnowledgeBase> {
        &self.kb
    }

    pub fn lifecycle(&self) -> &Arc<LifecycleManager> {
        &self.lifecycle
    }

    pub fn orchestrator(&self) -> &QueryOrchestrator {
        &self.orchestrator
    }

    pub fn domains(&self) -> &Arc<DomainRegistry> {
        self.orchestrator.domains()
    }

    pub fn observability(&self) -> &Arc<Mutex<ObservabilityEngine>> {
        self.orchestrator.observability()
    }

    pub fn register_domain(&self, config: DomainConfig) -> TacitResult<Arc<DomainPipeline>> {
        self.domains().register(config)
    }

    pub fn register_domain_file(&self, path: &Path) -> TacitResult<Arc<DomainPipeline>> {
        self.domains().register_file(path)
    }

    /// Load pattern documents (JSON array or JSON Lines) into `domain`.
    pub fn import(&self, path: &Path, domain: &str) -> TacitResult<Vec<IndexReport>> {
        self.kb.import(path, domain)
    }

    pub async fn query(&self, request: QueryRequest) -> TacitResult<QueryResponse> {
        self.orchestrator.submit(request).await
    }
}
