//! Domain registration: descriptors resolved once, at load time.

use std::path::Path;
use std::sync::Arc;

use dashmap::DashMap;
use tacit_core::config::{DomainConfig, GenerationConfig};
use tacit_core::errors::{TacitError, TacitResult};
use tacit_enrichment::{EnrichMode, EnricherChain, ProviderRegistry};
use tacit_formatting::Formatter;
use tacit_observability::tracing_setup::events;
use tacit_routing::Router;
use tracing::info;

/// A domain's router, enricher chain, and formatter, ready to serve queries.
#[derive(Debug)]
pub struct DomainPipeline {
    config: DomainConfig,
    router: Router,
    chain: EnricherChain,
    formatter: Formatter,
}

impl DomainPipeline {
    /// Resolve every named variant. Unknown names fail here, never per query.
    pub fn resolve(
        config: DomainConfig,
        providers: &ProviderRegistry,
        defaults: &GenerationConfig,
    ) -> TacitResult<Self> {
        config.validate()?;
        let router = Router::from_config(&config)?;
        let chain = EnricherChain::from_descriptors(&config.enrichers, providers, defaults)?;
        let formatter = Formatter::from_descriptor(&config.formatter)?;
        if config.pure_generation && !chain.stages().iter().any(|s| s.mode() == EnrichMode::Replace) {
            return Err(TacitError::validation(format!(
                "pure generation domain {} declares no replace stage",
                config.name
            )));
        }
        Ok(Self {
            config,
            router,
            chain,
            formatter,
        })
    }

    pub fn config(&self) -> &DomainConfig {
        &self.config
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn chain(&self) -> &EnricherChain {
        &self.chain
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }
}

/// Registered domains plus the set currently halted by a fatal error.
#[derive(Debug)]
pub struct DomainRegistry {
    providers: ProviderRegistry,
    generation: GenerationConfig,
    domains: DashMap<String, Arc<DomainPipeline>>,
    halted: DashMap<String, String>,
}

impl DomainRegistry {
    pub fn new(providers: ProviderRegistry, generation: GenerationConfig) -> Self {
        Self {
            providers,
            generation,
            domains: DashMap::new(),
            halted: DashMap::new(),
        }
    }

    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }

    /// Register or replace a domain. Re-registering clears a halt.
    pub fn register(&self, config: DomainConfig) -> TacitResult<Arc<DomainPipeline>> {
        let pipeline = Arc::new(DomainPipeline::resolve(config, &self.providers, &self.generation)?);
        let name = pipeline.config().name.clone();
        info!(
            domain = %name,
            policy = pipeline.router().policy().as_str(),
            specialists = pipeline.router().specialists().len(),
            enrichers = pipeline.chain().stages().len(),
            format = pipeline.formatter().format().as_str(),
            "domain registered"
        );
        self.halted.remove(&name);
        self.domains.insert(name, pipeline.clone());
        Ok(pipeline)
    }

    pub fn register_toml(&self, toml_str: &str) -> TacitResult<Arc<DomainPipeline>> {
        self.register(DomainConfig::from_toml(toml_str)?)
    }

    pub fn register_file(&self, path: &Path) -> TacitResult<Arc<DomainPipeline>> {
        self.register(DomainConfig::from_file(path)?)
    }

    /// A live domain. Halted domains fail fast with their recorded cause.
    pub fn get(&self, name: &str) -> TacitResult<Arc<DomainPipeline>> {
        if let Some(cause) = self.halted.get(name) {
            return Err(TacitError::DomainHalted {
                domain: name.to_string(),
                cause: cause.value().clone(),
            });
        }
        self.domains
            .get(name)
            .map(|d| d.value().clone())
            .ok_or_else(|| TacitError::DomainNotFound {
                domain: name.to_string(),
            })
    }

    /// Stop serving `name` until it is registered again.
    pub fn halt(&self, name: &str, cause: impl Into<String>) {
        let cause = cause.into();
        events::domain_halted(name, &cause);
        self.halted.insert(name.to_string(), cause);
    }

    pub fn is_halted(&self, name: &str) -> bool {
        self.halted.contains_key(name)
    }

    pub fn remove(&self, name: &str) -> bool {
        self.halted.remove(name);
        self.domains.remove(name).is_some()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.domains.iter().map(|d| d.key().clone()).collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tacit_core::config::EnricherDescriptor;
    use tacit_core::ErrorKind;

    fn domain(name: &str) -> DomainConfig {
        DomainConfig::named(name)
    }

    fn registry() -> DomainRegistry {
        DomainRegistry::new(ProviderRegistry::new(), GenerationConfig::default())
    }

    #[test]
    fn unknown_names_fail_at_registration() {
        let reg = registry();
        let mut bad_policy = domain("a");
        bad_policy.router.policy = "round_robin".into();
        assert_eq!(reg.register(bad_policy).unwrap_err().kind(), ErrorKind::Validation);

        let mut bad_format = domain("b");
        bad_format.formatter.format = "pdf".into();
        assert_eq!(reg.register(bad_format).unwrap_err().kind(), ErrorKind::Validation);

        let mut bad_stage = domain("c");
        bad_stage.enrichers.push(EnricherDescriptor::of_kind("sentiment"));
        assert_eq!(reg.register(bad_stage).unwrap_err().kind(), ErrorKind::Validation);

        assert!(reg.names().is_empty());
    }

    #[test]
    fn pure_generation_requires_replace_stage() {
        let mut config = DomainConfig::named("assistant");
        config.specialists.clear();
        config.pure_generation = true;
        let err = registry().register(config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn halt_is_scoped_and_cleared_by_reregistration() {
        let reg = registry();
        reg.register(domain("diy")).unwrap();
        reg.register(domain("garden")).unwrap();

        reg.halt("diy", "embedding dimension mismatch");
        let err = reg.get("diy").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DomainHalted);
        assert!(err.to_string().contains("dimension mismatch"));
        assert!(reg.get("garden").is_ok());

        reg.register(domain("diy")).unwrap();
        assert!(!reg.is_halted("diy"));
        assert!(reg.get("diy").is_ok());
    }

    #[test]
    fn unknown_domain_is_not_found() {
        let err = registry().get("nowhere").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
