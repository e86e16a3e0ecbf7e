//! # tacit-pipeline
//!
//! Resolves domain descriptors into ready-to-run pipelines and drives each
//! query through search, routing, enrichment, usage accounting, and
//! formatting.

pub mod context;
pub mod domain;
pub mod engine;
pub mod orchestrator;

pub use context::QueryContext;
pub use domain::{DomainPipeline, DomainRegistry};
pub use engine::Tacit;
pub use orchestrator::QueryOrchestrator;
