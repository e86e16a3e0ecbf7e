//! # tacit-enrichment
//!
//! Ordered post-processing of a query result. Enhance stages only add,
//! fallback stages call a generation provider when local knowledge is weak,
//! and replace stages substitute generated content outright.

pub mod chain;
pub mod contract;
pub mod providers;
pub mod registry;
pub mod stages;

pub use chain::{ChainOutcome, EnricherChain, StageContext};
pub use registry::ProviderRegistry;
pub use stages::{EnrichMode, Enricher, EnricherKind, GenerationStage};
