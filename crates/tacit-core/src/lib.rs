//! # tacit-core
//!
//! Foundation crate for the Tacit knowledge pipeline.
//! Defines knowledge units, query/trace models, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod knowledge;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::{DomainConfig, TacitConfig};
pub use errors::{ErrorKind, TacitError, TacitResult};
pub use knowledge::{Confidence, KnowledgeUnit, Origin, Provenance, TrustState};
