pub mod confidence;
pub mod embedding;
pub mod unit;

pub use confidence::Confidence;
pub use embedding::StoredEmbedding;
pub use unit::{KnowledgeUnit, Origin, Provenance, TrustState};
