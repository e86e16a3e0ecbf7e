//! # tacit-retrieval
//!
//! The knowledge base: owns units per domain, keeps their vectors current,
//! and runs hybrid search combining cosine similarity with normalized token
//! overlap.

pub mod engine;
pub mod lexical;
pub mod semantic;

pub use engine::{IndexReport, KnowledgeBase, SearchRequest};
