//! # tacit-embeddings
//!
//! Embedding encoder for knowledge units and queries.
//!
//! Providers are tried in order through a [`DegradationChain`]; the local
//! hashed TF-IDF encoder is appended as a last resort unless disabled.
//! Unit text is assembled under a token budget by [`text::encoding_text`],
//! dropping secondary fields deterministically when it does not fit.

pub mod cache;
pub mod degradation;
pub mod engine;
pub mod providers;
pub mod text;
pub mod tokens;

pub use degradation::DegradationChain;
pub use engine::{EmbeddingEngine, QueryEncoding, UnitEncoding};
pub use providers::{HttpEmbeddingProvider, TfIdfEncoder};
pub use text::{EncodedText, EncodingField};
pub use tokens::TokenCounter;
