//! In-memory embedding cache.

mod l1_memory;

pub use l1_memory::EmbeddingCache;
