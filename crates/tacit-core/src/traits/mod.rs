mod document_search;
mod embedding;
mod generation;
mod storage;

pub use document_search::IDocumentSearchProvider;
pub use embedding::IEmbeddingProvider;
pub use generation::IGenerationProvider;
pub use storage::IKnowledgeStorage;
