use crate::errors::TacitResult;
use crate::knowledge::{KnowledgeUnit, StoredEmbedding, TrustState};

/// Pattern storage plus the parallel vector store, keyed by unit id.
pub trait IKnowledgeStorage: Send + Sync {
    // --- Units ---
    fn create(&self, unit: &KnowledgeUnit) -> TacitResult<()>;
    fn get(&self, id: &str) -> TacitResult<Option<KnowledgeUnit>>;
    /// Optimistic update: succeeds only if the stored version equals
    /// `unit.version`. Returns the new version.
    fn update(&self, unit: &KnowledgeUnit) -> TacitResult<u64>;
    fn delete(&self, id: &str) -> TacitResult<()>;

    // --- Query ---
    fn list_by_domain(&self, domain: &str) -> TacitResult<Vec<KnowledgeUnit>>;
    fn list_by_trust_state(
        &self,
        domain: &str,
        state: TrustState,
    ) -> TacitResult<Vec<KnowledgeUnit>>;
    fn find_by_content_hash(
        &self,
        domain: &str,
        content_hash: &str,
    ) -> TacitResult<Option<KnowledgeUnit>>;
    fn count_by_domain(&self, domain: &str) -> TacitResult<usize>;

    // --- Usage ---
    /// Atomically increment the usage count. Returns the new count.
    fn increment_usage(&self, id: &str) -> TacitResult<u64>;

    // --- Vectors ---
    fn store_embedding(&self, embedding: &StoredEmbedding) -> TacitResult<()>;
    fn get_embedding(&self, unit_id: &str) -> TacitResult<Option<StoredEmbedding>>;
    fn embeddings_for_domain(&self, domain: &str) -> TacitResult<Vec<StoredEmbedding>>;
    fn delete_embedding(&self, unit_id: &str) -> TacitResult<()>;
}
