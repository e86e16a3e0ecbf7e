use async_trait::async_trait;

use crate::errors::TacitResult;
use crate::models::DocumentReference;

/// External document or web search, consumed by enhance stages.
#[async_trait]
pub trait IDocumentSearchProvider: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> TacitResult<Vec<DocumentReference>>;

    fn name(&self) -> &str;
}
