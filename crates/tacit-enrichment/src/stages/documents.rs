use std::sync::Arc;
use std::time::Duration;

use tacit_core::errors::{ProviderError, TacitResult};
use tacit_core::models::QueryResult;
use tacit_core::traits::IDocumentSearchProvider;
use tokio_util::sync::CancellationToken;

/// Appends external document references found for the query.
#[derive(Clone)]
pub struct DocumentSearchStage {
    provider: Arc<dyn IDocumentSearchProvider>,
    limit: usize,
    timeout: Duration,
}

impl DocumentSearchStage {
    pub fn new(provider: Arc<dyn IDocumentSearchProvider>, limit: usize, timeout: Duration) -> Self {
        Self {
            provider,
            limit,
            timeout,
        }
    }

    pub async fn apply(
        &self,
        mut result: QueryResult,
        cancel: &CancellationToken,
    ) -> TacitResult<QueryResult> {
        let name = self.provider.name().to_string();
        let references = tokio::select! {
            _ = cancel.cancelled() => {
                return Err(ProviderError::Cancelled { provider: name }.into());
            }
            found = tokio::time::timeout(self.timeout, self.provider.search(&result.query, self.limit)) => {
                found.map_err(|_| ProviderError::Timeout {
                    provider: name,
                    timeout_ms: self.timeout.as_millis() as u64,
                })??
            }
        };
        let known: Vec<String> = result.references.iter().map(|r| r.url.clone()).collect();
        result.references.extend(
            references
                .into_iter()
                .filter(|r| !known.contains(&r.url))
                .take(self.limit),
        );
        Ok(result)
    }
}
