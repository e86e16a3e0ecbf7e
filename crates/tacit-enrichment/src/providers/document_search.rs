//! Document search over a JSON endpoint.
//!
//! `GET {endpoint}?q=<query>&limit=<n>` returning
//! `[{"title": .., "url": .., "snippet": ..}]`.

use async_trait::async_trait;
use tacit_core::config::ProviderEndpoint;
use tacit_core::errors::{ProviderError, TacitResult};
use tacit_core::models::DocumentReference;
use tacit_core::traits::IDocumentSearchProvider;

pub struct HttpDocumentSearch {
    name: String,
    url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpDocumentSearch {
    pub fn new(endpoint: &ProviderEndpoint) -> TacitResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| super::client_error(&endpoint.name, e))?;
        Ok(Self {
            name: endpoint.name.clone(),
            url: endpoint.endpoint.clone(),
            api_key: super::bearer(endpoint.api_key_env.as_deref()),
            client,
        })
    }
}

#[async_trait]
impl IDocumentSearchProvider for HttpDocumentSearch {
    async fn search(&self, query: &str, limit: usize) -> TacitResult<Vec<DocumentReference>> {
        let failure = |reason: String| ProviderError::Failure {
            provider: self.name.clone(),
            reason,
        };
        let limit = limit.to_string();
        let mut call = self
            .client
            .get(&self.url)
            .query(&[("q", query), ("limit", limit.as_str())]);
        if let Some(key) = &self.api_key {
            call = call.bearer_auth(key);
        }
        let response = call
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| failure(e.to_string()))?;
        let references: Vec<DocumentReference> = response
            .json()
            .await
            .map_err(|e| failure(format!("unparseable response: {e}")))?;
        Ok(references)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
