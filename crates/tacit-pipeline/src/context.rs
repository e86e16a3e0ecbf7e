//! Per-request context threaded through every pipeline step.

use std::sync::Arc;
use std::time::Instant;

use tacit_core::models::QueryRequest;
use tokio_util::sync::CancellationToken;

use crate::domain::DomainPipeline;

/// Everything one query needs. Nothing in the pipeline looks up the
/// current domain any other way.
#[derive(Clone)]
pub struct QueryContext {
    pub query_id: String,
    pub request: QueryRequest,
    pub domain: Arc<DomainPipeline>,
    pub cancel: CancellationToken,
    pub started: Instant,
}

impl QueryContext {
    pub fn new(request: QueryRequest, domain: Arc<DomainPipeline>, cancel: CancellationToken) -> Self {
        Self {
            query_id: uuid::Uuid::new_v4().to_string(),
            request,
            domain,
            cancel,
            started: Instant::now(),
        }
    }

    pub fn domain_name(&self) -> &str {
        &self.domain.config().name
    }

    pub fn query(&self) -> &str {
        &self.request.text
    }

    /// Why local search is skipped for this request, if it is.
    pub fn search_skip_reason(&self) -> Option<&'static str> {
        if self.domain.config().pure_generation {
            Some("pure generation domain")
        } else if self.request.flags.skip_local_search {
            Some("local search skipped by request")
        } else {
            None
        }
    }
}
