use async_trait::async_trait;

use crate::errors::TacitResult;
use crate::models::{GenerationRequest, GenerationResponse};

/// External text generation provider.
///
/// Callers bound every call with their own deadline; implementations should
/// not retry internally.
#[async_trait]
pub trait IGenerationProvider: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> TacitResult<GenerationResponse>;

    /// Name the provider is registered under.
    fn name(&self) -> &str;
}
