/// External provider (generation, document search) errors.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider {provider} exceeded deadline of {timeout_ms}ms")]
    Timeout { provider: String, timeout_ms: u64 },

    #[error("provider {provider} returned unusable output: {reason}")]
    Failure { provider: String, reason: String },

    #[error("provider call to {provider} was cancelled")]
    Cancelled { provider: String },
}
