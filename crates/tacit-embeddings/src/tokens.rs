//! Token counting for the encoding budget.

use std::sync::Arc;

use tiktoken_rs::CoreBPE;
use tracing::warn;

/// Counts tokens with `cl100k_base`, or by whitespace when the BPE tables
/// cannot be loaded.
#[derive(Clone)]
pub struct TokenCounter {
    bpe: Option<Arc<CoreBPE>>,
}

impl TokenCounter {
    pub fn new() -> Self {
        let bpe = match tiktoken_rs::cl100k_base() {
            Ok(bpe) => Some(Arc::new(bpe)),
            Err(e) => {
                warn!(error = %e, "cl100k_base unavailable, counting whitespace tokens");
                None
            }
        };
        Self { bpe }
    }

    /// Whitespace-only counter.
    pub fn whitespace() -> Self {
        Self { bpe: None }
    }

    pub fn count(&self, text: &str) -> usize {
        match &self.bpe {
            Some(bpe) => bpe.encode_ordinary(text).len(),
            None => text.split_whitespace().count(),
        }
    }

    pub fn is_exact(&self) -> bool {
        self.bpe.is_some()
    }
}

impl Default for TokenCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TokenCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCounter")
            .field("exact", &self.is_exact())
            .finish()
    }
}
