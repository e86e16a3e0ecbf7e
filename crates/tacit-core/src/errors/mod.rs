mod config_error;
mod embedding_error;
mod provider_error;
mod storage_error;
mod tacit_error;

pub use config_error::ConfigError;
pub use embedding_error::EmbeddingError;
pub use provider_error::ProviderError;
pub use storage_error::StorageError;
pub use tacit_error::{ErrorKind, TacitError};

/// Convenience result alias used across the workspace.
pub type TacitResult<T> = Result<T, TacitError>;
