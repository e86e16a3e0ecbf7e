//! # tacit-storage
//!
//! SQLite persistence for knowledge units and their embedding vectors.
//! One write connection serializes writes; file-backed stores serve reads
//! from a round-robin pool. Pattern documents can be imported from JSON or
//! JSON Lines.

pub mod engine;
pub mod import;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;
pub use import::{load_documents, PatternDocument};

use tacit_core::errors::{StorageError, TacitError};

/// Wrap a message as a storage error.
pub(crate) fn to_storage_err(message: impl Into<String>) -> TacitError {
    StorageError::SqliteError {
        message: message.into(),
    }
    .into()
}
