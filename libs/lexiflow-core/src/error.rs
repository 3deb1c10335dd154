//! Error types for lexiflow-core.
//!
//! Malformed lines, incomplete candidates and duplicates are not errors:
//! the parser returns `None` and the validator sorts them into groups.
//! Only store failures and misuse of the service surface here.

use crate::types::RecordId;
use thiserror::Error;

/// Result type alias using the crate error.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by a record store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(RecordId),

    #[error("storage backend failure: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors surfaced by the deck service.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("missing required field: {field}")]
    IncompleteEntry { field: &'static str },

    #[error("entry already exists: {0}")]
    DuplicateEntry(String),

    #[error("box number out of range: {0}")]
    InvalidBox(u8),

    #[error("review session has no current item")]
    SessionFinished,

    #[error("export failed: {0}")]
    Export(#[from] csv::Error),

    #[error("invalid scheduler settings: {0}")]
    InvalidSchedule(String),
}
