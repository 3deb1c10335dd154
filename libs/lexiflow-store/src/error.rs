//! Database error types.

use lexiflow_core::{RecordId, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("tag list encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("record not found: {0}")]
    NotFound(RecordId),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("cannot create data directory: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(id) => StoreError::NotFound(id),
            other => StoreError::Backend(Box::new(other)),
        }
    }
}
