//! SQLite persistence for LexiFlow decks.
//!
//! [`SqliteStore`] implements `RecordStore` for both vocabulary and irregular
//! verbs, so one database file backs both decks.

pub mod config;
pub mod error;
pub mod repository;
pub mod schema;

pub use config::{default_db_path, StoreConfig, DB_PATH_ENV};
pub use error::DbError;
pub use repository::SqliteStore;
