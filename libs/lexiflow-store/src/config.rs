//! Database location.

use crate::error::DbError;
use crate::repository::SqliteStore;
use std::path::PathBuf;

/// Environment variable that overrides the database path.
pub const DB_PATH_ENV: &str = "LEXIFLOW_DB_PATH";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
}

impl StoreConfig {
    /// Read [`DB_PATH_ENV`], falling back to [`default_db_path`].
    pub fn from_env() -> Self {
        Self::resolve(std::env::var_os(DB_PATH_ENV).map(PathBuf::from))
    }

    fn resolve(override_path: Option<PathBuf>) -> Self {
        let db_path = override_path
            .filter(|path| !path.as_os_str().is_empty())
            .unwrap_or_else(default_db_path);
        Self { db_path }
    }

    /// Create the parent directory if needed and open the store.
    pub fn open(&self) -> Result<SqliteStore, DbError> {
        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        tracing::info!(path = %self.db_path.display(), "opening database");
        SqliteStore::open(&self.db_path)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::resolve(None)
    }
}

/// Per-user data directory, or the working directory when there is none.
pub fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lexiflow")
        .join("lexiflow.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins_over_default() {
        let config = StoreConfig::resolve(Some(PathBuf::from("/tmp/words.db")));
        assert_eq!(config.db_path, PathBuf::from("/tmp/words.db"));
    }

    #[test]
    fn empty_override_is_ignored() {
        let config = StoreConfig::resolve(Some(PathBuf::new()));
        assert_eq!(config.db_path, default_db_path());
        assert!(config.db_path.ends_with("lexiflow/lexiflow.db"));
    }

    #[test]
    fn open_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            db_path: dir.path().join("nested").join("lexiflow.db"),
        };
        config.open().unwrap();
        assert!(config.db_path.exists());
    }
}
