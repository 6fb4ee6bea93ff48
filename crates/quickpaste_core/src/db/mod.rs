//! Storage area for QuickPaste, backed by a single redb file.

/// Settings storage helpers.
pub mod settings;
/// Snippet storage helpers.
pub mod snippet;
/// redb table definitions.
pub mod tables;

use crate::{config::Config, constants::REDB_FILE_NAME, error::AppError};
use std::path::Path;
use std::sync::Arc;

/// Database handle with access to the snippet and settings accessors.
pub struct Database {
    pub db: Arc<redb::Database>,
    pub snippets: snippet::SnippetDb,
    pub settings: settings::SettingsDb,
}

#[cfg(test)]
mod tests;

impl Database {
    /// Open (or create) the storage directory at `db_path` with default limits.
    ///
    /// # Returns
    /// A ready [`Database`] whose tables exist.
    ///
    /// # Errors
    /// Returns an error when the directory cannot be created, the redb file is
    /// held by another process, or table initialization fails.
    pub fn new(db_path: &str) -> Result<Self, AppError> {
        Self::open(db_path, crate::constants::DEFAULT_MAX_SNIPPET_SIZE)
    }

    /// Open the storage directory named by `config`, applying its size limit.
    ///
    /// # Errors
    /// Same as [`Database::new`].
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::open(&config.db_path, config.max_snippet_size)
    }

    fn open(db_path: &str, max_snippet_size: usize) -> Result<Self, AppError> {
        let dir = Path::new(db_path);
        std::fs::create_dir_all(dir)?;
        let file = dir.join(REDB_FILE_NAME);

        let db = match redb::Database::create(&file) {
            Ok(db) => Arc::new(db),
            Err(redb::DatabaseError::DatabaseAlreadyOpen) => {
                return Err(AppError::StorageMessage(format!(
                    "{} is already open by another QuickPaste process",
                    file.display()
                )));
            }
            Err(err) => return Err(err.into()),
        };

        let write_txn = db.begin_write()?;
        write_txn.open_table(tables::STORAGE_AREA)?;
        write_txn.commit()?;
        tracing::debug!("Opened storage area at {}", file.display());

        Ok(Self {
            snippets: snippet::SnippetDb::new(Arc::clone(&db), max_snippet_size),
            settings: settings::SettingsDb::new(Arc::clone(&db)),
            db,
        })
    }
}
