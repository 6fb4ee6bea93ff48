//! Errors raised by storage, validation and the backup format.
use thiserror::Error;

/// Error type shared by every core operation.
#[derive(Error, Debug)]
pub enum AppError {
    /// The redb storage area failed.
    #[error("Storage area error: {0}")]
    Database(#[from] redb::Error),

    /// A storage failure with no underlying redb error (lock poisoning,
    /// a second process holding the file).
    #[error("Storage area error: {0}")]
    StorageMessage(String),

    #[error("Cannot decode stored snippets: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snippet not found")]
    NotFound,

    /// User input failed validation; the message names the field.
    #[error("Invalid snippet: {0}")]
    BadRequest(String),

    /// A backup file was rejected as a whole.
    #[error("Invalid import: {0}")]
    InvalidImport(String),
}

/// redb reports each stage (open, transaction, table, commit) with its own
/// error type; all of them fold into [`AppError::Database`].
macro_rules! storage_error_from {
    ($($source:ty),+ $(,)?) => {
        $(
            impl From<$source> for AppError {
                fn from(value: $source) -> Self {
                    Self::Database(value.into())
                }
            }
        )+
    };
}

storage_error_from!(
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);
