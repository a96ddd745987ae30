// ── Store error types ──
//
// SQLite and task-pool failures. Translated into the repository contract
// (`RepoError`) before anything outside this crate sees them.

use lostfound_core::{ItemId, RepoError};
use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("database schema version {db_version} is newer than supported {latest_supported}")]
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },

    #[error("identifier {id} already exists")]
    Conflict { id: ItemId },

    #[error("row {id}: invalid {column}: {value}")]
    InvalidRow {
        id: String,
        column: &'static str,
        value: String,
    },

    #[error("blocking store task failed: {0}")]
    Join(String),
}

impl StoreError {
    /// Map a failed insert, recognising uniqueness violations.
    pub(crate) fn from_insert(err: rusqlite::Error, id: &ItemId) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref failure, _)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                Self::Conflict { id: id.clone() }
            }
            other => Self::Sqlite(other),
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { id } => RepoError::Conflict { id },
            StoreError::InvalidRow { id, column, value } => RepoError::InvalidData {
                id,
                message: format!("invalid {column}: {value}"),
            },
            other => RepoError::Unavailable {
                message: other.to_string(),
            },
        }
    }
}
