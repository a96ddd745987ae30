// ── Core error types ──
//
// `RepoError` is the contract every `ItemRepository` reports through.
// `CatalogError` covers the one invariant the catalog can refuse on.
// `CoreError` is what front ends see; the `From` impls translate the
// lower layers into domain-appropriate variants.

use thiserror::Error;

use crate::model::{ItemId, ItemValidationError};

/// Failure reported by a persistent store.
#[derive(Debug, Error)]
pub enum RepoError {
    /// Store could not be reached or the call failed mid-flight.
    /// Callers treat this as transient.
    #[error("store unavailable: {message}")]
    Unavailable { message: String },

    /// The store already holds a record under this identifier.
    #[error("identifier {id} already exists in the store")]
    Conflict { id: ItemId },

    /// A persisted record could not be decoded into an `Item`.
    #[error("stored record {id} is invalid: {message}")]
    InvalidData { id: String, message: String },
}

impl RepoError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// `true` when retrying later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Invariant violation refused by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Two different records claim the same identifier.
    #[error("identifier {id} is already bound to a different record")]
    DuplicateIdentifier { id: ItemId },
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Write boundary ───────────────────────────────────────────────
    #[error("Invalid item: {0}")]
    InvalidItem(#[from] ItemValidationError),

    #[error("Duplicate identifier: {id}")]
    DuplicateIdentifier { id: ItemId },

    // ── Store ────────────────────────────────────────────────────────
    #[error("Repository unavailable: {message}")]
    RepositoryUnavailable { message: String },

    #[error("Item not found: {id}")]
    NotFound { id: ItemId },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal ─────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// `true` for failures that a later retry may clear.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RepositoryUnavailable { .. })
    }
}

// ── Conversion from lower layers ─────────────────────────────────────

impl From<RepoError> for CoreError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Unavailable { message } => CoreError::RepositoryUnavailable { message },
            RepoError::Conflict { id } => CoreError::DuplicateIdentifier { id },
            RepoError::InvalidData { id, message } => {
                CoreError::Internal(format!("stored record {id} is invalid: {message}"))
            }
        }
    }
}

impl From<CatalogError> for CoreError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::DuplicateIdentifier { id } => CoreError::DuplicateIdentifier { id },
        }
    }
}
