//! Shared error types for the catalog and its backing store.

use thiserror::Error;

/// Failure in the underlying key/value store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The SQLite layer failed (unavailable, locked, I/O).
    #[error("store operation failed: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A persisted value could not be decoded.
    #[error("corrupt persisted encoding: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Failure of a catalog operation.
///
/// `Validation` and `NotFound` are returned to the immediate caller for
/// decision (e.g. create vs. update); `Store` failures during a
/// catalog-wide listing are fatal to the current detection pass.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A required identity field was missing.
    #[error("validation failed: {0}")]
    Validation(String),

    /// No record exists under the given key.
    #[error("not found: {0}")]
    NotFound(String),

    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
