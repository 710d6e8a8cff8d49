//! Error taxonomy for store and retrieval operations.
//!
//! Absence of data is not an error anywhere in the retrieval paths — an
//! unknown lead yields an empty result set. [`Error::NotFound`] is reserved
//! for lookups by a required identifier (e.g. a memory id).

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Rejected at the write boundary: unknown memory type, out-of-range
    /// confidence, empty lead id.
    #[error("validation error: {0}")]
    Validation(String),

    /// A lookup by a required identifier found nothing.
    #[error("not found: {0}")]
    NotFound(String),

    /// The backing store cannot be reached (e.g. a poisoned connection lock).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// SQLite error, propagated unchanged.
    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
