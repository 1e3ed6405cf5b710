//! Error types for target store operations

use std::fmt;

use uuid::Uuid;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur at the persistence boundary
#[derive(Debug)]
pub enum StoreError {
    /// No record with the given id
    NotFound(Uuid),

    /// The backing store cannot be reached (tick-fatal for listing)
    Unavailable(String),

    /// Backend-specific failure
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "no target with id {}", id),
            StoreError::Unavailable(msg) => write!(f, "target store unavailable: {}", msg),
            StoreError::Backend(msg) => write!(f, "target store error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}
