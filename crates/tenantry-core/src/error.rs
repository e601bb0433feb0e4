//! Error taxonomy for Tenantry.
//!
//! Two families live here. [`ValidationError`] covers caller input that fails
//! shape or length checks and is raised at the adapter boundary, before the
//! store is ever involved. [`StoreError`] covers failures of the backing
//! storage and is always fatal for the operation that hit it.
//!
//! Expected business outcomes of an update (record missing, record owned by
//! another tenant) are not errors at all; see [`crate::UpdateOutcome`].

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result alias for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Caller input rejected before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The description was missing, empty, or whitespace-only.
    #[error("description is required and cannot be blank")]
    BlankDescription,

    /// The description exceeds the maximum number of UTF-16 code units.
    #[error("description too long ({length} code units, max {max})")]
    DescriptionTooLong { length: usize, max: usize },

    /// The tenant identifier was empty or whitespace-only.
    #[error("tenant identifier cannot be blank")]
    BlankTenant,
}

/// Failures of the durable storage behind the task store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing storage failed.
    #[error("storage I/O failed at {}: {source}", .location.display())]
    Io {
        location: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Existing content could not be parsed as a sequence of records.
    #[error("storage at {} is corrupt: {details}", .location.display())]
    Corrupt { location: PathBuf, details: String },

    /// The store lock could not be acquired within the configured timeout.
    #[error("timed out after {0:?} waiting for the store lock")]
    LockTimeout(Duration),
}

impl StoreError {
    /// Build an I/O error for the given storage location.
    pub fn io(location: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            location: location.into(),
            source,
        }
    }

    /// Build a corruption error for the given storage location.
    pub fn corrupt(location: impl Into<PathBuf>, details: impl Into<String>) -> Self {
        StoreError::Corrupt {
            location: location.into(),
            details: details.into(),
        }
    }

    /// Whether the failure came from the storage medium itself rather than
    /// from lock contention.
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, StoreError::Io { .. } | StoreError::Corrupt { .. })
    }
}
