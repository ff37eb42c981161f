//! Error types for storage ports and item stores.

use thiserror::Error;

/// Errors returned by key-value storage ports.
#[derive(Debug, Error)]
pub enum StorageError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The medium refused the operation (full, disabled, etc).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// Partition key cannot be used with this medium.
    #[error("invalid storage key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },
}

/// Errors raised while loading or persisting a partition.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Storage port error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Non-fatal conditions reported by an [`crate::ItemStore`].
///
/// The store never fails an operation because of the medium; it records the
/// issue in a queue instead and keeps the in-memory state authoritative.
#[derive(Debug, Error)]
pub enum StoreIssue {
    /// Stored data could not be read or parsed; the store started empty.
    #[error("load failed for partition {partition}: {source}")]
    LoadFailed {
        partition: String,
        #[source]
        source: StoreError,
    },
    /// Writing the partition after a mutation failed.
    #[error("persist failed for partition {partition}: {source}")]
    PersistFailed {
        partition: String,
        #[source]
        source: StoreError,
    },
}

impl StoreIssue {
    /// Returns true for [`StoreIssue::LoadFailed`].
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::LoadFailed { .. })
    }

    /// Returns true for [`StoreIssue::PersistFailed`].
    pub fn is_persist_failure(&self) -> bool {
        matches!(self, Self::PersistFailed { .. })
    }
}
