//! Generic item storage for Cradle content.
//!
//! An [`ItemStore`] owns the ordered records of one partition and mirrors
//! every mutation to a [`KeyValueStorage`] port under the partition key.

pub mod error;
pub mod model;
pub mod storage;
pub mod store;

/// Store and storage error types.
pub use error::{StorageError, StoreError, StoreIssue};
/// Record model and field helpers.
pub use model::{Fields, RESERVED_KEYS, Record};
/// Storage port interface and default implementations.
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, validate_key};
/// Partition-scoped item store.
pub use store::ItemStore;
