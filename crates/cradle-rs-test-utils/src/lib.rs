//! Test helpers shared across Cradle crates.

pub mod fixtures;
pub mod storage;

pub use fixtures::{fields, name_fields};
pub use storage::{CountingStorage, FailingStorage};
