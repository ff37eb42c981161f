//! Public SDK surface for Cradle.
//!
//! This crate re-exports the store, name tools and config crates, wires
//! storage from configuration, and provides the favorites manager used by
//! the site.

pub mod content;
pub mod favorites;

pub use cradle_rs_config as config;
pub use cradle_rs_names as names;
pub use cradle_rs_store as store;

pub use content::{open_partition, open_storage, seed_records};
pub use favorites::Favorites;

/// Install `env_logger` with millisecond timestamps, filtered by `RUST_LOG`.
///
/// Does nothing without the `logging` feature or when a logger is already set.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::builder()
            .format_timestamp_millis()
            .parse_default_env()
            .try_init();
    }
}
