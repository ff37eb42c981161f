//! Configuration schema for Cradle.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Root config for the Cradle SDK and CLI.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CradleConfig {
    /// Editor schema hint; ignored by the loader.
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    /// Where partitions are stored.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Seed data for content partitions.
    #[serde(default)]
    pub content: ContentConfig,
    /// Favorites manager settings.
    #[serde(default)]
    pub favorites: FavoritesConfig,
}

impl CradleConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> CradleConfigBuilder {
        CradleConfigBuilder::new()
    }

    /// Seed field sets configured for a partition, if any.
    pub fn seeds_for(&self, partition: &str) -> Option<&[Map<String, Value>]> {
        self.content.partitions.get(partition).map(Vec::as_slice)
    }
}

/// Builder for assembling a `CradleConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct CradleConfigBuilder {
    config: CradleConfig,
}

impl CradleConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: CradleConfig::default(),
        }
    }

    /// Replace the storage configuration.
    pub fn storage(mut self, storage: StorageConfig) -> Self {
        self.config.storage = storage;
        self
    }

    /// Replace the content configuration.
    pub fn content(mut self, content: ContentConfig) -> Self {
        self.config.content = content;
        self
    }

    /// Replace the favorites configuration.
    pub fn favorites(mut self, favorites: FavoritesConfig) -> Self {
        self.config.favorites = favorites;
        self
    }

    /// Add seed field sets for one partition.
    pub fn seed(mut self, partition: impl Into<String>, seeds: Vec<Map<String, Value>>) -> Self {
        self.config.content.partitions.insert(partition.into(), seeds);
        self
    }

    /// Finalize and return the built `CradleConfig`.
    pub fn build(self) -> CradleConfig {
        self.config
    }
}

/// Storage medium selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// One JSON file per partition under `path`.
    #[default]
    File,
    /// Process-local map; nothing survives a restart.
    Memory,
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// Storage medium, `file` by default.
    #[serde(default)]
    pub backend: StorageBackend,
    /// Root directory for the file backend.
    #[serde(default = "default_storage_path")]
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_storage_path(),
        }
    }
}

/// Default root directory for the file backend.
fn default_storage_path() -> String {
    ".cradle/data".to_string()
}

/// Site content configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ContentConfig {
    /// Partition key to seed field sets used when the partition is empty.
    #[serde(default)]
    pub partitions: BTreeMap<String, Vec<Map<String, Value>>>,
}

/// Favorites manager configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FavoritesConfig {
    /// Partition key holding saved favorites.
    #[serde(default = "default_favorites_partition")]
    pub partition: String,
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self {
            partition: default_favorites_partition(),
        }
    }
}

fn default_favorites_partition() -> String {
    "favorites".to_string()
}
