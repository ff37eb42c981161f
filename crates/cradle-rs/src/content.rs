//! Storage and partition wiring from configuration.

use chrono::Utc;
use cradle_rs_config::{CradleConfig, StorageBackend, StorageConfig};
use cradle_rs_store::{
    FileStorage, ItemStore, KeyValueStorage, MemoryStorage, Record, StorageError, validate_key,
};
use log::{debug, info};
use std::sync::Arc;

/// Build the storage port selected by `config`.
pub fn open_storage(config: &StorageConfig) -> Result<Arc<dyn KeyValueStorage>, StorageError> {
    match config.backend {
        StorageBackend::File => {
            info!("using file storage (path={})", config.path);
            Ok(Arc::new(FileStorage::new(&config.path)?))
        }
        StorageBackend::Memory => {
            info!("using in-memory storage");
            Ok(Arc::new(MemoryStorage::new()))
        }
    }
}

/// Records built from the configured seeds for `partition`.
pub fn seed_records(config: &CradleConfig, partition: &str) -> Option<Vec<Record>> {
    let seeds = config.seeds_for(partition)?;
    let now = Utc::now();
    Some(
        seeds
            .iter()
            .map(|fields| Record::new(fields.clone(), now))
            .collect(),
    )
}

/// Open a partition, seeding it from config when it has never been stored.
///
/// `partition` must be a valid storage key; anything else could never be
/// persisted.
pub fn open_partition(
    config: &CradleConfig,
    storage: Arc<dyn KeyValueStorage>,
    partition: &str,
) -> Result<ItemStore, StorageError> {
    validate_key(partition)?;
    let seeds = seed_records(config, partition);
    debug!(
        "opening partition (partition={}, seeds={})",
        partition,
        seeds.as_ref().map_or(0, Vec::len)
    );
    Ok(ItemStore::open(partition, storage, seeds))
}

#[cfg(test)]
mod tests {
    use super::{open_partition, open_storage, seed_records};
    use cradle_rs_config::{CradleConfig, StorageBackend, StorageConfig};
    use cradle_rs_store::{KeyValueStorage, StorageError};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::tempdir;

    fn seeded_config() -> CradleConfig {
        let seed = |name: &str| match json!({ "name": name }) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        CradleConfig::builder()
            .storage(StorageConfig {
                backend: StorageBackend::Memory,
                path: "unused".to_string(),
            })
            .seed("names", vec![seed("Ava"), seed("Leo")])
            .build()
    }

    #[test]
    fn seeds_populate_new_partitions_once() {
        let config = seeded_config();
        let storage = open_storage(&config.storage).expect("storage");

        let mut store = open_partition(&config, storage.clone(), "names").expect("open");
        assert_eq!(store.len(), 2);
        let ids: Vec<String> = store.items().iter().map(|r| r.id.clone()).collect();
        store.bulk_delete(&ids);

        let reopened = open_partition(&config, storage, "names").expect("reopen");
        assert!(reopened.is_empty());
    }

    #[test]
    fn unseeded_partition_starts_empty() {
        let config = seeded_config();
        assert!(seed_records(&config, "blog").is_none());
        let storage = open_storage(&config.storage).expect("storage");
        let store = open_partition(&config, storage, "blog").expect("open");
        assert!(store.is_empty());
    }

    #[test]
    fn file_backend_creates_root() {
        let temp = tempdir().expect("tempdir");
        let root = temp.path().join("data");
        let config = StorageConfig {
            backend: StorageBackend::File,
            path: root.to_string_lossy().to_string(),
        };
        let storage = open_storage(&config).expect("storage");
        storage.set("names", "[]").expect("set");
        assert!(root.join("names.json").exists());
    }

    #[test]
    fn path_like_partitions_are_rejected_before_opening() {
        let temp = tempdir().expect("tempdir");
        let root = temp.path().join("data");
        let config = CradleConfig::builder()
            .storage(StorageConfig {
                backend: StorageBackend::File,
                path: root.to_string_lossy().to_string(),
            })
            .build();
        let storage = open_storage(&config.storage).expect("storage");

        for partition in ["../x", "a/b", " "] {
            let err = open_partition(&config, storage.clone(), partition).unwrap_err();
            assert!(matches!(err, StorageError::InvalidKey { .. }), "{partition}");
        }
        assert!(!temp.path().join("x.json").exists());
    }
}
