//! Key-value storage ports backing item stores.

use crate::error::StorageError;
use log::{debug, info};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Synchronous string key-value medium.
///
/// Keys are opaque partition names chosen by the caller; values are the
/// serialized partition contents.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Replace the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory storage, lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty in-memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage pre-populated with raw entries.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self {
            entries: Mutex::new(entries),
        }
    }

    /// Remove the value stored under `key`, returning it.
    pub fn remove(&self, key: &str) -> Option<String> {
        self.entries.lock().remove(key)
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed storage writing one `<key>.json` file per partition.
#[derive(Debug)]
pub struct FileStorage {
    /// Root directory for partition files.
    root: PathBuf,
    /// Serialize write access to partition files.
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Create a new file storage under the given root.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, StorageError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        info!("initialized file storage (root={})", root.display());
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    /// Root directory of this storage.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the partition file.
    fn partition_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    /// Path to the temporary partition file.
    fn temp_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json.tmp"))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        let path = self.partition_path(key);
        match fs::read_to_string(&path) {
            Ok(contents) => {
                debug!(
                    "read partition file (key={}, len={})",
                    key,
                    contents.len()
                );
                Ok(Some(contents))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::Io(err)),
        }
    }

    /// Rewrite a partition atomically.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let _guard = self.write_lock.lock();
        let path = self.partition_path(key);
        let temp_path = self.temp_path(key);
        {
            let mut file = OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&temp_path)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(temp_path, path)?;
        debug!("wrote partition file (key={}, len={})", key, value.len());
        Ok(())
    }
}

/// Check that a partition key can name a file.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let reason = if key.trim().is_empty() {
        Some("key is empty")
    } else if key == "." || key == ".." {
        Some("key is a relative path component")
    } else if key.contains(['/', '\\']) {
        Some("key contains a path separator")
    } else if key.contains('\0') {
        Some("key contains a NUL byte")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(StorageError::InvalidKey {
            key: key.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::{FileStorage, KeyValueStorage, MemoryStorage, validate_key};
    use crate::StorageError;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn memory_storage_get_and_set() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("names").expect("get"), None);
        storage.set("names", "[]").expect("set");
        assert_eq!(storage.get("names").expect("get"), Some("[]".to_string()));
        assert_eq!(storage.remove("names"), Some("[]".to_string()));
        assert_eq!(storage.get("names").expect("get"), None);
    }

    #[test]
    fn file_storage_persists_across_instances() {
        let temp = tempdir().expect("tempdir");
        let storage = FileStorage::new(temp.path()).expect("storage");
        assert_eq!(storage.get("favorites").expect("get"), None);
        storage.set("favorites", "[1]").expect("set");
        storage.set("favorites", "[2]").expect("overwrite");

        let reopened = FileStorage::new(temp.path()).expect("storage");
        assert_eq!(
            reopened.get("favorites").expect("get"),
            Some("[2]".to_string())
        );
        assert!(!temp.path().join("favorites.json.tmp").exists());
    }

    #[test]
    fn file_storage_rejects_path_like_keys() {
        let temp = tempdir().expect("tempdir");
        let storage = FileStorage::new(temp.path()).expect("storage");
        let err = storage.set("../escape", "[]").unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey { .. }));
    }

    #[test]
    fn validate_key_cases() {
        assert!(validate_key("names").is_ok());
        assert!(validate_key("blog-posts_v2").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("   ").is_err());
        assert!(validate_key("..").is_err());
        assert!(validate_key("a/b").is_err());
        assert!(validate_key("a\\b").is_err());
    }
}
