use cradle_rs_store::{KeyValueStorage, MemoryStorage, StorageError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Storage whose reads and writes can be switched to fail.
#[derive(Debug, Default)]
pub struct FailingStorage {
    inner: MemoryStorage,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FailingStorage {
    /// Storage that succeeds until told otherwise.
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that rejects every write, like a full browser quota.
    pub fn read_only() -> Self {
        let storage = Self::default();
        storage.set_fail_writes(true);
        storage
    }

    /// Storage that fails every read.
    pub fn unreadable() -> Self {
        let storage = Self::default();
        storage.set_fail_reads(true);
        storage
    }

    /// Switch read failures on or off.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Switch write failures on or off.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Raw stored value, bypassing failure injection.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.get(key).ok().flatten()
    }
}

impl KeyValueStorage for FailingStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!("read of {key} refused")));
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!("quota exceeded for {key}")));
        }
        self.inner.set(key, value)
    }
}

/// Memory storage that records every write.
#[derive(Debug, Default)]
pub struct CountingStorage {
    inner: MemoryStorage,
    writes: AtomicUsize,
    keys: Mutex<Vec<String>>,
}

impl CountingStorage {
    /// Empty storage with no writes counted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of `set` calls.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Keys written, in call order.
    pub fn written_keys(&self) -> Vec<String> {
        self.keys.lock().clone()
    }
}

impl KeyValueStorage for CountingStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.keys.lock().push(key.to_string());
        self.inner.set(key, value)
    }
}
