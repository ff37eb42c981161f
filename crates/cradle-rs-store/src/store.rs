//! Partition-scoped item store mirrored to a key-value medium.

use crate::error::{StoreError, StoreIssue};
use crate::model::{Fields, Record};
use crate::storage::KeyValueStorage;
use chrono::Utc;
use log::{debug, info, warn};
use serde_json::Value;
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

const MAX_PENDING_ISSUES: usize = 16;

/// Ordered records for one partition.
///
/// Every mutation updates the in-memory sequence first and then writes the
/// whole partition to storage. Storage failures never undo the in-memory
/// change; they are kept as a [`StoreIssue`] for the caller to inspect.
pub struct ItemStore {
    partition: String,
    storage: Arc<dyn KeyValueStorage>,
    items: Vec<Record>,
    issues: VecDeque<StoreIssue>,
}

impl fmt::Debug for ItemStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemStore")
            .field("partition", &self.partition)
            .field("items", &self.items.len())
            .field("issues", &self.issues)
            .finish()
    }
}

impl ItemStore {
    /// Open a partition, loading any stored records.
    ///
    /// When nothing is stored and `initial` is provided, the initial records
    /// become the state and are persisted right away. Unreadable data leaves
    /// the store empty with a [`StoreIssue::LoadFailed`] recorded.
    pub fn open(
        partition: impl Into<String>,
        storage: Arc<dyn KeyValueStorage>,
        initial: Option<Vec<Record>>,
    ) -> Self {
        let partition = partition.into();
        let mut store = Self {
            partition,
            storage,
            items: Vec::new(),
            issues: VecDeque::new(),
        };
        match read_partition(store.storage.as_ref(), &store.partition) {
            Ok(Some(records)) => {
                store.items = records;
            }
            Ok(None) => {
                if let Some(initial) = initial {
                    debug!(
                        "seeding partition with initial data (partition={}, count={})",
                        store.partition,
                        initial.len()
                    );
                    store.items = dedupe_ids(initial, &store.partition);
                    store.persist();
                }
            }
            Err(source) => {
                store.record_issue(StoreIssue::LoadFailed {
                    partition: store.partition.clone(),
                    source,
                });
            }
        }
        info!(
            "opened item store (partition={}, items={})",
            store.partition,
            store.items.len()
        );
        store
    }

    /// Partition key for this store.
    pub fn partition(&self) -> &str {
        &self.partition
    }

    /// All records in insertion order.
    pub fn items(&self) -> &[Record] {
        &self.items
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the partition holds no records.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Oldest unreported non-fatal condition, if any.
    pub fn issue(&self) -> Option<&StoreIssue> {
        self.issues.front()
    }

    /// Take the oldest unreported condition. Call until `None` to drain.
    pub fn take_issue(&mut self) -> Option<StoreIssue> {
        self.issues.pop_front()
    }

    /// Look up a record by identifier.
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.items.iter().find(|record| record.id == id)
    }

    /// Records whose field `key` equals `value`.
    pub fn find_by_field(&self, key: &str, value: &Value) -> Vec<&Record> {
        self.items
            .iter()
            .filter(|record| record.field(key) == Some(value))
            .collect()
    }

    /// Create a record from `fields`, append it and persist.
    pub fn add(&mut self, fields: Fields) -> Record {
        let record = self.new_record(fields, &HashSet::new());
        debug!(
            "adding record (partition={}, id={})",
            self.partition, record.id
        );
        self.items.push(record.clone());
        self.persist();
        record
    }

    /// Merge `partial` into the record with `id` and persist.
    ///
    /// Returns the updated record, or `None` without touching storage when
    /// no record matches.
    pub fn update(&mut self, id: &str, partial: Fields) -> Option<Record> {
        let now = Utc::now();
        let record = self.items.iter_mut().find(|record| record.id == id)?;
        record.merge(partial, now);
        let updated = record.clone();
        debug!(
            "updated record (partition={}, id={}, fields={})",
            self.partition,
            id,
            updated.fields.len()
        );
        self.persist();
        Some(updated)
    }

    /// Remove the record with `id` and persist. Returns whether it existed.
    pub fn delete(&mut self, id: &str) -> bool {
        let Some(index) = self.items.iter().position(|record| record.id == id) else {
            debug!(
                "delete skipped, record not found (partition={}, id={})",
                self.partition, id
            );
            return false;
        };
        self.items.remove(index);
        debug!("deleted record (partition={}, id={})", self.partition, id);
        self.persist();
        true
    }

    /// Create one record per field set as a single batch with one persist.
    pub fn bulk_add<I>(&mut self, field_sets: I) -> Vec<Record>
    where
        I: IntoIterator<Item = Fields>,
    {
        let mut batch_ids = HashSet::new();
        let mut created = Vec::new();
        for fields in field_sets {
            let record = self.new_record(fields, &batch_ids);
            batch_ids.insert(record.id.clone());
            created.push(record);
        }
        if created.is_empty() {
            return created;
        }
        debug!(
            "bulk adding records (partition={}, count={})",
            self.partition,
            created.len()
        );
        self.items.extend(created.iter().cloned());
        self.persist();
        created
    }

    /// Remove every record whose id is listed, with one persist.
    ///
    /// Returns the number of removed records.
    pub fn bulk_delete<I, S>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids: HashSet<String> = ids
            .into_iter()
            .map(|id| id.as_ref().to_string())
            .collect();
        let before = self.items.len();
        self.items.retain(|record| !ids.contains(&record.id));
        let removed = before - self.items.len();
        debug!(
            "bulk deleted records (partition={}, requested={}, removed={})",
            self.partition,
            ids.len(),
            removed
        );
        if removed > 0 {
            self.persist();
        }
        removed
    }

    /// Re-read the partition from storage, replacing in-memory state.
    ///
    /// A missing partition yields an empty store; unreadable data keeps the
    /// current records and records a [`StoreIssue::LoadFailed`].
    pub fn reload(&mut self) {
        match read_partition(self.storage.as_ref(), &self.partition) {
            Ok(records) => {
                self.items = records.unwrap_or_default();
                debug!(
                    "reloaded item store (partition={}, items={})",
                    self.partition,
                    self.items.len()
                );
            }
            Err(source) => {
                self.record_issue(StoreIssue::LoadFailed {
                    partition: self.partition.clone(),
                    source,
                });
            }
        }
    }

    /// Serialize the partition and write it to storage.
    fn persist(&mut self) {
        let result = serde_json::to_string(&self.items)
            .map_err(StoreError::from)
            .and_then(|serialized| {
                self.storage
                    .set(&self.partition, &serialized)
                    .map_err(StoreError::from)
            });
        if let Err(source) = result {
            self.record_issue(StoreIssue::PersistFailed {
                partition: self.partition.clone(),
                source,
            });
        }
    }

    /// Queue an issue for the caller. Once the queue is full, further
    /// issues are only logged.
    fn record_issue(&mut self, issue: StoreIssue) {
        warn!("{issue}");
        if self.issues.len() < MAX_PENDING_ISSUES {
            self.issues.push_back(issue);
        }
    }

    /// Build a record whose id is unused in the partition and in `pending`.
    fn new_record(&self, fields: Fields, pending: &HashSet<String>) -> Record {
        let mut record = Record::new(fields, Utc::now());
        while pending.contains(&record.id) || self.get(&record.id).is_some() {
            record.id = Uuid::new_v4().to_string();
        }
        record
    }
}

/// Read and decode a partition; `None` when nothing is stored.
fn read_partition(
    storage: &dyn KeyValueStorage,
    partition: &str,
) -> Result<Option<Vec<Record>>, StoreError> {
    let Some(raw) = storage.get(partition)? else {
        debug!("partition not found in storage (partition={partition})");
        return Ok(None);
    };
    let records: Vec<Record> = serde_json::from_str(&raw)?;
    Ok(Some(dedupe_ids(records, partition)))
}

/// Drop records whose id was already seen, keeping the first occurrence.
fn dedupe_ids(records: Vec<Record>, partition: &str) -> Vec<Record> {
    let mut seen = HashSet::new();
    let total = records.len();
    let unique: Vec<Record> = records
        .into_iter()
        .filter(|record| seen.insert(record.id.clone()))
        .collect();
    if unique.len() != total {
        warn!(
            "duplicate record ids dropped (partition={}, dropped={})",
            partition,
            total - unique.len()
        );
    }
    unique
}
