//! Favorites manager backed by an item store partition.

use cradle_rs_names::NamesError;
use cradle_rs_store::{Fields, ItemStore, KeyValueStorage, Record, StoreIssue};
use log::debug;
use serde_json::Value;
use std::sync::Arc;

const NAME_FIELD: &str = "name";

/// Saved favorite names, unique by case-insensitive name.
#[derive(Debug)]
pub struct Favorites {
    store: ItemStore,
}

impl Favorites {
    /// Open the favorites stored under `partition`.
    pub fn open(partition: &str, storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::from_store(ItemStore::open(partition, storage, None))
    }

    /// Wrap an already opened store.
    pub fn from_store(store: ItemStore) -> Self {
        Self { store }
    }

    /// Save a favorite unless the name is already saved.
    ///
    /// Returns the stored record, existing or new.
    pub fn add(
        &mut self,
        name: &str,
        gender: Option<&str>,
        meaning: Option<&str>,
    ) -> Result<Record, NamesError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(NamesError::EmptyName { field: "favorite" });
        }
        if let Some(existing) = self.find(name) {
            debug!("favorite already saved (name={name})");
            return Ok(existing.clone());
        }
        let mut fields = Fields::new();
        fields.insert(NAME_FIELD.to_string(), Value::from(name));
        if let Some(gender) = gender {
            fields.insert("gender".to_string(), Value::from(gender));
        }
        if let Some(meaning) = meaning {
            fields.insert("meaning".to_string(), Value::from(meaning));
        }
        Ok(self.store.add(fields))
    }

    /// Remove a favorite by name. Returns whether it was saved.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.find(name.trim()).map(|record| record.id.clone()) {
            Some(id) => self.store.delete(&id),
            None => false,
        }
    }

    /// Flip the saved state of a name, returning the new state.
    pub fn toggle(&mut self, name: &str) -> Result<bool, NamesError> {
        if self.remove(name) {
            return Ok(false);
        }
        self.add(name, None, None)?;
        Ok(true)
    }

    /// Whether `name` is saved, ignoring case and surrounding whitespace.
    pub fn contains(&self, name: &str) -> bool {
        self.find(name.trim()).is_some()
    }

    /// Saved names in the order they were added.
    pub fn names(&self) -> Vec<&str> {
        self.store
            .items()
            .iter()
            .filter_map(|record| record.str_field(NAME_FIELD))
            .collect()
    }

    /// Saved favorite records in insertion order.
    pub fn records(&self) -> &[Record] {
        self.store.items()
    }

    /// Number of saved favorites.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether no favorites are saved.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Remove every favorite, returning how many were removed.
    pub fn clear(&mut self) -> usize {
        let ids: Vec<String> = self
            .store
            .items()
            .iter()
            .map(|record| record.id.clone())
            .collect();
        self.store.bulk_delete(&ids)
    }

    /// Oldest unreported storage condition, if any.
    pub fn issue(&self) -> Option<&StoreIssue> {
        self.store.issue()
    }

    /// Take the oldest unreported storage condition.
    pub fn take_issue(&mut self) -> Option<StoreIssue> {
        self.store.take_issue()
    }

    fn find(&self, name: &str) -> Option<&Record> {
        let wanted = name.to_lowercase();
        self.store.items().iter().find(|record| {
            record
                .str_field(NAME_FIELD)
                .is_some_and(|saved| saved.to_lowercase() == wanted)
        })
    }
}
