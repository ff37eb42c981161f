//! Record model persisted by item stores.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Open set of named fields carried by a record.
pub type Fields = Map<String, Value>;

/// Keys owned by the record header; never accepted as extension fields.
pub const RESERVED_KEYS: &[&str] = &["id", "createdAt", "updatedAt"];

/// Persisted content record.
///
/// Serializes as a flat JSON object: the header keys next to the extension
/// fields, e.g. `{"id": "...", "createdAt": "...", "updatedAt": "...",
/// "name": "Ava"}`. Timestamps are held and written at millisecond
/// precision (`2024-01-15T10:30:00.000Z`), so stored text survives a
/// load and persist unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    /// Record identifier, unique within a partition.
    pub id: String,
    /// Creation timestamp.
    #[serde(rename = "createdAt", with = "millis")]
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last mutation.
    #[serde(rename = "updatedAt", with = "millis")]
    pub updated_at: DateTime<Utc>,
    /// Extension fields.
    #[serde(flatten)]
    pub fields: Fields,
}

impl Record {
    /// Build a record with a fresh identifier and both timestamps set to `now`.
    pub fn new(fields: Fields, now: DateTime<Utc>) -> Self {
        let now = now.trunc_subsecs(3);
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            fields: strip_reserved(fields),
        }
    }

    /// Read a single extension field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Read an extension field as a string slice.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Merge partial fields over the current ones and refresh `updated_at`.
    ///
    /// The update timestamp never moves backwards.
    pub fn merge(&mut self, partial: Fields, now: DateTime<Utc>) {
        for (key, value) in strip_reserved(partial) {
            self.fields.insert(key, value);
        }
        self.updated_at = now.trunc_subsecs(3).max(self.updated_at);
    }
}

/// RFC 3339 with exactly three fractional digits and a `Z` suffix.
mod millis {
    use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        DateTime::<Utc>::deserialize(deserializer).map(|value| value.trunc_subsecs(3))
    }
}

/// Drop header keys from a caller-supplied field set.
fn strip_reserved(mut fields: Fields) -> Fields {
    for key in RESERVED_KEYS {
        fields.remove(*key);
    }
    fields
}
