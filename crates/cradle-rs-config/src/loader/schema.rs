//! Shape checks for a single JSON5 layer before it is merged.
//!
//! Layers are partial, so every key is optional. Unknown keys and wrong
//! value types are rejected with a `<layer>:<dotted.path>` location.

use crate::ConfigError;
use serde_json::{Map, Value};

const ROOT_KEYS: &[&str] = &["$schema", "storage", "content", "favorites"];
const STORAGE_KEYS: &[&str] = &["backend", "path"];
const STORAGE_BACKENDS: &[&str] = &["file", "memory"];

/// Validate a single config layer.
pub(super) fn validate_layer_schema(value: &Value, layer: &str) -> Result<(), ConfigError> {
    let shape = LayerShape { layer };
    let root = shape.object(value, "", ROOT_KEYS)?;

    shape.string(root.get("$schema"), "$schema")?;

    if let Some(storage) = root.get("storage") {
        let storage = shape.object(storage, "storage", STORAGE_KEYS)?;
        shape.one_of(storage.get("backend"), "storage.backend", STORAGE_BACKENDS)?;
        shape.string(storage.get("path"), "storage.path")?;
    }

    if let Some(content) = root.get("content") {
        let content = shape.object(content, "content", &["partitions"])?;
        if let Some(partitions) = content.get("partitions") {
            shape.seed_partitions(partitions)?;
        }
    }

    if let Some(favorites) = root.get("favorites") {
        let favorites = shape.object(favorites, "favorites", &["partition"])?;
        shape.string(favorites.get("partition"), "favorites.partition")?;
    }
    Ok(())
}

struct LayerShape<'a> {
    layer: &'a str,
}

impl LayerShape<'_> {
    /// Expect an object whose keys all appear in `keys`.
    fn object<'v>(
        &self,
        value: &'v Value,
        path: &str,
        keys: &[&str],
    ) -> Result<&'v Map<String, Value>, ConfigError> {
        let Value::Object(map) = value else {
            return Err(self.invalid(path, "expected object"));
        };
        if let Some(unknown) = map.keys().find(|key| !keys.contains(&key.as_str())) {
            let unknown_path = if path.is_empty() {
                unknown.clone()
            } else {
                format!("{path}.{unknown}")
            };
            return Err(self.invalid(&unknown_path, "unknown key"));
        }
        Ok(map)
    }

    /// Partition keys are free-form; each maps to a list of seed objects.
    fn seed_partitions(&self, value: &Value) -> Result<(), ConfigError> {
        let Value::Object(partitions) = value else {
            return Err(self.invalid("content.partitions", "expected object"));
        };
        for (partition, seeds) in partitions {
            let path = format!("content.partitions.{partition}");
            let Value::Array(seeds) = seeds else {
                return Err(self.invalid(&path, "expected array"));
            };
            if let Some(idx) = seeds.iter().position(|seed| !seed.is_object()) {
                return Err(self.invalid(&format!("{path}[{idx}]"), "expected object"));
            }
        }
        Ok(())
    }

    fn string(&self, value: Option<&Value>, path: &str) -> Result<(), ConfigError> {
        match value {
            None | Some(Value::String(_)) => Ok(()),
            Some(_) => Err(self.invalid(path, "expected string")),
        }
    }

    fn one_of(
        &self,
        value: Option<&Value>,
        path: &str,
        allowed: &[&str],
    ) -> Result<(), ConfigError> {
        match value.map(Value::as_str) {
            None => Ok(()),
            Some(Some(value)) if allowed.contains(&value) => Ok(()),
            Some(_) => Err(self.invalid(
                path,
                &format!("expected one of: {}", allowed.join(", ")),
            )),
        }
    }

    fn invalid(&self, path: &str, message: &str) -> ConfigError {
        let path = if path.is_empty() { "root" } else { path };
        ConfigError::InvalidField {
            path: format!("{}:{path}", self.layer),
            message: message.to_string(),
        }
    }
}
