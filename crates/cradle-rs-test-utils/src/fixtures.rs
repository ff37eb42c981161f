use cradle_rs_store::Fields;
use serde_json::{Value, json};

/// Convert a JSON object literal into a field set.
///
/// Panics when `value` is not an object.
pub fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// `{"name": name, "gender": gender}` as record fields.
pub fn name_fields(name: &str, gender: &str) -> Fields {
    fields(json!({ "name": name, "gender": gender }))
}
