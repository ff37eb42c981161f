//! Layer merging.

use serde_json::Value;

/// Apply one layer on top of the merged config so far.
///
/// Objects merge key by key. Arrays and scalars in the layer replace the
/// earlier value wholesale, so a partition's seed list always comes from a
/// single layer.
pub(super) fn merge_layer(base: &mut Value, layer: Value) {
    match (base, layer) {
        (Value::Object(base_map), Value::Object(layer_map)) => {
            for (key, value) in layer_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_layer(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
