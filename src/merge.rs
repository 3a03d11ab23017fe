//! Structural merging of JSON trees.
//!
//! Used whenever two layers ship the same structured configuration file.
//! Everything here is pure: identical inputs always produce identical output,
//! including key order (serde_json is built with `preserve_order`).

use serde_json::{Map, Value};

use crate::constants::DEPENDENCY_FIELDS;

/// Deep-merges `incoming` into `base`.
///
/// * Two objects: union of keys. Shared keys are merged recursively, keys
///   already in `base` keep their position and new keys are appended.
/// * Two arrays: `base` followed by `incoming`, dropping repeated scalars.
///   Objects and arrays inside arrays are never deduplicated.
/// * Anything else: `incoming` wins.
///
/// # Example
/// ```
/// use serde_json::json;
/// use strata::merge::deep_merge;
///
/// let merged = deep_merge(&json!({"a": [1, 2]}), &json!({"a": [2, 3], "b": true}));
/// assert_eq!(merged, json!({"a": [1, 2, 3], "b": true}));
/// ```
pub fn deep_merge(base: &Value, incoming: &Value) -> Value {
    match (base, incoming) {
        (Value::Object(base), Value::Object(incoming)) => {
            let mut merged = base.clone();
            for (key, value) in incoming {
                let value = match base.get(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), value);
            }
            Value::Object(merged)
        }
        (Value::Array(base), Value::Array(incoming)) => {
            Value::Array(merge_arrays(base, incoming))
        }
        (_, incoming) => incoming.clone(),
    }
}

fn merge_arrays(base: &[Value], incoming: &[Value]) -> Vec<Value> {
    let mut merged: Vec<Value> = Vec::with_capacity(base.len() + incoming.len());
    for item in base.iter().chain(incoming) {
        if is_scalar(item) && merged.contains(item) {
            continue;
        }
        merged.push(item.clone());
    }
    merged
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Object(_) | Value::Array(_))
}

/// Sorts every known dependency group of a manifest by package name.
///
/// Version strings are untouched and each group keeps its position in the
/// manifest. Missing groups, and manifests that are not objects, pass through.
pub fn sort_dependencies(manifest: Value) -> Value {
    let Value::Object(mut manifest) = manifest else {
        return manifest;
    };

    for field in DEPENDENCY_FIELDS {
        if let Some(Value::Object(group)) = manifest.get_mut(field) {
            let mut entries: Vec<(String, Value)> = std::mem::take(group).into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            *group = entries.into_iter().collect::<Map<String, Value>>();
        }
    }

    Value::Object(manifest)
}
