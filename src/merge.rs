//! Base/overlay schema merge engine.
//!
//! Combines two object schemas into a new tree. Scalar keys follow
//! overlay-wins, `properties` are combined key by key and re-ordered by
//! `position`, `required` becomes a deduplicated union. With
//! [`MergePolicy::Deep`] shared nested `object`/`object` and `array`/`array`
//! pairs are merged recursively; every other shared key is replaced wholesale.
//!
//! Inputs are borrowed and never mutated.
pub mod items;
pub mod order;

use indexmap::IndexSet;
use serde_json::{Map, Value};

pub use items::merge_array_node;
pub use order::{order_properties, order_root};

pub(crate) const PROPERTIES: &str = "properties";
pub(crate) const REQUIRED: &str = "required";

// ————————————————————————————————————————————————————————————————————————————
// POLICY
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// Shared properties are replaced by the overlay's value.
    #[default]
    Shallow,
    /// Shared object/array properties are merged recursively.
    Deep,
}

impl From<bool> for MergePolicy {
    fn from(deep: bool) -> Self {
        if deep { Self::Deep } else { Self::Shallow }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Composite { Object, Array }

pub(crate) fn composite_kind(node: &Value) -> Option<Composite> {
    match node.get("type").and_then(Value::as_str) {
        Some("object") => Some(Composite::Object),
        Some("array") => Some(Composite::Array),
        _ => None,
    }
}

// ————————————————————————————————————————————————————————————————————————————
// FRONT API
// ————————————————————————————————————————————————————————————————————————————

/// Merge `overlay` on top of `base`.
///
/// Both sides must be object schemas; the loader checks this before any merge
/// happens. The root always carries a `properties` map in the result.
pub fn merge(base: &Value, overlay: &Value, policy: MergePolicy) -> Value {
    debug_assert!(base.is_object() && overlay.is_object(), "merge expects object schemas");
    let empty = Map::new();
    let base = base.as_object().unwrap_or(&empty);
    let overlay = overlay.as_object().unwrap_or(&empty);

    let mut out = merge_node(base, overlay, policy);
    if !out.contains_key(PROPERTIES) {
        out.insert(PROPERTIES.into(), Value::Object(Map::new()));
    }
    Value::Object(out)
}

/// Merge two object nodes: scalar keys, `properties` and `required`.
pub fn merge_node(
    base: &Map<String, Value>,
    overlay: &Map<String, Value>,
    policy: MergePolicy,
) -> Map<String, Value> {
    // base keys keep their slot, overlay-only keys are appended
    let mut out = base.clone();
    for (key, value) in overlay {
        if key == PROPERTIES || key == REQUIRED { continue; }
        out.insert(key.clone(), value.clone());
    }

    if base.contains_key(PROPERTIES) || overlay.contains_key(PROPERTIES) {
        let props = merge_properties(properties_of(base), properties_of(overlay), policy);
        out.insert(PROPERTIES.into(), Value::Object(props));
    }

    if base.contains_key(REQUIRED) || overlay.contains_key(REQUIRED) {
        let required = union_required(base.get(REQUIRED), overlay.get(REQUIRED));
        out.insert(REQUIRED.into(), Value::Array(required));
    }

    out
}

/// Combine two property maps and order the result.
pub fn merge_properties(
    base: &Map<String, Value>,
    overlay: &Map<String, Value>,
    policy: MergePolicy,
) -> Map<String, Value> {
    let mut combined = base.clone();
    for (key, incoming) in overlay {
        let merged = match combined.get(key) {
            Some(existing) => merge_value(existing, incoming, policy),
            None => incoming.clone(),
        };
        combined.insert(key.clone(), merged);
    }
    order_properties(&combined)
}

/// Shape-gated combination of one shared value.
pub(crate) fn merge_value(base: &Value, overlay: &Value, policy: MergePolicy) -> Value {
    if policy == MergePolicy::Shallow {
        return overlay.clone();
    }
    let (Some(b), Some(o)) = (base.as_object(), overlay.as_object()) else {
        return overlay.clone();
    };
    match (composite_kind(base), composite_kind(overlay)) {
        (Some(Composite::Object), Some(Composite::Object)) => Value::Object(merge_node(b, o, policy)),
        (Some(Composite::Array), Some(Composite::Array)) => Value::Object(merge_array_node(b, o, policy)),
        _ => overlay.clone(),
    }
}

// ————————————————————————————————————————————————————————————————————————————
// UTILITIES
// ————————————————————————————————————————————————————————————————————————————

fn properties_of(node: &Map<String, Value>) -> &Map<String, Value> {
    static EMPTY: once_cell::sync::Lazy<Map<String, Value>> = once_cell::sync::Lazy::new(Map::new);
    node.get(PROPERTIES).and_then(Value::as_object).unwrap_or(&*EMPTY)
}

/// Base order first, then overlay-only additions; non-string entries dropped.
fn union_required(base: Option<&Value>, overlay: Option<&Value>) -> Vec<Value> {
    let keys = |v: Option<&Value>| {
        v.and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect::<Vec<_>>()
    };
    let mut out: IndexSet<String> = IndexSet::new();
    out.extend(keys(base));
    out.extend(keys(overlay));
    out.into_iter().map(Value::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys(v: &Value) -> Vec<&str> {
        v["properties"].as_object().unwrap().keys().map(String::as_str).collect()
    }

    fn required(v: &Value) -> Vec<&str> {
        v["required"].as_array().unwrap().iter().map(|x| x.as_str().unwrap()).collect()
    }

    #[test]
    fn required_is_deduplicated_union() {
        let a = json!({"type": "object", "properties": {}, "required": ["x", "y", "x"]});
        let b = json!({"type": "object", "properties": {}, "required": ["z", "y"]});
        let m = merge(&a, &b, MergePolicy::Shallow);
        assert_eq!(required(&m), ["x", "y", "z"]);
    }

    #[test]
    fn shallow_merge_overlay_value_wins_exactly() {
        let a = json!({"type": "object", "properties": {
            "s": {"type": "string", "minLength": 1},
            "o": {"type": "object", "properties": {"x": {"type": "string"}}},
            "l": {"type": "array", "items": {"type": "string"}, "minItems": 1},
        }});
        let b = json!({"type": "object", "properties": {
            "s": {"type": "string"},
            "o": {"type": "object", "properties": {"y": {"type": "boolean"}}},
            "l": {"type": "array", "items": {"type": "integer"}},
        }});
        let m = merge(&a, &b, MergePolicy::Shallow);
        for k in ["s", "o", "l"] {
            assert_eq!(m["properties"][k], b["properties"][k], "{k}");
        }
    }

    #[test]
    fn deep_merge_recurses_into_objects() {
        let a = json!({"type": "object", "properties": {
            "n": {"type": "object", "properties": {"x": {"type": "string"}}, "required": ["x"]}
        }});
        let b = json!({"type": "object", "properties": {
            "n": {"type": "object", "properties": {"y": {"type": "boolean"}}, "required": ["y"]}
        }});
        let m = merge(&a, &b, MergePolicy::Deep);
        let n = &m["properties"]["n"];
        assert_eq!(n["properties"], json!({"x": {"type": "string"}, "y": {"type": "boolean"}}));
        assert_eq!(n["required"], json!(["x", "y"]));
    }

    #[test]
    fn deep_merge_falls_back_to_overwrite_on_kind_mismatch() {
        let a = json!({"type": "object", "properties": {
            "n": {"type": "object", "properties": {"x": {"type": "string"}}}
        }});
        let b = json!({"type": "object", "properties": {
            "n": {"type": "array", "items": {"type": "string"}}
        }});
        let m = merge(&a, &b, MergePolicy::Deep);
        assert_eq!(m["properties"]["n"], b["properties"]["n"]);
    }

    #[test]
    fn final_position_governs_order() {
        let a = json!({"type": "object", "properties": {
            "a": {"type": "string", "position": 3},
            "b": {"type": "string"},
            "c": {"type": "string", "position": 1},
        }});
        let b = json!({"type": "object", "properties": {
            "c": {"type": "string", "position": 5},
            "d": {"type": "string", "position": 2},
        }});
        let m = merge(&a, &b, MergePolicy::Shallow);
        assert_eq!(keys(&m), ["d", "a", "c", "b"]);
    }

    #[test]
    fn root_scalars_overlay_wins_base_only_kept() {
        let a = json!({"title": "Base", "description": "base", "schemaVersion": 1, "type": "object", "properties": {}});
        let b = json!({"title": "Overlay", "type": "object", "properties": {}});
        let m = merge(&a, &b, MergePolicy::Deep);
        assert_eq!(m["title"], "Overlay");
        assert_eq!(m["description"], "base");
        assert_eq!(m["schemaVersion"], 1);
    }

    #[test]
    fn inputs_are_not_mutated() {
        let a = json!({"type": "object", "properties": {
            "n": {"type": "object", "properties": {"x": {"type": "string"}}, "required": ["x"]},
            "p": {"type": "string", "position": 2},
        }, "required": ["n"]});
        let b = json!({"type": "object", "properties": {
            "n": {"type": "object", "properties": {"y": {"type": "boolean"}}},
            "q": {"type": "string", "position": 1},
        }, "required": ["q"]});
        let (a0, b0) = (a.clone(), b.clone());
        let _ = merge(&a, &b, MergePolicy::Deep);
        let _ = merge(&a, &b, MergePolicy::Shallow);
        assert_eq!(a, a0);
        assert_eq!(b, b0);
    }

    #[test]
    fn missing_properties_is_an_empty_map() {
        let a = json!({"type": "object"});
        let b = json!({"type": "object", "properties": {"x": {"type": "string"}}});
        let m = merge(&a, &b, MergePolicy::Deep);
        assert_eq!(keys(&m), ["x"]);
        let m = merge(&a, &json!({"type": "object"}), MergePolicy::Deep);
        assert_eq!(m["properties"], json!({}));
        assert!(m.get("required").is_none());
    }
}
