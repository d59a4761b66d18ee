//! Strip keys the persisted input schema is not allowed to carry.
//!
//! The lookup is flat: root keys and each top-level property's keys are
//! checked, nested property contents are copied as they are.
use serde_json::{Map, Value};

use crate::error::{Result, SynthError};
use crate::schema::{declared_type, escape_pointer};

pub const ROOT_KEYS: &[&str] = &["title", "description", "type", "schemaVersion", "properties", "required"];

const COMMON_KEYS: &[&str] = &[
    "title", "type", "description", "default", "prefill", "example",
    "editor", "nullable", "sectionCaption", "sectionDescription",
];

const STRING_KEYS: &[&str] = &["pattern", "minLength", "maxLength", "enum", "enumTitles", "isSecret"];
const BOOLEAN_KEYS: &[&str] = &["groupCaption", "groupDescription"];
const NUMERIC_KEYS: &[&str] = &["minimum", "maximum", "unit"];
const OBJECT_KEYS: &[&str] = &[
    "patternKey", "patternValue", "minProperties", "maxProperties",
    "properties", "required", "additionalProperties", "isSecret",
];
const ARRAY_KEYS: &[&str] = &[
    "placeholderKey", "placeholderValue", "patternKey", "patternValue",
    "minItems", "maxItems", "uniqueItems",
];

/// `items` survives only on arrays rendered with this editor.
pub const SELECT_EDITOR: &str = "select";

fn type_keys(ty: &str) -> &'static [&'static str] {
    match ty {
        "string" => STRING_KEYS,
        "boolean" => BOOLEAN_KEYS,
        "integer" | "number" => NUMERIC_KEYS,
        "object" => OBJECT_KEYS,
        "array" => ARRAY_KEYS,
        _ => &[],
    }
}

fn allowed(ty: &str, key: &str, node: &Map<String, Value>) -> bool {
    if COMMON_KEYS.contains(&key) || type_keys(ty).contains(&key) {
        return true;
    }
    ty == "array" && key == "items"
        && node.get("editor").and_then(Value::as_str) == Some(SELECT_EDITOR)
}

pub fn filter_schema(schema: &Value) -> Result<Value> {
    let root = schema
        .as_object()
        .ok_or_else(|| SynthError::shape("", "schema root must be a JSON object"))?;

    let mut out = Map::new();
    for (key, value) in root {
        if !ROOT_KEYS.contains(&key.as_str()) { continue; }
        let value = match (key.as_str(), value) {
            ("properties", Value::Object(props)) => Value::Object(filter_properties(props)?),
            _ => value.clone(),
        };
        out.insert(key.clone(), value);
    }
    Ok(Value::Object(out))
}

fn filter_properties(props: &Map<String, Value>) -> Result<Map<String, Value>> {
    let mut out = Map::new();
    for (name, node) in props {
        let pointer = format!("/properties/{}", escape_pointer(name));
        let ty = declared_type(node, &pointer)?;
        let node = node
            .as_object()
            .ok_or_else(|| SynthError::shape(&pointer, "property must be a JSON object"))?;
        let kept: Map<String, Value> = node
            .iter()
            .filter(|(key, _)| allowed(ty, key, node))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        out.insert(name.clone(), Value::Object(kept));
    }
    Ok(out)
}
