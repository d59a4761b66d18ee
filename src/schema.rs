//! Loading and shape checks for schema source documents.
use std::path::Path;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Result, SynthError};
use crate::merge::{self, MergePolicy};

/// The six property kinds a schema node may declare.
pub const PROPERTY_TYPES: &[&str] = &["string", "boolean", "integer", "number", "object", "array"];

/// Declared `default` per top-level property, in property order.
pub type DefaultsIndex = IndexMap<String, Value>;

// ————————————————————————————————————————————————————————————————————————————
// LOADING
// ————————————————————————————————————————————————————————————————————————————

/// Read a primary source. A missing file is fatal.
pub fn load_source(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Err(SynthError::SourceNotFound { path: path.to_path_buf() });
    }
    crate::path_de::read_json_file(path)
}

/// Read an overlay source. A missing file means "no overlay".
pub fn load_overlay(path: Option<&Path>) -> Result<Option<Value>> {
    match path {
        None => Ok(None),
        Some(path) if !path.exists() => {
            debug!(path = %path.display(), "overlay schema not found, skipping");
            Ok(None)
        }
        Some(path) => crate::path_de::read_json_file(path).map(Some),
    }
}

/// Load `base`, validate it, and merge the overlay on top when one exists.
///
/// Without an overlay the base document is returned as read. An empty base
/// takes its content from the overlay.
pub fn load_merged(base: &Path, overlay: Option<&Path>, policy: MergePolicy) -> Result<Value> {
    let base_doc = load_source(base)?;
    let overlay_doc = load_overlay(overlay)?;

    if is_empty_doc(&base_doc) && overlay_doc.as_ref().is_none_or(is_empty_doc) {
        return Err(SynthError::Configuration(format!(
            "schema source {} is empty and no overlay adds to it",
            base.display()
        )));
    }

    let base_doc = if is_empty_doc(&base_doc) {
        debug!(base = %base.display(), "schema source is empty, building from the overlay alone");
        Value::Object(Map::new())
    } else {
        validate_shape(&base_doc)?;
        base_doc
    };
    let Some(overlay_doc) = overlay_doc else {
        return Ok(base_doc);
    };
    validate_shape(&overlay_doc)?;

    debug!(base = %base.display(), ?policy, "merging overlay schema");
    Ok(merge::merge(&base_doc, &overlay_doc, policy))
}

fn is_empty_doc(doc: &Value) -> bool {
    match doc {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

// ————————————————————————————————————————————————————————————————————————————
// SHAPE
// ————————————————————————————————————————————————————————————————————————————

/// Root must be an `object` schema and every node below it must declare a
/// known `type`.
pub fn validate_shape(schema: &Value) -> Result<()> {
    let Some(root) = schema.as_object() else {
        return Err(SynthError::shape("", "schema root must be a JSON object"));
    };
    match root.get("type").and_then(Value::as_str) {
        Some("object") => {}
        Some(other) => {
            return Err(SynthError::shape("/type", format!("root type must be \"object\", found \"{other}\"")));
        }
        None => return Err(SynthError::shape("/type", "root schema has no `type`")),
    }
    check_children(schema, "")
}

/// The declared kind of a property node.
pub fn declared_type<'a>(node: &'a Value, pointer: &str) -> Result<&'a str> {
    let ty = match node.get("type") {
        None => return Err(SynthError::shape(pointer, "property has no `type`")),
        Some(ty) => ty.as_str().ok_or_else(|| SynthError::shape(pointer, "`type` must be a string"))?,
    };
    if PROPERTY_TYPES.contains(&ty) {
        Ok(ty)
    } else {
        Err(SynthError::shape(pointer, format!("unrecognized type \"{ty}\"")))
    }
}

fn check_node(node: &Value, pointer: &str) -> Result<()> {
    declared_type(node, pointer)?;
    check_children(node, pointer)
}

fn check_children(node: &Value, pointer: &str) -> Result<()> {
    if let Some(props) = node.get("properties").and_then(Value::as_object) {
        for (key, child) in props {
            check_node(child, &format!("{pointer}/properties/{}", escape_pointer(key)))?;
        }
    }
    if let Some(items) = node.get("items").filter(|v| v.is_object()) {
        check_node(items, &format!("{pointer}/items"))?;
    }
    Ok(())
}

pub(crate) fn escape_pointer(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

// ————————————————————————————————————————————————————————————————————————————
// DEFAULTS
// ————————————————————————————————————————————————————————————————————————————

pub fn defaults_index(schema: &Value) -> DefaultsIndex {
    schema
        .get("properties")
        .and_then(Value::as_object)
        .into_iter()
        .flatten()
        .filter_map(|(key, node)| node.get("default").map(|d| (key.clone(), d.clone())))
        .collect()
}
