use serde_json::{Map, Value};
use super::MergePolicy;

const ITEMS: &str = "items";

/// Merge two `array` nodes: sibling keywords follow overlay-wins, `items` goes
/// through the same shape-gated recursion as properties.
pub fn merge_array_node(
    base: &Map<String, Value>,
    overlay: &Map<String, Value>,
    policy: MergePolicy,
) -> Map<String, Value> {
    let mut out = base.clone();
    for (key, value) in overlay {
        if key == ITEMS { continue; }
        out.insert(key.clone(), value.clone());
    }

    let items = match (base.get(ITEMS), overlay.get(ITEMS)) {
        (Some(b), Some(o)) => Some(super::merge_value(b, o, policy)),
        (Some(only), None) | (None, Some(only)) => Some(only.clone()),
        (None, None) => None,
    };
    if let Some(items) = items {
        out.insert(ITEMS.into(), items);
    }
    out
}
