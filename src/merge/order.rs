use ordered_float::OrderedFloat;
use serde_json::{Map, Value};

/// Numeric `position` hint; any other value counts as absent.
pub fn position_of(node: &Value) -> Option<OrderedFloat<f64>> {
    node.get("position").and_then(Value::as_f64).map(OrderedFloat)
}

/// Positioned properties first (ascending, stable), then the rest in their
/// natural order.
pub fn order_properties(props: &Map<String, Value>) -> Map<String, Value> {
    let (mut positioned, unpositioned): (Vec<_>, Vec<_>) = props
        .iter()
        .partition(|(_, node)| position_of(node).is_some());
    positioned.sort_by_key(|(_, node)| position_of(node));
    positioned
        .into_iter()
        .chain(unpositioned)
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Apply [`order_properties`] to the root `properties` of `schema` in place.
pub fn order_root(schema: &mut Value) {
    if let Some(props) = schema.get_mut("properties").and_then(Value::as_object_mut) {
        *props = order_properties(props);
    }
}
