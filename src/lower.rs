use indexmap::IndexSet;
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::ir::{Field, Ty};
use crate::schema::{declared_type, escape_pointer};

/// Lower a schema tree to the codegen IR; the root becomes `root_name`.
///
/// Nested object names are derived from the parent name and the property key.
/// When two derivations collide, later ones get a numeric suffix.
pub fn lower_to_ir(schema: &Value, root_name: &str) -> Result<Ty> {
    let mut lowering = Lowering::default();
    lowering.taken.insert(root_name.to_owned());
    lowering.node(schema, root_name, "")
}

#[derive(Default)]
struct Lowering {
    taken: IndexSet<String>,
}

impl Lowering {
    fn node(&mut self, node: &Value, name: &str, pointer: &str) -> Result<Ty> {
        let base = match declared_type(node, pointer)? {
            "boolean" => Ty::Boolean,
            "integer" => Ty::Integer,
            "number" => Ty::Number,
            "string" => {
                let enum_ = node
                    .get("enum")
                    .and_then(Value::as_array)
                    .into_iter()
                    .flatten()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect();
                Ty::String { enum_ }
            }
            "array" => match node.get("items").filter(|v| v.is_object()) {
                Some(items) => Ty::Array(Box::new(self.node(items, &format!("{name}Item"), &format!("{pointer}/items"))?)),
                None => Ty::Array(Box::new(Ty::Unknown)),
            },
            // "object" is the only kind left after `declared_type`
            _ => self.object(node, name, pointer)?,
        };

        let nullable = node.get("nullable").and_then(Value::as_bool).unwrap_or(false);
        Ok(if nullable { Ty::Nullable(Box::new(base)) } else { base })
    }

    fn object(&mut self, node: &Value, name: &str, pointer: &str) -> Result<Ty> {
        let Some(props) = node.get("properties").and_then(Value::as_object).filter(|p| !p.is_empty()) else {
            return Ok(Ty::Map);
        };
        let name = if pointer.is_empty() { name.to_owned() } else { self.claim(name) };
        let required = node
            .get("required")
            .and_then(Value::as_array)
            .map(|xs| xs.iter().filter_map(Value::as_str).collect::<Vec<_>>())
            .unwrap_or_default();

        let mut fields = Vec::with_capacity(props.len());
        for (key, child) in props {
            let child_pointer = format!("{pointer}/properties/{}", escape_pointer(key));
            fields.push(Field {
                name: key.clone(),
                ty: self.node(child, &format!("{name}{}", pascal_case(key)), &child_pointer)?,
                required: required.contains(&key.as_str()),
                description: child.get("description").and_then(Value::as_str).map(str::to_owned),
            });
        }
        Ok(Ty::Object { name, fields })
    }

    /// `wanted`, or the first free `wanted2`, `wanted3`, ...
    fn claim(&mut self, wanted: &str) -> String {
        if self.taken.insert(wanted.to_owned()) {
            return wanted.to_owned();
        }
        let name = (2..)
            .map(|n| format!("{wanted}{n}"))
            .find(|candidate| !self.taken.contains(candidate))
            .unwrap_or_else(|| wanted.to_owned());
        debug!(wanted, assigned = %name, "nested type name already taken");
        self.taken.insert(name.clone());
        name
    }
}

pub fn pascal_case(key: &str) -> String {
    key.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}
