//! Classify generated parameters against declared defaults.
//!
//! A parameter lands in one of two derived lists:
//! - optional with a default → [`DefaultsSpec::default_input_values`]
//! - required without a default → [`DefaultsSpec::required_without_default`]
//!
//! Optional parameters without a default and required parameters with one
//! are left to the type alone.
pub mod render;

use indexmap::{IndexMap, IndexSet};
use serde_json::{Map, Value};

use crate::error::{Result, SynthError};
use crate::params::ParsedParam;
use crate::schema::DefaultsIndex;

pub use render::{render_module, RenderOptions};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefaultsSpec {
    pub default_input_values: IndexMap<String, Value>,
    pub required_without_default: Vec<String>,
    /// Declared types of the defaulted parameters, in parameter order.
    pub defaulted_types: IndexMap<String, String>,
    /// Capitalized type names the defaulted parameters refer to.
    pub type_imports: Vec<String>,
}

/// Whether the hosting platform fills defaults in before the program starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEnv {
    Local,
    DefaultsInjected,
}

impl HostEnv {
    /// `var` set to `1` or `true` means the host injects defaults.
    pub fn detect(var: &str) -> Self {
        Self::from_flag(std::env::var(var).ok().as_deref())
    }

    pub fn from_flag(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("1") | Some("true") => Self::DefaultsInjected,
            _ => Self::Local,
        }
    }
}

pub fn synthesize(params: &[ParsedParam], defaults: &DefaultsIndex) -> DefaultsSpec {
    let mut spec = DefaultsSpec::default();
    let mut imports: IndexSet<String> = IndexSet::new();

    for param in params {
        match (param.optional, defaults.get(&param.key)) {
            (true, Some(value)) => {
                spec.default_input_values.insert(param.key.clone(), value.clone());
                spec.defaulted_types.insert(param.key.clone(), param.declared_type.clone());
                imports.extend(named_types(&param.declared_type));
            }
            (false, None) => spec.required_without_default.push(param.key.clone()),
            _ => {}
        }
    }

    spec.type_imports = imports.into_iter().collect();
    spec
}

/// Union members that look like named types (`Foo`, `Foo[]`).
fn named_types(declared: &str) -> impl Iterator<Item = String> + '_ {
    declared
        .split('|')
        .map(|arm| arm.trim().trim_end_matches("[]").trim())
        .filter(|arm| arm.chars().next().is_some_and(|c| c.is_ascii_uppercase()))
        .filter(|arm| arm.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$'))
        .map(str::to_owned)
}

impl DefaultsSpec {
    /// Apply the defaults to a caller-supplied input.
    ///
    /// Defaults form the base layer and the input is laid over it. Nothing is
    /// validated beyond the missing-input check.
    pub fn input_with_default_values(&self, input: Option<&Value>, host: HostEnv) -> Result<Value> {
        if host == HostEnv::DefaultsInjected {
            return Ok(input.cloned().unwrap_or(Value::Null));
        }

        let supplied = match input {
            None | Some(Value::Null) => {
                if !self.required_without_default.is_empty() {
                    return Err(SynthError::MissingRequiredInput {
                        fields: self.required_without_default.clone(),
                    });
                }
                Map::new()
            }
            Some(Value::Object(map)) => map.clone(),
            Some(other) => return Ok(other.clone()),
        };

        let mut out: Map<String, Value> = self
            .default_input_values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (key, value) in supplied {
            out.insert(key, value);
        }
        Ok(Value::Object(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn param(key: &str, ty: &str, optional: bool) -> ParsedParam {
        ParsedParam { key: key.into(), declared_type: ty.into(), optional }
    }

    fn fixture() -> DefaultsSpec {
        let params = vec![
            param("field1", "string", false),
            param("field2", "number", true),
            param("field3", "boolean", true),
        ];
        let defaults: DefaultsIndex = [("field2".to_owned(), json!(42)), ("field3".to_owned(), json!(true))]
            .into_iter()
            .collect();
        synthesize(&params, &defaults)
    }

    #[test]
    fn classifies_defaults_and_required_fields() {
        let spec = fixture();
        assert_eq!(
            serde_json::to_value(&spec.default_input_values).unwrap(),
            json!({"field2": 42, "field3": true}),
        );
        assert_eq!(spec.required_without_default, ["field1"]);
    }

    #[test]
    fn mixed_combinations_stay_out_of_both_lists() {
        let params = vec![
            param("requiredWithDefault", "number", false),
            param("optionalWithout", "string", true),
        ];
        let defaults: DefaultsIndex = [("requiredWithDefault".to_owned(), json!(1))].into_iter().collect();
        let spec = synthesize(&params, &defaults);
        assert!(spec.default_input_values.is_empty());
        assert!(spec.required_without_default.is_empty());
    }

    #[test]
    fn fills_defaults_under_the_input() {
        let spec = fixture();
        let out = spec.input_with_default_values(Some(&json!({"field1": "x"})), HostEnv::Local).unwrap();
        assert_eq!(out, json!({"field1": "x", "field2": 42, "field3": true}));

        let out = spec
            .input_with_default_values(Some(&json!({"field1": "x", "field2": 100})), HostEnv::Local)
            .unwrap();
        assert_eq!(out, json!({"field1": "x", "field2": 100, "field3": true}));
    }

    #[test]
    fn missing_input_names_required_fields() {
        let spec = fixture();
        for input in [None, Some(&Value::Null)] {
            match spec.input_with_default_values(input, HostEnv::Local) {
                Err(SynthError::MissingRequiredInput { fields }) => assert_eq!(fields, ["field1"]),
                other => panic!("unexpected: {other:?}"),
            }
        }
    }

    #[test]
    fn missing_input_without_required_fields_uses_defaults() {
        let params = vec![param("limit", "number", true), param("debug", "boolean", true)];
        let defaults: DefaultsIndex = [("limit".to_owned(), json!(10))].into_iter().collect();
        let spec = synthesize(&params, &defaults);
        assert_eq!(spec.input_with_default_values(None, HostEnv::Local).unwrap(), json!({"limit": 10}));
    }

    #[test]
    fn injected_host_passes_input_through() {
        let spec = fixture();
        let input = json!({"field1": "x"});
        assert_eq!(spec.input_with_default_values(Some(&input), HostEnv::DefaultsInjected).unwrap(), input);
        assert_eq!(HostEnv::from_flag(Some("1")), HostEnv::DefaultsInjected);
        assert_eq!(HostEnv::from_flag(Some("0")), HostEnv::Local);
        assert_eq!(HostEnv::from_flag(None), HostEnv::Local);
        assert_eq!(HostEnv::detect("SCHEMA_SYNTH_TEST_UNSET_HOST_FLAG"), HostEnv::Local);
    }

    #[test]
    fn type_imports_collect_named_types() {
        let params = vec![
            param("proxy", "ProxyConfiguration | null", true),
            param("sources", "RequestSource[]", true),
            param("again", "ProxyConfiguration", true),
            param("mode", r#""fast" | "Slow""#, true),
            param("required", "Other", false),
        ];
        let defaults: DefaultsIndex = ["proxy", "sources", "again", "mode", "required"]
            .into_iter()
            .map(|k| (k.to_owned(), json!(null)))
            .collect();
        let spec = synthesize(&params, &defaults);
        assert_eq!(spec.type_imports, ["ProxyConfiguration", "RequestSource"]);
    }
}
