//! Minimal TypeScript emitter over `ir::Ty`.
//!
//! Every `Ty::Object` becomes an `export interface`; the root comes first and
//! nested interfaces follow in discovery order. Member types always fit on one
//! line so the output can be read back by `params::parse_params`.
use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::ir::{Field, Ty};
use crate::params::ParsedParam;

static IDENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_$][\w$]*$").expect("ident pattern is valid"));

pub struct Codegen {
    out: String,
    emitted: IndexSet<String>,
}

impl Codegen {
    pub fn new() -> Self {
        Self {
            out: String::from("/* eslint-disable */\n// Generated by schema-synth. Do not edit by hand.\n"),
            emitted: IndexSet::new(),
        }
    }

    /// Emit `root` under `name`. Non-object roots become an open map.
    pub fn emit(&mut self, root: &Ty, name: &str) {
        match root {
            Ty::Object { fields, .. } => self.emit_interface(name, fields),
            Ty::Nullable(inner) => self.emit(inner, name),
            _ => {
                self.out.push_str(&format!("\nexport interface {name} {{\n  [k: string]: unknown;\n}}\n"));
            }
        }
    }

    pub fn into_string(self) -> String {
        self.out
    }

    fn emit_interface(&mut self, name: &str, fields: &[Field]) {
        if !self.emitted.insert(name.to_owned()) {
            return;
        }
        self.out.push_str(&format!("\nexport interface {name} {{\n"));
        for f in fields {
            if let Some(desc) = &f.description {
                self.out.push_str("  /**\n");
                for line in desc.lines() {
                    self.out.push_str(&format!("   * {}\n", line.replace("*/", "*\\/")));
                }
                self.out.push_str("   */\n");
            }
            let opt = if f.required { "" } else { "?" };
            self.out.push_str(&format!("  {}{opt}: {};\n", ts_key(&f.name), ts_type(&f.ty)));
        }
        self.out.push_str("}\n");

        for f in fields {
            for (nested_name, nested_fields) in nested_objects(&f.ty) {
                self.emit_interface(nested_name, nested_fields);
            }
        }
    }
}

impl Default for Codegen {
    fn default() -> Self { Self::new() }
}

/// Members of the root object as the parser would report them.
pub fn params_from_ir(root: &Ty) -> Vec<ParsedParam> {
    match root {
        Ty::Object { fields, .. } => fields
            .iter()
            .map(|f| ParsedParam {
                key: f.name.clone(),
                declared_type: ts_type(&f.ty),
                optional: !f.required,
            })
            .collect(),
        Ty::Nullable(inner) => params_from_ir(inner),
        _ => Vec::new(),
    }
}

pub fn ts_type(ty: &Ty) -> String {
    match ty {
        Ty::Unknown => "unknown".into(),
        Ty::Boolean => "boolean".into(),
        Ty::Integer | Ty::Number => "number".into(),
        Ty::String { enum_ } if enum_.is_empty() => "string".into(),
        Ty::String { enum_ } => enum_
            .iter()
            .map(|lit| serde_json::Value::from(lit.as_str()).to_string())
            .collect::<Vec<_>>()
            .join(" | "),
        Ty::Array(item) => {
            let inner = ts_type(item);
            if is_union(item) { format!("({inner})[]") } else { format!("{inner}[]") }
        }
        Ty::Map => "{ [k: string]: unknown }".into(),
        Ty::Object { name, .. } => name.clone(),
        Ty::Nullable(inner) => format!("{} | null", ts_type(inner)),
    }
}

fn is_union(ty: &Ty) -> bool {
    match ty {
        Ty::String { enum_ } => enum_.len() > 1,
        Ty::Nullable(_) => true,
        _ => false,
    }
}

fn ts_key(key: &str) -> String {
    if IDENT_RE.is_match(key) {
        key.to_owned()
    } else {
        serde_json::Value::from(key).to_string()
    }
}

fn nested_objects(ty: &Ty) -> Vec<(&str, &[Field])> {
    match ty {
        Ty::Object { name, fields } => vec![(name.as_str(), fields.as_slice())],
        Ty::Array(inner) | Ty::Nullable(inner) => nested_objects(inner),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lower::lower_to_ir;
    use crate::params::parse_params;
    use serde_json::json;

    fn schema() -> serde_json::Value {
        json!({"type": "object", "properties": {
            "startUrls": {
                "type": "array",
                "description": "Pages to start from.\nOne per line.",
                "items": {"type": "object", "properties": {"url": {"type": "string"}}, "required": ["url"]},
            },
            "max-depth": {"type": "integer", "default": 3},
            "mode": {"type": "string", "enum": ["fast", "slow"]},
            "modes": {"type": "array", "items": {"type": "string", "enum": ["a", "b"]}},
            "proxy": {"type": "object", "nullable": true, "properties": {"useApify": {"type": "boolean"}}},
            "headers": {"type": "object"},
        }, "required": ["startUrls"]})
    }

    #[test]
    fn emits_root_then_nested_interfaces() {
        let ir = lower_to_ir(&schema(), "Input").unwrap();
        let mut cg = Codegen::new();
        cg.emit(&ir, "Input");
        let src = cg.into_string();
        let root_at = src.find("export interface Input {").unwrap();
        let item_at = src.find("export interface InputStartUrlsItem {").unwrap();
        let proxy_at = src.find("export interface InputProxy {").unwrap();
        assert!(root_at < item_at && item_at < proxy_at);
        assert!(src.contains("  startUrls: InputStartUrlsItem[];\n"));
        assert!(src.contains("  \"max-depth\"?: number;\n"));
        assert!(src.contains("  modes?: (\"a\" | \"b\")[];\n"));
        assert!(src.contains("  proxy?: InputProxy | null;\n"));
        assert!(src.contains("   * One per line.\n"));
    }

    #[test]
    fn text_parse_agrees_with_structured_params() {
        let ir = lower_to_ir(&schema(), "Input").unwrap();
        let mut cg = Codegen::new();
        cg.emit(&ir, "Input");
        assert_eq!(parse_params(&cg.into_string(), "Input"), params_from_ir(&ir));
    }

    #[test]
    fn colliding_nested_shapes_each_get_an_interface() {
        let schema = json!({"type": "object", "properties": {
            "a-b": {"type": "object", "properties": {"x": {"type": "string"}}},
            "aB": {"type": "object", "properties": {"y": {"type": "number"}}},
        }});
        let ir = lower_to_ir(&schema, "Input").unwrap();
        let mut cg = Codegen::new();
        cg.emit(&ir, "Input");
        let src = cg.into_string();
        assert!(src.contains("  \"a-b\"?: InputAB;\n"));
        assert!(src.contains("  aB?: InputAB2;\n"));
        assert!(src.contains("export interface InputAB {\n  x?: string;\n}"));
        assert!(src.contains("export interface InputAB2 {\n  y?: number;\n}"));
    }

    #[test]
    fn empty_root_is_an_open_interface() {
        let ir = lower_to_ir(&json!({"type": "object", "properties": {}}), "Input").unwrap();
        let mut cg = Codegen::new();
        cg.emit(&ir, "Input");
        let src = cg.into_string();
        assert!(src.contains("export interface Input {\n  [k: string]: unknown;\n}"));
        assert!(parse_params(&src, "Input").is_empty());
        assert!(params_from_ir(&ir).is_empty());
    }
}
