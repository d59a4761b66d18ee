//! TypeScript source for the defaults module.
use serde_json::Value;
use super::DefaultsSpec;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Name of the generated input type, e.g. `Input`.
    pub type_name: String,
    /// Module specifier the input type is imported from.
    pub types_module: String,
    /// Environment variable that marks a host which injects defaults itself.
    pub host_env_var: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            type_name: "Input".into(),
            types_module: "./input.js".into(),
            host_env_var: "APIFY_IS_AT_HOME".into(),
        }
    }
}

fn ts_string(s: &str) -> String {
    Value::from(s).to_string()
}

pub fn render_module(spec: &DefaultsSpec, opts: &RenderOptions) -> String {
    let ty = &opts.type_name;
    let with_defaults = format!("{ty}WithDefaults");
    let mut s = String::new();

    s.push_str("/* eslint-disable */\n");
    s.push_str("// Generated by schema-synth. Do not edit by hand.\n");

    let mut imports = vec![ty.clone()];
    imports.extend(spec.type_imports.iter().filter(|t| *t != ty).cloned());
    s.push_str(&format!(
        "import type {{ {} }} from {};\n\n",
        imports.join(", "),
        ts_string(&opts.types_module),
    ));

    // error type
    s.push_str("export class MissingRequiredInputError extends Error {\n");
    s.push_str("    readonly fields: readonly string[];\n\n");
    s.push_str("    constructor(fields: readonly string[]) {\n");
    s.push_str("        super(`Input is missing required fields without defaults: ${fields.join(', ')}`);\n");
    s.push_str("        this.name = 'MissingRequiredInputError';\n");
    s.push_str("        this.fields = fields;\n");
    s.push_str("    }\n");
    s.push_str("}\n\n");

    // constants
    s.push_str("export const DEFAULT_INPUT_VALUES = {\n");
    for (key, value) in &spec.default_input_values {
        s.push_str(&format!("    {}: {value},\n", ts_string(key)));
    }
    s.push_str("} as const;\n\n");

    s.push_str("export const REQUIRED_INPUT_FIELDS_WITHOUT_DEFAULT = [\n");
    for key in &spec.required_without_default {
        s.push_str(&format!("    {},\n", ts_string(key)));
    }
    s.push_str("] as const;\n\n");

    // composite type
    if spec.defaulted_types.is_empty() {
        s.push_str(&format!("export type {with_defaults} = {ty};\n\n"));
    } else {
        let keys = spec.defaulted_types.keys().map(|k| ts_string(k)).collect::<Vec<_>>();
        s.push_str(&format!("export type {with_defaults} = Omit<{ty}, {}> & {{\n", keys.join(" | ")));
        for (key, declared) in &spec.defaulted_types {
            s.push_str(&format!("    {}: {declared};\n", ts_string(key)));
        }
        s.push_str("};\n\n");
    }

    // accessor
    let env = format!("process.env.{}", opts.host_env_var);
    s.push_str(&format!("export function getInputWithDefaultValues(input?: {ty} | null): {with_defaults} {{\n"));
    s.push_str(&format!("    if ({env} === '1' || {env} === 'true') {{\n"));
    s.push_str(&format!("        return input as {with_defaults};\n"));
    s.push_str("    }\n");
    s.push_str("    let provided = input;\n");
    s.push_str("    if (provided === undefined || provided === null) {\n");
    s.push_str("        if (REQUIRED_INPUT_FIELDS_WITHOUT_DEFAULT.length > 0) {\n");
    s.push_str("            throw new MissingRequiredInputError(REQUIRED_INPUT_FIELDS_WITHOUT_DEFAULT);\n");
    s.push_str("        }\n");
    s.push_str(&format!("        provided = {{}} as {ty};\n"));
    s.push_str("    }\n");
    s.push_str(&format!("    return {{ ...DEFAULT_INPUT_VALUES, ...provided }} as {with_defaults};\n"));
    s.push_str("}\n");
    s
}
