//! Recover the member list of a generated TypeScript declaration.
//!
//! Reads compiler output line by line. Only members at the top level of the
//! target block are reported; nested literal types are captured as part of
//! their member's type text.
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedParam {
    pub key: String,
    /// Type expression as written, opaque to this module.
    pub declared_type: String,
    pub optional: bool,
}

static FIELD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^\s*(?:readonly\s+)?(?P<key>[A-Za-z_$][\w$]*|"(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*')(?P<opt>\?)?\s*:\s*(?P<ty>.+?)\s*$"#,
    )
    .expect("field pattern is valid")
});

fn block_start(type_name: &str) -> Regex {
    let name = regex::escape(type_name);
    Regex::new(&format!(
        r"^\s*(?:export\s+)?(?:declare\s+)?(?:interface\s+{name}\b[^{{]*\{{|type\s+{name}\s*=\s*\{{)"
    ))
    .expect("block pattern is valid")
}

/// Members of `type_name` in declaration order; empty when the block is absent.
pub fn parse_params(generated: &str, type_name: &str) -> Vec<ParsedParam> {
    let start = block_start(type_name);
    let mut lines = generated.lines();
    let Some(opening) = lines.by_ref().find(|line| start.is_match(line)) else {
        return Vec::new();
    };

    let mut depth = brace_delta(opening);
    if depth <= 0 {
        return inline_members(opening);
    }

    let mut out = Vec::new();
    // member whose type spans several lines: (key, optional, text so far)
    let mut pending: Option<(String, bool, String)> = None;

    for line in lines {
        if depth <= 0 { break; }
        let trimmed = line.trim();

        if let Some((key, optional, mut ty)) = pending.take() {
            ty.push(' ');
            ty.push_str(trimmed);
            depth += brace_delta(trimmed);
            if depth == 1 {
                out.push(param(key, optional, &ty));
            } else {
                pending = Some((key, optional, ty));
            }
            continue;
        }

        if is_comment(trimmed) { continue; }

        if depth == 1 {
            if let Some(caps) = FIELD_RE.captures(line) {
                let key = unquote(&caps["key"]);
                let optional = caps.name("opt").is_some();
                let ty = &caps["ty"];
                let delta = brace_delta(ty);
                if delta > 0 {
                    depth += delta;
                    pending = Some((key, optional, ty.to_owned()));
                } else {
                    out.push(param(key, optional, ty));
                }
                continue;
            }
        }

        depth += brace_delta(trimmed);
    }
    out
}

/// Members of a block opened and closed on one line, split on `;`.
fn inline_members(line: &str) -> Vec<ParsedParam> {
    let (Some(open), Some(close)) = (line.find('{'), line.rfind('}')) else {
        return Vec::new();
    };
    if close <= open {
        return Vec::new();
    }
    line[open + 1..close]
        .split(';')
        .filter_map(|member| FIELD_RE.captures(member))
        .map(|caps| param(unquote(&caps["key"]), caps.name("opt").is_some(), &caps["ty"]))
        .collect()
}

fn param(key: String, optional: bool, ty: &str) -> ParsedParam {
    ParsedParam {
        key,
        declared_type: ty.trim().trim_end_matches(';').trim_end().to_owned(),
        optional,
    }
}

fn brace_delta(text: &str) -> i32 {
    text.chars().fold(0, |acc, c| match c {
        '{' => acc + 1,
        '}' => acc - 1,
        _ => acc,
    })
}

fn is_comment(line: &str) -> bool {
    line.starts_with("/*") || line.starts_with('*') || line.starts_with("//")
}

fn unquote(key: &str) -> String {
    if key.starts_with('"') {
        serde_json::from_str::<String>(key).unwrap_or_else(|_| key.trim_matches('"').to_owned())
    } else if key.starts_with('\'') {
        key.trim_matches('\'').to_owned()
    } else {
        key.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(key: &str, ty: &str, optional: bool) -> ParsedParam {
        ParsedParam { key: key.into(), declared_type: ty.into(), optional }
    }

    const GENERATED: &str = r#"/* eslint-disable */
/**
 * This file was automatically generated.
 */

export interface Input {
  /**
   * Start URLs: a list of pages
   */
  startUrls: string[];
  maxDepth?: number;
  mode?: "fast" | "thorough";
  proxy?: ProxyConfiguration | null;
  "output-format"?: string;
  readonly headers: {
    [k: string]: unknown;
  };
  [k: string]: unknown;
}

export interface ProxyConfiguration {
  useApify?: boolean;
}
"#;

    #[test]
    fn reads_members_in_declaration_order() {
        let params = parse_params(GENERATED, "Input");
        assert_eq!(params, vec![
            p("startUrls", "string[]", false),
            p("maxDepth", "number", true),
            p("mode", r#""fast" | "thorough""#, true),
            p("proxy", "ProxyConfiguration | null", true),
            p("output-format", "string", true),
            p("headers", "{ [k: string]: unknown; }", false),
        ]);
    }

    #[test]
    fn stops_at_the_closing_brace() {
        let params = parse_params(GENERATED, "Input");
        assert!(params.iter().all(|p| p.key != "useApify"));
        let other = parse_params(GENERATED, "ProxyConfiguration");
        assert_eq!(other, vec![p("useApify", "boolean", true)]);
    }

    #[test]
    fn type_literal_form_is_recognized() {
        let text = "export type Input = {\n  a: string;\n  b?: boolean | number;\n};\n";
        assert_eq!(parse_params(text, "Input"), vec![
            p("a", "string", false),
            p("b", "boolean | number", true),
        ]);
    }

    #[test]
    fn single_line_block_is_scanned() {
        let text = "export interface Input { a: string; b?: number; [k: string]: unknown; }\n";
        assert_eq!(parse_params(text, "Input"), vec![p("a", "string", false), p("b", "number", true)]);
        assert!(parse_params("export interface Input {}\n", "Input").is_empty());
    }

    #[test]
    fn missing_block_yields_nothing() {
        assert!(parse_params("export interface Output {\n  a: string;\n}\n", "Input").is_empty());
        assert!(parse_params("", "Input").is_empty());
        // a longer name sharing the prefix is a different block
        assert!(parse_params("export interface InputExtra {\n  a: string;\n}\n", "Input").is_empty());
    }
}
