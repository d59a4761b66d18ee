//! The schema → TypeScript step.
//!
//! [`BuiltinCompiler`] lowers the schema itself and hands back structured
//! members; [`CommandCompiler`] shells out to an external generator and the
//! members are recovered from its text.
use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

use serde_json::Value;
use tracing::debug;

use crate::codegen::{params_from_ir, Codegen};
use crate::error::{Result, SynthError};
use crate::lower::lower_to_ir;
use crate::params::{parse_params, ParsedParam};

#[derive(Debug, Clone)]
pub struct Compiled {
    pub text: String,
    /// Root members, when the compiler can report them directly.
    pub params: Option<Vec<ParsedParam>>,
}

impl Compiled {
    /// Structured members if present, otherwise scanned from the text.
    pub fn params(&self, type_name: &str) -> Vec<ParsedParam> {
        match &self.params {
            Some(params) => params.clone(),
            None => parse_params(&self.text, type_name),
        }
    }
}

pub trait TypeCompiler {
    fn compile(&self, schema: &Value, type_name: &str) -> Result<Compiled>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCompiler;

impl TypeCompiler for BuiltinCompiler {
    fn compile(&self, schema: &Value, type_name: &str) -> Result<Compiled> {
        let ir = lower_to_ir(schema, type_name)?;
        let mut cg = Codegen::new();
        cg.emit(&ir, type_name);
        Ok(Compiled { text: cg.into_string(), params: Some(params_from_ir(&ir)) })
    }
}

/// External generator: schema JSON on stdin, TypeScript on stdout.
///
/// `{name}` in any argument is replaced by the requested type name, and the
/// schema's `title` is set to it.
#[derive(Debug, Clone)]
pub struct CommandCompiler {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandCompiler {
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self { program: program.clone(), args: args.to_vec() })
    }
}

impl TypeCompiler for CommandCompiler {
    fn compile(&self, schema: &Value, type_name: &str) -> Result<Compiled> {
        let mut titled = schema.clone();
        if let Some(root) = titled.as_object_mut() {
            root.insert("title".into(), Value::from(type_name));
        }
        let payload = serde_json::to_vec(&titled)?;
        let args: Vec<String> = self.args.iter().map(|a| a.replace("{name}", type_name)).collect();
        debug!(program = %self.program, ?args, "running external type compiler");

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| SynthError::Compiler(format!("failed to start `{}`: {e}", self.program)))?;

        // stdin is fed from its own thread while stdout/stderr are drained here
        let stdin = child.stdin.take();
        let writer = thread::spawn(move || -> std::io::Result<()> {
            if let Some(mut stdin) = stdin {
                stdin.write_all(&payload)?;
            }
            Ok(())
        });
        let output = child.wait_with_output()?;
        let fed = writer
            .join()
            .map_err(|_| SynthError::Compiler(format!("stdin writer for `{}` panicked", self.program)))?;
        if !output.status.success() {
            return Err(SynthError::Compiler(format!(
                "`{}` exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim(),
            )));
        }
        fed?;
        let text = String::from_utf8(output.stdout)
            .map_err(|e| SynthError::Compiler(format!("output is not UTF-8: {e}")))?;
        Ok(Compiled { text, params: None })
    }
}
