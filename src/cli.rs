//! CLI: generate artifacts | inspect generated params
use std::path::PathBuf;
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use crate::compiler::{BuiltinCompiler, CommandCompiler, TypeCompiler};
use crate::config::Settings;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// merge JSON Schema sources and emit the normalized schema, TypeScript types and an input-defaults module
#[derive(Parser, Debug)]
#[command(name = "schema-synth", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// merge sources and write the selected artifacts
    Generate(GenerateOut),
    /// print the members recovered from a generated declaration file
    Params(ParamsOut),
}

#[derive(Args, Debug, Clone)]
struct InputSourceSettings {
    /// base input schema
    #[arg(long)]
    input_schema: Option<PathBuf>,

    /// overlay merged on top of the input schema (skipped if the file is missing)
    #[arg(long)]
    add_input_schema: Option<PathBuf>,

    /// where to write the normalized input schema
    #[arg(long)]
    output_input_schema: Option<PathBuf>,

    /// where to write the input TypeScript declarations
    #[arg(long)]
    input_types_out: Option<PathBuf>,

    /// where to write the input defaults module
    #[arg(long)]
    defaults_out: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct DatasetSourceSettings {
    /// base dataset item schema
    #[arg(long)]
    dataset_schema: Option<PathBuf>,

    /// overlay merged on top of the dataset schema (skipped if the file is missing)
    #[arg(long)]
    add_dataset_schema: Option<PathBuf>,

    /// existing dataset schema document whose `fields` key is replaced
    #[arg(long)]
    dataset_envelope: Option<PathBuf>,

    /// where to write the dataset TypeScript declarations
    #[arg(long)]
    dataset_types_out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct GenerateOut {
    /// config file (defaults to ./schema-synth.toml when present)
    #[arg(long, short)]
    config: Option<PathBuf>,

    #[command(flatten)]
    input: InputSourceSettings,

    #[command(flatten)]
    dataset: DatasetSourceSettings,

    /// merge shared object/array properties recursively
    #[arg(long)]
    deep_merge: bool,

    /// external type compiler, split on whitespace (built-in emitter if omitted)
    #[arg(long)]
    compiler_command: Option<String>,

    /// debugging: print the resolved settings and exit
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct ParamsOut {
    /// generated TypeScript declarations
    #[arg(long)]
    types: PathBuf,

    /// declaration to read
    #[arg(long, default_value = "Input")]
    type_name: String,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl GenerateOut {
    fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings = Settings::load(self.config.as_deref()).context("failed to load settings")?;
        let input = &mut settings.input;
        override_path(&mut input.schema, &self.input.input_schema);
        override_path(&mut input.overlay, &self.input.add_input_schema);
        override_path(&mut input.output, &self.input.output_input_schema);
        override_path(&mut input.types_out, &self.input.input_types_out);
        override_path(&mut input.defaults_out, &self.input.defaults_out);

        let dataset = &mut settings.dataset;
        override_path(&mut dataset.schema, &self.dataset.dataset_schema);
        override_path(&mut dataset.overlay, &self.dataset.add_dataset_schema);
        override_path(&mut dataset.envelope, &self.dataset.dataset_envelope);
        override_path(&mut dataset.types_out, &self.dataset.dataset_types_out);

        if self.deep_merge {
            settings.merge.deep = true;
        }
        if let Some(command) = &self.compiler_command {
            settings.codegen.command = command.split_whitespace().map(str::to_owned).collect();
        }
        Ok(settings)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Generate(target) => {
                let settings = target.settings()?;
                // debug path
                if target.no_op {
                    eprintln!("{settings:#?}");
                    return Ok(());
                }

                let compiler: Box<dyn TypeCompiler> = match CommandCompiler::from_argv(&settings.codegen.command) {
                    Some(command) => Box::new(command),
                    None => Box::new(BuiltinCompiler),
                };
                let report = crate::pipeline::run(&settings, compiler.as_ref())
                    .context("schema synthesis failed")?;
                eprintln!("{} {} file(s) written", "done:".green().bold(), report.written.len());
                Ok(())
            }
            Command::Params(target) => {
                let source = std::fs::read_to_string(&target.types)
                    .with_context(|| format!("failed to read {}", target.types.display()))?;
                let params = crate::params::parse_params(&source, &target.type_name);
                let params_src = serde_json::to_string_pretty(&params)?;
                if let Some(out) = target.out.as_ref() {
                    if let Some(parent) = out.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(out, &params_src)?;
                } else {
                    println!("{params_src}");
                }
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn override_path(slot: &mut Option<PathBuf>, flag: &Option<PathBuf>) {
    if let Some(path) = flag {
        *slot = Some(path.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_settings() {
        let cli = CommandLineInterface::parse_from([
            "schema-synth", "generate",
            "--config", "/nonexistent/ignored-by-no-op.toml",
            "--input-schema", "in.json",
            "--deep-merge",
            "--compiler-command", "json2ts --strictIndexSignatures",
        ]);
        let Command::Generate(target) = &cli.cmd else { panic!("generate expected") };
        assert_eq!(target.input.input_schema.as_deref(), Some(std::path::Path::new("in.json")));
        assert!(target.deep_merge);
        // an explicit config path that does not exist is reported
        assert!(target.settings().is_err());
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        CommandLineInterface::command().debug_assert();
    }
}
