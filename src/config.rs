//! Layered settings for a synthesis run.
//!
//! Sources, lowest precedence first:
//! - built-in defaults
//! - config file (`schema-synth.toml` in the working directory, or `--config`)
//! - environment variables (`SCHEMA_SYNTH__<SECTION>__<KEY>`)
//! - command-line flags (applied by `cli`)
//!
//! ## Example config file (schema-synth.toml):
//! ```toml
//! [input]
//! schema = ".actor/input_schema.json"
//! overlay = ".actor/input_schema.local.json"
//! output = "dist/input_schema.json"
//! types_out = "src/generated/input.ts"
//! defaults_out = "src/generated/input-defaults.ts"
//!
//! [dataset]
//! schema = "schemas/dataset_item.json"
//! envelope = ".actor/dataset_schema.json"
//!
//! [merge]
//! deep = true
//!
//! [codegen]
//! command = ["json2ts", "--bannerComment", ""]
//! ```

use std::path::{Path, PathBuf};
use config_crate::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{Result, SynthError};

pub const DEFAULT_CONFIG_FILE: &str = "schema-synth.toml";
pub const ENV_PREFIX: &str = "SCHEMA_SYNTH";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub input: InputSettings,
    pub dataset: DatasetSettings,
    pub merge: MergeSettings,
    pub codegen: CodegenSettings,
}

/// Input schema chain
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    pub schema: Option<PathBuf>,
    pub overlay: Option<PathBuf>,
    /// Normalized schema output
    pub output: Option<PathBuf>,
    pub types_out: Option<PathBuf>,
    pub defaults_out: Option<PathBuf>,
}

/// Dataset schema chain
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatasetSettings {
    pub schema: Option<PathBuf>,
    pub overlay: Option<PathBuf>,
    /// Existing document whose `fields` key receives the merged schema
    pub envelope: Option<PathBuf>,
    pub types_out: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MergeSettings {
    pub deep: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CodegenSettings {
    pub input_type_name: String,
    pub dataset_type_name: String,
    /// Set to `1`/`true` on hosts that inject input defaults themselves
    pub host_env_var: String,
    /// Import specifier of the input types; derived from `input.types_out` when unset
    pub types_module: Option<String>,
    /// External compiler argv; empty selects the built-in emitter
    pub command: Vec<String>,
}

impl Default for CodegenSettings {
    fn default() -> Self {
        Self {
            input_type_name: "Input".into(),
            dataset_type_name: "DatasetItem".into(),
            host_env_var: "APIFY_IS_AT_HOME".into(),
            types_module: None,
            command: Vec::new(),
        }
    }
}

impl Settings {
    /// Load from `path` (must exist) or the default file (optional), then the
    /// environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) if !path.exists() => {
                return Err(SynthError::SourceNotFound { path: path.to_path_buf() });
            }
            Some(path) => File::from(path),
            None => File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
        };
        let settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__").try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Import specifier for the generated input types.
    pub fn types_module(&self) -> String {
        if let Some(module) = &self.codegen.types_module {
            return module.clone();
        }
        match self.input.types_out.as_deref().and_then(Path::file_stem) {
            Some(stem) => format!("./{}.js", stem.to_string_lossy()),
            None => "./input.js".into(),
        }
    }
}
