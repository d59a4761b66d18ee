//! Input and dataset artifact chains.
//!
//! Each output file is written on its own; a failure later in a chain leaves
//! files written earlier in place.
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{info, warn};

use crate::allowlist::filter_schema;
use crate::compiler::TypeCompiler;
use crate::config::Settings;
use crate::defaults::{self, render_module, RenderOptions};
use crate::error::{Result, SynthError};
use crate::merge::{order_root, MergePolicy};
use crate::schema::{self, load_merged};

/// Files written by a run, in write order.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub written: Vec<PathBuf>,
}

pub fn run(settings: &Settings, compiler: &dyn TypeCompiler) -> Result<Report> {
    if settings.input.schema.is_none() && settings.dataset.schema.is_none() {
        return Err(SynthError::Configuration(
            "no schema source selected; set an input schema or a dataset schema".into(),
        ));
    }
    let policy = MergePolicy::from(settings.merge.deep);
    let mut report = Report::default();

    if let Some(source) = &settings.input.schema {
        run_input(settings, source, policy, compiler, &mut report)?;
    }
    if let Some(source) = &settings.dataset.schema {
        run_dataset(settings, source, policy, compiler, &mut report)?;
    }
    Ok(report)
}

// ————————————————————————————————————————————————————————————————————————————
// INPUT
// ————————————————————————————————————————————————————————————————————————————

fn run_input(
    settings: &Settings,
    source: &Path,
    policy: MergePolicy,
    compiler: &dyn TypeCompiler,
    report: &mut Report,
) -> Result<()> {
    let input = &settings.input;
    let mut merged = load_merged(source, input.overlay.as_deref(), policy)?;
    // `position` is stripped by the filter, so it has to be applied first
    order_root(&mut merged);
    let normalized = filter_schema(&merged)?;

    if let Some(out) = &input.output {
        write_json(out, &normalized)?;
        info!(path = %out.display(), "wrote input schema");
        report.written.push(out.clone());
    }

    if input.types_out.is_none() && input.defaults_out.is_none() {
        return Ok(());
    }
    let type_name = &settings.codegen.input_type_name;
    let compiled = compiler.compile(&normalized, type_name)?;

    if let Some(out) = &input.types_out {
        write_text(out, &compiled.text)?;
        info!(path = %out.display(), "wrote input types");
        report.written.push(out.clone());
    }

    if let Some(out) = &input.defaults_out {
        let params = compiled.params(type_name);
        if params.is_empty() {
            warn!(type_name = %type_name, "no members recognized in generated input type");
        }
        let spec = defaults::synthesize(&params, &schema::defaults_index(&normalized));
        let opts = RenderOptions {
            type_name: type_name.clone(),
            types_module: settings.types_module(),
            host_env_var: settings.codegen.host_env_var.clone(),
        };
        write_text(out, &render_module(&spec, &opts))?;
        info!(
            path = %out.display(),
            defaults = spec.default_input_values.len(),
            required = spec.required_without_default.len(),
            "wrote input defaults module"
        );
        report.written.push(out.clone());
    }
    Ok(())
}

// ————————————————————————————————————————————————————————————————————————————
// DATASET
// ————————————————————————————————————————————————————————————————————————————

fn run_dataset(
    settings: &Settings,
    source: &Path,
    policy: MergePolicy,
    compiler: &dyn TypeCompiler,
    report: &mut Report,
) -> Result<()> {
    let dataset = &settings.dataset;
    let merged = load_merged(source, dataset.overlay.as_deref(), policy)?;

    if let Some(envelope) = &dataset.envelope {
        update_envelope(envelope, &merged)?;
        info!(path = %envelope.display(), "updated dataset schema envelope");
        report.written.push(envelope.clone());
    }

    if let Some(out) = &dataset.types_out {
        let compiled = compiler.compile(&merged, &settings.codegen.dataset_type_name)?;
        write_text(out, &compiled.text)?;
        info!(path = %out.display(), "wrote dataset types");
        report.written.push(out.clone());
    }
    Ok(())
}

/// Read-modify-write: replace `fields`, keep every other key.
pub fn update_envelope(path: &Path, fields: &Value) -> Result<()> {
    if !path.exists() {
        return Err(SynthError::SourceNotFound { path: path.to_path_buf() });
    }
    let mut doc: Value = crate::path_de::read_json_file(path)?;
    let Some(root) = doc.as_object_mut() else {
        return Err(SynthError::Parse {
            path: path.to_path_buf(),
            message: "dataset schema envelope must be a JSON object".into(),
        });
    };
    root.insert("fields".into(), fields.clone());
    write_json(path, &doc)
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn write_json(path: &Path, value: &Value) -> Result<()> {
    let mut src = serde_json::to_string_pretty(value)?;
    src.push('\n');
    write_text(path, &src)
}

fn write_text(path: &Path, src: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, src)?;
    Ok(())
}
