//! Error types for schema synthesis

use std::path::PathBuf;
use thiserror::Error;

/// Result type for synthesis operations
pub type Result<T> = std::result::Result<T, SynthError>;

#[derive(Error, Debug)]
pub enum SynthError {
    /// Nothing to do, or every selected source is empty.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("schema source not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    /// `pointer` is a JSON Pointer into the offending document.
    #[error("invalid schema at `{pointer}`: {reason}")]
    SchemaShape { pointer: String, reason: String },

    #[error("input is missing required fields without defaults: {}", fields.join(", "))]
    MissingRequiredInput { fields: Vec<String> },

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("type compiler failed: {0}")]
    Compiler(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

impl SynthError {
    pub fn shape(pointer: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SchemaShape { pointer: pointer.into(), reason: reason.into() }
    }
}
