use std::path::Path;
use serde::de::DeserializeOwned;
use crate::error::{Result, SynthError};

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> std::result::Result<T, String> {
    let de = &mut serde_json::Deserializer::from_str(src);
    match serde_path_to_error::deserialize::<_, T>(de) {
        Ok(v) => Ok(v),
        Err(err) => {
            let path = err.path().to_string();
            Err(format!("at JSON path {path} → {}", err.into_inner()))
        }
    }
}

/// Read and deserialize a JSON document, tagging failures with the file path.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let source = std::fs::read_to_string(path)?;
    from_str_with_path(&source).map_err(|message| SynthError::Parse {
        path: path.to_path_buf(),
        message,
    })
}
