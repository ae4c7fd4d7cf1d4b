use std::path::Path;
use thiserror::Error;

use super::{Observation, ObservationTable};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported observation file extension: '{0}'")]
    UnsupportedExtension(String),
}

/// Read an observation table from a JSON or YAML array of records,
/// dispatching on the file extension.
pub fn load_observations(path: &Path) -> Result<ObservationTable, LoadError> {
    let content = std::fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    let rows: Vec<Observation> = match extension {
        "json" => serde_json::from_str(&content)?,
        "yaml" | "yml" => serde_yaml::from_str(&content)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string())),
    };
    Ok(ObservationTable::new(rows))
}
