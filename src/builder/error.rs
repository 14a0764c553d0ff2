//! Errors raised while loading machine definitions.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when reading a [`TableDefinition`](crate::TableDefinition).
///
/// Building a machine never fails; only parsing the definition text can.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("Invalid JSON definition: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML definition: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to read definition from {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported definition format for {}. Use .json, .yaml or .yml", .path.display())]
    UnsupportedFormat { path: PathBuf },
}
