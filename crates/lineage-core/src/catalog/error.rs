use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a catalog backend.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON snapshot error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML snapshot error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid catalog snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

impl CatalogError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CatalogError::Io {
            path: path.into(),
            source,
        }
    }
}
