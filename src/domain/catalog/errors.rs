//! Catalog loading and resolution errors.

use thiserror::Error;

use crate::domain::foundation::ValidationError;

/// Errors raised while building a catalog. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Project catalog is empty")]
    Empty,

    #[error("Duplicate project id in catalog: {0}")]
    DuplicateId(String),

    #[error("Duplicate project key in catalog: {0}")]
    DuplicateKey(String),

    #[error("Invalid catalog entry #{index}: {source}")]
    InvalidEntry {
        index: usize,
        #[source]
        source: ValidationError,
    },

    #[error("Failed to read catalog file {path}: {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse catalog: {0}")]
    Parse(String),
}

/// A project reference that does not match any catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("No project was suggested")]
    NoHint,

    #[error("No project matches '{0}'")]
    NotFound(String),
}
