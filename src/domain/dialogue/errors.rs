//! Structured extraction errors.

use thiserror::Error;

/// Raw text rejected before any parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SanitizationError {
    #[error("Response too long: {actual} bytes exceeds maximum of {max} bytes")]
    TooLong { max: usize, actual: usize },

    #[error("Response is empty")]
    Empty,
}

/// No JSON object could be recovered from the text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Sanitization failed: {0}")]
    Sanitization(#[from] SanitizationError),

    #[error("No JSON object found")]
    NoObject,

    #[error("JSON object is truncated")]
    Truncated,

    #[error("JSON parse error: {0}")]
    ParseError(String),
}
