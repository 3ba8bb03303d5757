//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid URL for {0}: must start with http:// or https://")]
    InvalidUrl(&'static str),

    #[error("Invalid timeout for {0}: must be between 1 and 600 seconds")]
    InvalidTimeout(&'static str),

    #[error("Invalid value for {0}: must be greater than zero")]
    ZeroLimit(&'static str),

    #[error("Invalid value for {field}: must be at most {max}")]
    AboveLimit { field: &'static str, max: u32 },

    #[error("Invalid temperature: must be between 0.0 and 2.0")]
    InvalidTemperature,

    #[error("Invalid log filter: {0}")]
    InvalidLogFilter(String),
}

/// Rejects anything that is not an absolute http(s) URL.
pub(crate) fn check_http_url(url: &str, field: &'static str) -> Result<(), ValidationError> {
    if url.is_empty() {
        return Err(ValidationError::MissingRequired(field));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ValidationError::InvalidUrl(field));
    }
    Ok(())
}

pub(crate) fn check_timeout(secs: u64, field: &'static str) -> Result<(), ValidationError> {
    if secs == 0 || secs > 600 {
        return Err(ValidationError::InvalidTimeout(field));
    }
    Ok(())
}

/// True for a present, non-blank secret.
pub(crate) fn has_secret(secret: Option<&secrecy::Secret<String>>) -> bool {
    use secrecy::ExposeSecret;

    secret.is_some_and(|value| !value.expose_secret().trim().is_empty())
}

pub(crate) fn check_secret(
    secret: Option<&secrecy::Secret<String>>,
    field: &'static str,
) -> Result<(), ValidationError> {
    if has_secret(secret) {
        Ok(())
    } else {
        Err(ValidationError::MissingRequired(field))
    }
}
