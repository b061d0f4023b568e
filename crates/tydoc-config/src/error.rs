//! Error types for configuration loading and validation.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("invalid config value for '{field}': {hint}")]
    InvalidValue { field: String, hint: String },

    #[error("invalid {field} pattern '{pattern}': {message}")]
    InvalidPattern {
        field: &'static str,
        pattern: String,
        message: String,
    },

    #[error("no sources specified")]
    NoSources,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
