//! Error handling for the tydoc CLI.
//!
//! `CliError` wraps the library crates' errors via `#[from]`; [`ResultExt`]
//! attaches paths and hints before the error reaches [`miette`] in `main`.

mod report;

use std::path::PathBuf;

use thiserror::Error;

pub use report::cli_error_to_miette;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] tydoc_config::ConfigError),

    #[error("{0}")]
    Bind(#[from] tydoc_binder::BindError),

    #[error("Extraction failed: {0}")]
    Docs(#[from] tydoc::DocsError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Custom(String),
}

pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for adding context to `Result` types.
pub trait ResultExt<T> {
    /// Turn a not-found I/O error into [`CliError::FileNotFound`] for `path`.
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;

    /// Append a hint to the error message.
    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T>;

    /// Prefix the error message.
    fn context(self, msg: impl std::fmt::Display) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| match e.into() {
            CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                CliError::FileNotFound(path.as_ref().to_path_buf())
            }
            other => other,
        })
    }

    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{err}\n\nHint: {hint}"))
        })
    }

    fn context(self, msg: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{msg}: {err}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn not_found() -> std::result::Result<(), std::io::Error> {
        Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"))
    }

    #[test]
    fn with_path_names_missing_file() {
        let err = not_found().with_path("src/index.ts").unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(ref path) if path == &PathBuf::from("src/index.ts")));
        assert!(err.to_string().contains("src/index.ts"));
    }

    #[test]
    fn with_hint_appends_hint() {
        let err = not_found().with_hint("check the path").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("missing"));
        assert!(msg.contains("Hint: check the path"));
    }

    #[test]
    fn context_prefixes_message() {
        let err = not_found().context("reading sources").unwrap_err();
        assert!(err.to_string().starts_with("reading sources: "));
    }

    #[test]
    fn config_errors_convert() {
        let err: CliError = tydoc_config::ConfigError::NoSources.into();
        assert!(err.to_string().contains("no sources specified"));
    }
}
