use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for binding operations.
pub type Result<T> = std::result::Result<T, BindError>;

/// Error variants for lowering sources into a program snapshot.
#[derive(Debug, Error)]
pub enum BindError {
    /// Failed to read a source file.
    #[error("failed to read source '{path}': {error}")]
    Io {
        /// Path to the source file that caused the error.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        error: std::io::Error,
    },

    /// Parsing the source file with OXC failed.
    #[error("failed to parse source '{path}': {message}")]
    Parse {
        /// Path to the source file.
        path: PathBuf,
        /// Aggregated parser error message.
        message: String,
    },

    /// Two sources were added under the same path.
    #[error("source '{path}' was added twice")]
    DuplicateSource {
        /// Path given for both sources.
        path: PathBuf,
    },
}

impl BindError {
    /// Helper to create a parse error from multiple diagnostic strings.
    pub fn parse_error(path: PathBuf, diagnostics: &[String]) -> Self {
        let message = diagnostics.join("; ");
        Self::Parse { path, message }
    }
}
