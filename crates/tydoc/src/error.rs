use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for documentation operations.
pub type Result<T> = std::result::Result<T, DocsError>;

/// Error variants for documentation extraction.
#[derive(Debug, Error)]
pub enum DocsError {
    /// An export aliases itself through one or more re-exports.
    #[error("alias cycle while resolving '{name}': {}", chain.join(" -> "))]
    AliasCycle {
        /// Export name the walk started from.
        name: String,
        /// Symbol names visited, ending with the repeated one.
        chain: Vec<String>,
    },

    /// An alias chain is longer than the configured limit.
    #[error("alias chain for '{name}' exceeds {limit} steps")]
    AliasDepthExceeded {
        /// Export name the walk started from.
        name: String,
        /// Configured maximum.
        limit: usize,
    },

    /// A program snapshot refers to symbols, types or signatures it does not hold.
    #[error("invalid program snapshot: {message}")]
    InvalidProgram {
        /// Description of the dangling reference.
        message: String,
    },

    /// Failed to read or write a file.
    #[error("failed to access '{path}': {error}")]
    Io {
        /// Path that caused the error.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        error: std::io::Error,
    },

    /// Serializing the model failed.
    #[error("failed to serialize documentation: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Generic error variant.
    #[error("{message}")]
    Other {
        /// Human-readable error message.
        message: String,
    },
}

impl DocsError {
    /// Build an alias cycle error from the visited names.
    pub fn alias_cycle(name: impl Into<String>, chain: Vec<String>) -> Self {
        Self::AliasCycle {
            name: name.into(),
            chain,
        }
    }
}
