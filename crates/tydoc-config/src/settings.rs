//! Process-wide settings that do not affect extraction.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// `tracing` filter directive, e.g. `debug` or `tydoc=trace`.
    #[serde(default)]
    pub log_level: Option<String>,
}
