//! The `DocsConfig` structure and its conversion into extractor options.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tydoc::{DEFAULT_MAX_ALIAS_DEPTH, ExtractOptions, OutputLayout};

use crate::error::{ConfigError, Result};
use crate::filter::PathFilter;
use crate::settings::Settings;

/// Extension assumed for emitted files when path filters are configured
/// without one.
pub const DEFAULT_EXTENSION: &str = ".js";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocsConfig {
    /// Source files to bind, relative to the working directory.
    #[serde(default)]
    pub sources: Vec<PathBuf>,

    /// Regular expressions over emitted paths; a source is documented when
    /// any matches. Empty means every source.
    #[serde(default)]
    pub include: Vec<String>,

    /// Regular expressions over emitted paths that drop a source.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Extension of emitted files, e.g. `.js` or `.d.ts`.
    #[serde(default)]
    pub extension: Option<String>,

    #[serde(default)]
    pub root_dir: Option<PathBuf>,

    #[serde(default)]
    pub out_dir: Option<PathBuf>,

    #[serde(default = "default_max_alias_depth")]
    pub max_alias_depth: usize,

    /// Where the JSON model is written. Standard output when unset.
    #[serde(default)]
    pub output: Option<PathBuf>,

    #[serde(default = "default_pretty")]
    pub pretty: bool,

    #[serde(default)]
    pub settings: Settings,
}

fn default_max_alias_depth() -> usize {
    DEFAULT_MAX_ALIAS_DEPTH
}

fn default_pretty() -> bool {
    true
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            include: Vec::new(),
            exclude: Vec::new(),
            extension: None,
            root_dir: None,
            out_dir: None,
            max_alias_depth: DEFAULT_MAX_ALIAS_DEPTH,
            output: None,
            pretty: true,
            settings: Settings::default(),
        }
    }
}

impl DocsConfig {
    /// Create from a `serde_json::Value`, e.g. the `tydoc` field of a
    /// `package.json`.
    ///
    /// ```
    /// use serde_json::json;
    /// use tydoc_config::DocsConfig;
    ///
    /// let config = DocsConfig::from_value(json!({ "sources": ["src/index.ts"] })).unwrap();
    /// assert_eq!(config.sources.len(), 1);
    /// assert!(config.pretty);
    /// ```
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: e.to_string(),
        })
    }

    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: e.to_string(),
        })
    }

    /// Output layout when an `out_dir` is configured.
    pub fn layout(&self) -> Option<OutputLayout> {
        let out_dir = self.out_dir.as_ref()?;
        let root_dir = self.root_dir.clone().unwrap_or_default();
        Some(OutputLayout::new(root_dir, out_dir))
    }

    /// Extractor options with `include`/`exclude` compiled into the name
    /// filter.
    pub fn extract_options(&self) -> Result<ExtractOptions> {
        let mut options = ExtractOptions::default().with_max_alias_depth(self.max_alias_depth);

        let filter = PathFilter::new(&self.include, &self.exclude)?;
        let extension = match (&self.extension, filter.is_empty()) {
            (Some(extension), _) => Some(extension.clone()),
            (None, false) => Some(DEFAULT_EXTENSION.to_string()),
            (None, true) => None,
        };

        if let Some(extension) = extension {
            options = options.with_extension(extension);
        }
        if !filter.is_empty() {
            options = options.with_name_filter(move |path| filter.matches(path));
        }

        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::Path;

    #[test]
    fn defaults_apply_to_missing_fields() {
        let config = DocsConfig::from_value(json!({})).unwrap();
        assert_eq!(config, DocsConfig::default());
        assert_eq!(config.max_alias_depth, DEFAULT_MAX_ALIAS_DEPTH);
    }

    #[test]
    fn layout_requires_out_dir() {
        let mut config = DocsConfig::default();
        assert!(config.layout().is_none());

        config.root_dir = Some(PathBuf::from("src"));
        config.out_dir = Some(PathBuf::from("dist"));
        let layout = config.layout().unwrap();
        assert_eq!(
            layout.map(Path::new("src/a/b.ts"), ".js"),
            PathBuf::from("dist/a/b.js")
        );
    }

    #[test]
    fn filters_imply_default_extension() {
        let config = DocsConfig {
            exclude: vec!["internal".to_string()],
            ..DocsConfig::default()
        };
        let options = config.extract_options().unwrap();
        assert_eq!(options.extension.as_deref(), Some(DEFAULT_EXTENSION));

        let filter = options.name_filter.unwrap();
        assert!(filter(Path::new("dist/api.js")));
        assert!(!filter(Path::new("dist/internal/api.js")));
    }

    #[test]
    fn no_filters_leave_options_untouched() {
        let options = DocsConfig::default().extract_options().unwrap();
        assert!(options.name_filter.is_none());
        assert!(options.extension.is_none());
    }
}
