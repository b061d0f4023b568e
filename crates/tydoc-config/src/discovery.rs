//! File-based config discovery for CLI use
//!
//! Sources are layered with `figment`, lowest priority first: built-in
//! defaults, the config file, `TYDOC_` environment variables, then
//! caller-supplied overrides.

use std::fs;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format as _, Serialized, Toml};
use serde_json::Value;
use tracing::debug;

use crate::config::DocsConfig;
use crate::error::{ConfigError, Result};

pub const CONFIG_FILE: &str = "tydoc.toml";
pub const PACKAGE_FIELD: &str = "tydoc";
pub const ENV_PREFIX: &str = "TYDOC_";

/// Searches a root directory for tydoc configuration and loads it.
///
/// # Example
///
/// ```no_run
/// use tydoc_config::ConfigDiscovery;
///
/// let config = ConfigDiscovery::new(".").load().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigDiscovery {
    root: PathBuf,
    explicit: Option<PathBuf>,
    overrides: Value,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            explicit: None,
            overrides: Value::Null,
        }
    }

    /// Use this file instead of searching. It must exist.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit = Some(path.into());
        self
    }

    /// Values merged over everything else, typically command-line flags.
    /// Only the keys present in `overrides` take effect.
    pub fn with_overrides(mut self, overrides: Value) -> Self {
        self.overrides = overrides;
        self
    }

    /// Find a config file in the root directory
    ///
    /// Searches in this order:
    /// 1. TOML config: tydoc.toml
    /// 2. package.json (tydoc field)
    pub fn find(&self) -> Option<PathBuf> {
        let toml_path = self.root.join(CONFIG_FILE);
        if toml_path.exists() {
            return Some(toml_path);
        }

        let pkg_path = self.root.join("package.json");
        if let Ok(content) = fs::read_to_string(&pkg_path) {
            if let Ok(parsed) = serde_json::from_str::<Value>(&content) {
                if parsed.get(PACKAGE_FIELD).is_some_and(|field| !field.is_null()) {
                    return Some(pkg_path);
                }
            }
        }

        None
    }

    /// Load the layered configuration. A missing config file is not an
    /// error unless one was given explicitly.
    pub fn load(&self) -> Result<DocsConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(DocsConfig::default()));

        let file = match &self.explicit {
            Some(path) if !path.exists() => return Err(ConfigError::FileNotFound(path.clone())),
            Some(path) => Some(path.clone()),
            None => self.find(),
        };

        if let Some(path) = file {
            debug!(config = %path.display(), "loading config file");
            figment = if is_package_json(&path) {
                figment.merge(Serialized::defaults(package_field(&path)?))
            } else {
                figment.merge(Toml::file(path))
            };
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        if let Value::Object(overrides) = &self.overrides {
            if !overrides.is_empty() {
                figment = figment.merge(Serialized::defaults(overrides.clone()));
            }
        }

        figment.extract().map_err(|e| ConfigError::InvalidValue {
            field: "configuration".to_string(),
            hint: e.to_string(),
        })
    }
}

fn is_package_json(path: &Path) -> bool {
    path.file_name() == Some(std::ffi::OsStr::new("package.json"))
}

fn package_field(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    let parsed: Value = serde_json::from_str(&content).map_err(|e| ConfigError::InvalidValue {
        field: "package.json".to_string(),
        hint: format!("invalid JSON: {e}"),
    })?;

    match parsed.get(PACKAGE_FIELD) {
        Some(Value::Object(field)) => Ok(Value::Object(field.clone())),
        _ => Err(ConfigError::InvalidValue {
            field: PACKAGE_FIELD.to_string(),
            hint: "add a 'tydoc' object to your package.json".to_string(),
        }),
    }
}

/// Discover and load config from the current directory.
pub fn discover() -> Result<DocsConfig> {
    let root = std::env::current_dir()?;
    ConfigDiscovery::new(&root).load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn find_returns_none_when_no_config() {
        let dir = TempDir::new().unwrap();
        assert!(ConfigDiscovery::new(dir.path()).find().is_none());
    }

    #[test]
    fn package_json_without_field_is_ignored() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), r#"{ "name": "test" }"#).unwrap();
        assert!(ConfigDiscovery::new(dir.path()).find().is_none());
    }

    #[test]
    fn explicit_file_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("custom.toml");
        let error = ConfigDiscovery::new(dir.path())
            .with_file(&missing)
            .load()
            .unwrap_err();
        assert!(matches!(error, ConfigError::FileNotFound(path) if path == missing));
    }
}
