//! Checks run on a loaded configuration before extraction.

use crate::config::DocsConfig;
use crate::error::{ConfigError, Result};
use crate::filter::PathFilter;

/// Validate a configuration without touching the file system.
pub fn validate(config: &DocsConfig) -> Result<()> {
    if config.sources.is_empty() {
        return Err(ConfigError::NoSources);
    }

    if config.max_alias_depth == 0 {
        return Err(ConfigError::InvalidValue {
            field: "max_alias_depth".to_string(),
            hint: "must be at least 1".to_string(),
        });
    }

    if let Some(extension) = &config.extension {
        if !extension.starts_with('.') {
            return Err(ConfigError::InvalidValue {
                field: "extension".to_string(),
                hint: format!("'{extension}' should start with a dot, e.g. '.{extension}'"),
            });
        }
    }

    PathFilter::new(&config.include, &config.exclude)?;
    Ok(())
}
