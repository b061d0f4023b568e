//! Include/exclude patterns over emitted paths.

use std::path::Path;

use regex::Regex;

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl PathFilter {
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self> {
        Ok(Self {
            include: compile("include", include)?,
            exclude: compile("exclude", exclude)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Paths are matched with forward slashes on every platform.
    pub fn matches(&self, path: &Path) -> bool {
        let path = path.to_string_lossy().replace('\\', "/");
        let included =
            self.include.is_empty() || self.include.iter().any(|pattern| pattern.is_match(&path));
        included && !self.exclude.iter().any(|pattern| pattern.is_match(&path))
    }
}

fn compile(field: &'static str, patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
                field,
                pattern: pattern.clone(),
                message: e.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn exclude_wins_over_include() {
        let filter = PathFilter::new(&patterns(&[r"^dist/"]), &patterns(&[r"\.test\.js$"])).unwrap();
        assert!(filter.matches(Path::new("dist/index.js")));
        assert!(!filter.matches(Path::new("dist/index.test.js")));
        assert!(!filter.matches(Path::new("lib/index.js")));
    }

    #[test]
    fn invalid_pattern_names_the_field() {
        let error = PathFilter::new(&[], &patterns(&["("])).unwrap_err();
        assert!(matches!(
            error,
            ConfigError::InvalidPattern { field: "exclude", .. }
        ));
    }
}
