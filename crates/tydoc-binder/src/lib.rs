//! TypeScript front end for `tydoc`.
//!
//! Parses sources with OXC, binds declarations into symbols and resolves
//! names across files, producing a [`tydoc::Program`] the extractor walks.
//!
//! ```no_run
//! use tydoc_binder::Binder;
//!
//! let mut binder = Binder::new();
//! binder.add_source("src/point.ts", "export class Point { x = 0; }")?;
//! let program = binder.bind()?;
//! let docs = tydoc::extract(&program, &Default::default())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod jsdoc;
mod lines;
mod link;
mod lower;
mod resolve;
mod types;

use std::path::Path;

use tracing::{debug, info};
use tydoc::{OutputLayout, Program};

pub use error::{BindError, Result};
pub use jsdoc::{ParsedJsDoc, parse_jsdoc};

use link::Binding;
use resolve::normalize_path;

/// Collects source texts and binds them into one program.
#[derive(Debug, Default)]
pub struct Binder {
    sources: Vec<(String, String)>,
    layout: Option<OutputLayout>,
}

impl Binder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an in-memory source. Paths are normalized to forward slashes.
    pub fn add_source(&mut self, path: impl AsRef<Path>, text: impl Into<String>) -> Result<&mut Self> {
        let path = normalize_path(path.as_ref());
        if self.sources.iter().any(|(existing, _)| *existing == path) {
            return Err(BindError::DuplicateSource { path: path.into() });
        }
        self.sources.push((path, text.into()));
        Ok(self)
    }

    /// Read a source from disk.
    pub fn add_path(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|error| BindError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        self.add_source(path, text)
    }

    /// Output layout recorded on the bound program.
    pub fn with_layout(&mut self, layout: OutputLayout) -> &mut Self {
        self.layout = Some(layout);
        self
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Bind every added source. Fails on the first source that does not parse.
    pub fn bind(&self) -> Result<Program> {
        let mut binding = Binding::new();

        for (file, (path, text)) in self.sources.iter().enumerate() {
            debug!(source = %path, "binding source");
            lower::lower_source(&mut binding, file, path, text)?;
        }

        if let Some(layout) = &self.layout {
            binding.builder.set_layout(layout.clone());
        }

        let program = binding.link();
        info!(
            sources = self.sources.len(),
            symbols = program.symbols.len(),
            "bound program"
        );
        Ok(program)
    }
}

/// Read and bind the files at `paths`.
pub fn bind_paths<P: AsRef<Path>>(paths: &[P], layout: Option<OutputLayout>) -> Result<Program> {
    let mut binder = Binder::new();
    for path in paths {
        binder.add_path(path)?;
    }
    if let Some(layout) = layout {
        binder.with_layout(layout);
    }
    binder.bind()
}
