//! Miette diagnostic conversion for CLI errors.

use miette::Report;
use tydoc::DocsError;
use tydoc_binder::BindError;

use crate::error::CliError;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Bind(BindError::Parse { path, message }) => miette::miette!(
            "Failed to parse {}:\n{}\n\nHint: tydoc reads TypeScript syntax only",
            path.display(),
            message
        ),
        CliError::Docs(DocsError::AliasCycle { chain, .. }) => miette::miette!(
            "Export alias cycle: {}\n\nHint: one of these re-exports must point at a declaration",
            chain.join(" -> ")
        ),
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        _ => miette::miette!("{}", err),
    }
}
