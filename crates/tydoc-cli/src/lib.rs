//! tydoc CLI - documentation models from TypeScript sources.
//!
//! - [`cli`] - clap argument definitions
//! - `commands` - command implementations
//! - [`error`] - error types and miette conversion
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - status messages

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result, ResultExt};
