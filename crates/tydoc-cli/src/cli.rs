//! Command-line interface definition for tydoc.
//!
//! - `tydoc extract` - Bind sources and write the documentation model as JSON

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// tydoc - documentation models from TypeScript sources
#[derive(Parser, Debug)]
#[command(
    name = "tydoc",
    version,
    about = "Extract a documentation model from TypeScript sources",
    long_about = "tydoc binds TypeScript sources, walks their exported declarations and\n\
                  writes classes, interfaces, enums, functions and variables as JSON."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available tydoc subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract the documentation model
    ///
    /// Sources come from the command line, or from `sources` in tydoc.toml
    /// or the `tydoc` field of package.json when none are given.
    Extract(ExtractArgs),
}

/// Arguments for the extract command
#[derive(Args, Debug, Default, Clone)]
pub struct ExtractArgs {
    /// TypeScript sources to document
    ///
    /// Examples:
    ///   tydoc extract src/index.ts
    ///   tydoc extract src/*.ts --out docs.json
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Path to a config file, instead of searching for tydoc.toml
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write the JSON model here instead of standard output
    #[arg(short, long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Extension of emitted files, e.g. `.js`, used by path filters
    #[arg(long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Document only sources whose emitted path matches this regex
    #[arg(long, value_name = "RE")]
    pub include: Vec<String>,

    /// Skip sources whose emitted path matches this regex
    #[arg(long, value_name = "RE")]
    pub exclude: Vec<String>,

    /// Emit compact JSON
    #[arg(long)]
    pub compact: bool,

    /// Keep module records for exports that produced no entities
    #[arg(long)]
    pub keep_empty: bool,

    /// Working directory for config discovery and relative paths
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,
}
