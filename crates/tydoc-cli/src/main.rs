//! tydoc CLI entry point: argument parsing, logging setup and dispatch.

use clap::Parser;
use miette::Result;
use tydoc_cli::{cli, commands, error, logger, ui};

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    ui::init_colors(!args.no_color && logger::should_use_colors());

    let result = match args.command {
        cli::Command::Extract(extract_args) => commands::extract::load_config(&extract_args)
            .and_then(|config| {
                logger::init_logger_with_level(
                    args.verbose,
                    args.quiet,
                    args.no_color,
                    config.settings.log_level.as_deref(),
                );
                commands::extract::execute(&extract_args, config)
            }),
    };

    result.map_err(error::cli_error_to_miette)
}
