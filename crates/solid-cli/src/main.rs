//! Solid CLI entry point.
//!
//! Parses arguments, initializes logging, and dispatches to the command
//! implementations. Fatal orchestrator conditions terminate the process with
//! their own exit codes before control returns here.

use clap::Parser;
use miette::Result;
use solid_cli::{cli, commands, error, logger, ui};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let result = match args.command {
        cli::Command::Build(build_args) => commands::build_execute(build_args).await,
        cli::Command::Dev(dev_args) => commands::dev_execute(dev_args).await,
        cli::Command::List(list_args) => commands::list_execute(list_args).await,
        cli::Command::Check(check_args) => commands::check_execute(check_args).await,
    };

    result.map_err(error::cli_error_to_miette)
}
