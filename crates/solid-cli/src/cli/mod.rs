//! Command-line interface definition for Solid.
//!
//! # Command Structure
//!
//! - `solid build <app>` - one production build
//! - `solid dev <app>` - watch session, until Ctrl+C
//! - `solid list` - registered apps and their resolved options
//! - `solid check` - configuration and plugin validation

mod commands;
mod tests;

use clap::Parser;

pub use commands::{BuildArgs, CheckArgs, Command, DevArgs, ListArgs, ProjectArgs, RunArgs};

/// Solid - build orchestration with plugin middleware
#[derive(Parser, Debug)]
#[command(
    name = "solid",
    version,
    about = "Build and watch named applications with plugin middleware",
    long_about = "Solid drives an underlying bundler for each application declared in\n\
                  solid.toml, running the application's plugins before and after every\n\
                  build pass. In watch mode the bundler can be restarted from scratch\n\
                  after each rebuild."
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
