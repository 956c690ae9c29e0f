use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Available Solid subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a production build of one app
    ///
    /// Runs the app's `before` plugins, one bundler pass with minification
    /// for web apps, then the `after` plugins with the result.
    Build(BuildArgs),

    /// Watch an app and rebuild on change
    ///
    /// Keeps running until interrupted with Ctrl+C. Apps with hard watch
    /// enabled get a fresh bundler after every rebuild.
    Dev(DevArgs),

    /// List the apps declared in the configuration
    List(ListArgs),

    /// Validate the configuration and plugin options
    Check(CheckArgs),
}

/// Where to find the project and its configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Project root (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Configuration file (defaults to solid.toml or package.json)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Arguments shared by `build` and `dev`.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Name of the app to run
    #[arg(value_name = "APP")]
    pub app: String,

    /// Named environment; loads `.env.<NAME>` instead of `.env`
    ///
    /// The file must exist when a name is given.
    #[arg(short, long, value_name = "NAME")]
    pub env: Option<String>,

    /// Skip a plugin for this run (repeatable)
    #[arg(long = "disable", value_name = "PLUGIN")]
    pub disable: Vec<String>,

    #[command(flatten)]
    pub project: ProjectArgs,
}

/// Arguments for the build command
#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub run: RunArgs,
}

/// Arguments for the dev command
#[derive(Args, Debug)]
pub struct DevArgs {
    #[command(flatten)]
    pub run: RunArgs,
}

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Print an example configuration instead of checking
    #[arg(long)]
    pub example: bool,

    #[command(flatten)]
    pub project: ProjectArgs,
}
