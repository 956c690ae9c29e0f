//! Miette diagnostic conversion for CLI errors.

use miette::Report;
use solid_config::ConfigError;
use solid_engine::EngineError;

use crate::error::CliError;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(e) => config_error_to_miette(e),
        CliError::Engine(e) => engine_error_to_miette(e),
        other => miette::miette!("{}", other),
    }
}

fn config_error_to_miette(err: ConfigError) -> Report {
    match err {
        ConfigError::NotFound(root) => miette::miette!(
            "No configuration found in {}\n\nHint: create solid.toml (see `solid check --example`) or add a \"solid\" field to package.json",
            root.display()
        ),
        ConfigError::Parse { path, message } => {
            miette::miette!("Failed to parse {}:\n{}", path.display(), message)
        }
        other => miette::miette!("Configuration error: {}", other),
    }
}

fn engine_error_to_miette(err: EngineError) -> Report {
    match err {
        EngineError::Build { app, source } => miette::miette!(
            "Build of '{}' failed: {}\n\nHint: run with --verbose to see the bundler invocation",
            app,
            source
        ),
        other => miette::miette!("{}", other),
    }
}
