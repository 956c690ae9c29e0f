//! Error handling for the Solid CLI.
//!
//! `CliError` wraps the configuration and orchestrator errors and adds the
//! failures only the CLI can hit: unknown plugins, bad plugin options and
//! file watching. Conversion to a miette report happens at the binary
//! boundary, see [`cli_error_to_miette`].

mod miette;

use std::path::PathBuf;

use solid_engine::{EngineError, RegistryError};
use thiserror::Error;

pub use self::miette::cli_error_to_miette;

#[derive(Debug, Error)]
pub enum CliError {
    /// Config file missing, unparsable or invalid
    #[error("Configuration error: {0}")]
    Config(#[from] solid_config::ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Manifest names a plugin no built-in implements
    #[error("Unknown plugin '{name}' in app '{app}'\n\nHint: built-in plugins are {}", crate::plugins::BUILTIN.join(", "))]
    UnknownPlugin { app: String, name: String },

    #[error("Invalid options for plugin '{plugin}' in app '{app}': {message}")]
    PluginOptions {
        app: String,
        plugin: String,
        message: String,
    },

    /// Command-line value that cannot be used as given
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),
}

pub type Result<T, E = CliError> = std::result::Result<T, E>;
