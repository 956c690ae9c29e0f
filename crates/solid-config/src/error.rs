//! Error types for configuration loading and validation.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no solid.toml or package.json \"solid\" field found in {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("app '{app}' is invalid: {reason}")]
    InvalidApp { app: String, reason: String },

    #[error("app '{app}' lists plugin '{plugin}' more than once")]
    DuplicatePlugin { app: String, plugin: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}
