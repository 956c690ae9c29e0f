//! Error types for the orchestrator.

use thiserror::Error;

use crate::bundler::BundleError;
use crate::env::EnvError;
use crate::exit::codes;
use crate::plugin::Lifecycle;
use crate::registry::RegistryError;
use crate::state::RunState;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("app '{0}' is not registered")]
    AppNotRegistered(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Env(#[from] EnvError),

    /// The bundler reported a failed pass. Not fatal: middleware already saw
    /// the failure.
    #[error("build of '{app}' failed: {source}")]
    Build {
        app: String,
        #[source]
        source: BundleError,
    },

    #[error("plugin '{plugin}' failed during {lifecycle}: {message}")]
    PluginExit {
        plugin: String,
        lifecycle: Lifecycle,
        code: i32,
        message: String,
    },

    #[error("plugin '{plugin}' crashed during {lifecycle}: {cause:?}")]
    PluginCrashed {
        plugin: String,
        lifecycle: Lifecycle,
        cause: anyhow::Error,
    },

    #[error("dev session for '{0}' ended unexpectedly")]
    SessionAborted(String),

    #[error("invalid state transition: {from} -> {to}")]
    InvalidTransition { from: RunState, to: RunState },
}

impl EngineError {
    /// Exit code the process terminates with for this error, or `None` when
    /// the error is reported to the caller only.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            EngineError::AppNotRegistered(_) | EngineError::Registry(_) => {
                Some(codes::CONFIGURATION)
            }
            EngineError::Env(_) => Some(codes::ENVIRONMENT),
            EngineError::PluginCrashed { .. } => Some(codes::PLUGIN_CRASH),
            EngineError::PluginExit { code, .. } => Some(*code),
            EngineError::Build { .. }
            | EngineError::SessionAborted(_)
            | EngineError::InvalidTransition { .. } => None,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.exit_code().is_some()
    }
}
