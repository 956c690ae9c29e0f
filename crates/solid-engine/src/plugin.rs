//! Plugin contract.
//!
//! A plugin is a named middleware unit with two optional async hooks, one run
//! before each build pass and one after it. Hooks report failures through
//! [`PluginError`], whose variant decides what the dispatcher does:
//!
//! - [`PluginError::Recoverable`]: an expected failure (a type error during
//!   development, a lint warning). The message is printed and the pass moves
//!   on to the next plugin, unless the failure carries a positive exit code.
//! - [`PluginError::Unrecoverable`]: anything else. The plugin is treated as
//!   broken and the process terminates.
//!
//! Errors converted with `?` (I/O, `anyhow`) land in the unrecoverable
//! variant; a recoverable failure must be built on purpose.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::app::{BuildMode, ExtendedOptions};
use crate::bundler::{BuildEvent, BundleError};
use crate::env::EnvMap;

/// Lifecycle event a dispatch pass runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    Before,
    After,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifecycle::Before => f.write_str("before"),
            Lifecycle::After => f.write_str("after"),
        }
    }
}

/// Everything a hook receives for one build pass.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    pub mode: BuildMode,
    pub options: &'a ExtendedOptions,
    pub env: &'a EnvMap,
    /// Bundler result of the pass. Always `None` for `before` hooks.
    pub event: Option<&'a BuildEvent>,
    /// Bundler failure of the pass. Always `None` for `before` hooks.
    pub error: Option<&'a BundleError>,
}

impl BuildContext<'_> {
    /// True unless the bundler reported a failure for this pass.
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

pub type PluginResult = Result<(), PluginError>;

/// Build middleware.
///
/// Instances belong to a single app and live for the whole process, so they
/// may keep state (a spawned dev server, say) between passes. That state
/// needs interior mutability because hooks take `&self`.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Name used in logs and matched against `disabled_plugins`.
    fn name(&self) -> &str;

    async fn before_build(&self, _ctx: &BuildContext<'_>) -> PluginResult {
        Ok(())
    }

    async fn after_build(&self, _ctx: &BuildContext<'_>) -> PluginResult {
        Ok(())
    }
}

/// Failure reported by a plugin hook.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("{0}")]
    Recoverable(RecoverablePluginFailure),

    #[error(transparent)]
    Unrecoverable(UnrecoverablePluginError),
}

impl PluginError {
    /// Expected failure: print `message`, keep going.
    pub fn recoverable(message: impl Into<String>) -> Self {
        PluginError::Recoverable(RecoverablePluginFailure {
            message: Some(message.into()),
            exit_code: None,
        })
    }

    /// Expected failure with nothing to print.
    pub fn silent() -> Self {
        PluginError::Recoverable(RecoverablePluginFailure::default())
    }

    /// Expected failure that ends the process with `exit_code`.
    pub fn exit(message: impl Into<String>, exit_code: i32) -> Self {
        PluginError::Recoverable(RecoverablePluginFailure {
            message: Some(message.into()),
            exit_code: Some(exit_code),
        })
    }

    pub fn unrecoverable(cause: impl Into<anyhow::Error>) -> Self {
        PluginError::Unrecoverable(UnrecoverablePluginError {
            cause: cause.into(),
        })
    }
}

impl From<anyhow::Error> for PluginError {
    fn from(cause: anyhow::Error) -> Self {
        PluginError::unrecoverable(cause)
    }
}

impl From<std::io::Error> for PluginError {
    fn from(err: std::io::Error) -> Self {
        PluginError::unrecoverable(err)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoverablePluginFailure {
    pub message: Option<String>,
    pub exit_code: Option<i32>,
}

impl RecoverablePluginFailure {
    /// Exit code the process must terminate with, if any. Zero and negative
    /// codes never terminate.
    pub fn terminating_code(&self) -> Option<i32> {
        self.exit_code.filter(|code| *code > 0)
    }
}

impl fmt::Display for RecoverablePluginFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.message, self.exit_code) {
            (Some(message), Some(code)) => write!(f, "{message} (exit code {code})"),
            (Some(message), None) => f.write_str(message),
            (None, Some(code)) => write!(f, "plugin requested exit code {code}"),
            (None, None) => f.write_str("plugin reported a recoverable failure"),
        }
    }
}

#[derive(Debug, Error)]
#[error("{cause}")]
pub struct UnrecoverablePluginError {
    pub cause: anyhow::Error,
}
