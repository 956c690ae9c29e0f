//! Process termination.
//!
//! Fatal conditions end the process with a specific status code. The
//! orchestrator never calls `std::process::exit` itself: it goes through an
//! [`ExitHandler`] so tests can observe the request instead of dying.

use crate::error::EngineError;
use crate::report;

/// Fixed exit codes.
pub mod codes {
    /// Unregistered app, duplicate registration, bad configuration
    pub const CONFIGURATION: i32 = 1;
    /// Requested environment file missing or unreadable
    pub const ENVIRONMENT: i32 = 2;
    /// Plugin hook failed with an unrecoverable error
    pub const PLUGIN_CRASH: i32 = 3;
}

pub trait ExitHandler: Send + Sync {
    fn exit(&self, code: i32);
}

/// Terminates the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExit;

impl ExitHandler for ProcessExit {
    fn exit(&self, code: i32) {
        std::process::exit(code);
    }
}

/// Print a fatal error, request termination, and hand the error back for
/// callers whose handler returns.
pub(crate) fn terminate(handler: &dyn ExitHandler, err: EngineError) -> EngineError {
    report::fatal(&err);
    if let Some(code) = err.exit_code() {
        tracing::debug!(code, "Requesting process exit");
        handler.exit(code);
    }
    err
}
