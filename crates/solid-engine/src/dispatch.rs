//! Middleware dispatch.
//!
//! One dispatch pass runs a single lifecycle hook on each of an app's plugins,
//! strictly in registration order, each call finishing before the next one
//! starts. Passes for the same app never overlap: a pass waits for the
//! previous one on that app to end, while passes for different apps proceed
//! independently.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::EngineError;
use crate::exit::{ExitHandler, terminate};
use crate::plugin::{BuildContext, Lifecycle, Plugin, PluginError};
use crate::report;

/// What happened during a pass that completed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Plugins whose hook ran, in order
    pub invoked: Vec<String>,
    /// Plugins skipped because they were disabled for the run
    pub skipped: Vec<String>,
    /// Plugins that reported a recoverable failure
    pub recovered: Vec<String>,
}

pub struct Dispatcher {
    exit: Arc<dyn ExitHandler>,
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl Dispatcher {
    pub fn new(exit: Arc<dyn ExitHandler>) -> Self {
        Self {
            exit,
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn app_lock(&self, app: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.locks
            .lock()
            .entry(app.to_string())
            .or_default()
            .clone()
    }

    /// Run `lifecycle` on every enabled plugin.
    ///
    /// A recoverable failure is printed and the pass continues. A recoverable
    /// failure with a positive exit code, or an unrecoverable error, stops the
    /// pass: the exit handler is invoked and the matching error returned.
    pub async fn dispatch(
        &self,
        lifecycle: Lifecycle,
        ctx: &BuildContext<'_>,
        plugins: &[Arc<dyn Plugin>],
        disabled: &[String],
    ) -> Result<DispatchReport, EngineError> {
        let app = ctx.options.name.as_str();
        let lock = self.app_lock(app);
        let _guard = lock.lock().await;

        tracing::debug!(app, %lifecycle, plugins = plugins.len(), "Dispatching middleware");
        let mut report = DispatchReport::default();

        for plugin in plugins {
            let name = plugin.name();
            if disabled.iter().any(|d| d == name) {
                tracing::debug!(app, plugin = name, "Plugin disabled for this run");
                report.skipped.push(name.to_string());
                continue;
            }

            let result = match lifecycle {
                Lifecycle::Before => plugin.before_build(ctx).await,
                Lifecycle::After => plugin.after_build(ctx).await,
            };
            report.invoked.push(name.to_string());

            match result {
                Ok(()) => {}
                Err(PluginError::Recoverable(failure)) => {
                    if let Some(code) = failure.terminating_code() {
                        let err = EngineError::PluginExit {
                            plugin: name.to_string(),
                            lifecycle,
                            code,
                            message: failure
                                .message
                                .unwrap_or_else(|| format!("exited with code {code}")),
                        };
                        return Err(terminate(self.exit.as_ref(), err));
                    }
                    if let Some(message) = &failure.message {
                        report::plugin_warning(name, message);
                    }
                    tracing::debug!(app, plugin = name, "Recoverable plugin failure");
                    report.recovered.push(name.to_string());
                }
                Err(PluginError::Unrecoverable(failure)) => {
                    let err = EngineError::PluginCrashed {
                        plugin: name.to_string(),
                        lifecycle,
                        cause: failure.cause,
                    };
                    return Err(terminate(self.exit.as_ref(), err));
                }
            }
        }

        Ok(report)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("apps", &self.locks.lock().len())
            .finish()
    }
}
