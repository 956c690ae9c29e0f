use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;
use solid_engine::{BuildContext, Plugin, PluginError, PluginResult};
use tokio::process::{Child, Command};
use tokio::sync::Mutex;

/// Options of the `node-server` plugin.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeServerOptions {
    /// Script to run, relative to the app's output directory
    pub entry: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default = "default_program")]
    pub program: String,
}

fn default_program() -> String {
    "node".to_string()
}

/// Keeps a server process running the latest development build.
///
/// The process is stopped before every pass and started again after each
/// successful one. Production builds are left alone.
pub struct NodeServerPlugin {
    options: NodeServerOptions,
    child: Mutex<Option<Child>>,
}

impl NodeServerPlugin {
    pub fn new(options: NodeServerOptions) -> Self {
        Self {
            options,
            child: Mutex::new(None),
        }
    }

    async fn stop(&self) -> PluginResult {
        let Some(mut child) = self.child.lock().await.take() else {
            return Ok(());
        };
        tracing::debug!(pid = ?child.id(), "Stopping server");
        // An already exited process has nothing left to kill.
        if child.try_wait()?.is_none() {
            child.kill().await?;
        }
        Ok(())
    }

    #[cfg(test)]
    async fn running(&self) -> bool {
        self.child.lock().await.is_some()
    }
}

impl std::fmt::Debug for NodeServerPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeServerPlugin")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Plugin for NodeServerPlugin {
    fn name(&self) -> &str {
        "node-server"
    }

    async fn before_build(&self, ctx: &BuildContext<'_>) -> PluginResult {
        if ctx.mode.is_production() {
            return Ok(());
        }
        self.stop().await
    }

    async fn after_build(&self, ctx: &BuildContext<'_>) -> PluginResult {
        if ctx.mode.is_production() || !ctx.succeeded() {
            return Ok(());
        }
        self.stop().await?;

        let entry = ctx.options.output_dir().join(&self.options.entry);
        let child = Command::new(&self.options.program)
            .arg(&entry)
            .args(&self.options.args)
            .current_dir(&ctx.options.project_root)
            .envs(ctx.env)
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                PluginError::unrecoverable(
                    anyhow::Error::new(e)
                        .context(format!("failed to start {}", self.options.program)),
                )
            })?;

        tracing::info!(pid = ?child.id(), entry = %entry.display(), "Server started");
        *self.child.lock().await = Some(child);
        Ok(())
    }
}
