use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use solid_engine::{BuildContext, BuildMode, Plugin, PluginError, PluginResult};
use tokio::process::Command;

/// Hook an `exec` plugin runs in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum When {
    #[default]
    Before,
    After,
}

/// Options of the `exec` plugin.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecOptions {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub when: When,
    /// Process exit code used when the command fails in a production build
    #[serde(default = "default_exit_code", alias = "exitCode")]
    pub exit_code: i32,
}

fn default_exit_code() -> i32 {
    1
}

/// Runs a command around each build, e.g. `tsc --noEmit`.
///
/// A non-zero exit is a recoverable failure. Development sessions print it
/// and keep watching; production builds end with the configured exit code.
/// An `after` command only runs when the bundler succeeded.
#[derive(Debug)]
pub struct ExecPlugin {
    options: ExecOptions,
}

impl ExecPlugin {
    pub fn new(options: ExecOptions) -> Self {
        Self { options }
    }

    async fn run(&self, ctx: &BuildContext<'_>) -> PluginResult {
        let command_line = std::iter::once(self.options.command.as_str())
            .chain(self.options.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");
        tracing::debug!(command = %command_line, app = %ctx.options.name, "Running exec plugin");

        let status = Command::new(&self.options.command)
            .args(&self.options.args)
            .current_dir(&ctx.options.project_root)
            .envs(ctx.env)
            .env("NODE_ENV", ctx.mode.to_string())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| {
                PluginError::unrecoverable(
                    anyhow::Error::new(e).context(format!("failed to start `{command_line}`")),
                )
            })?;

        if status.success() {
            return Ok(());
        }

        let message = format!("`{command_line}` exited with {status}");
        match ctx.mode {
            BuildMode::Development => Err(PluginError::recoverable(message)),
            BuildMode::Production => Err(PluginError::exit(message, self.options.exit_code)),
        }
    }
}

#[async_trait]
impl Plugin for ExecPlugin {
    fn name(&self) -> &str {
        "exec"
    }

    async fn before_build(&self, ctx: &BuildContext<'_>) -> PluginResult {
        match self.options.when {
            When::Before => self.run(ctx).await,
            When::After => Ok(()),
        }
    }

    async fn after_build(&self, ctx: &BuildContext<'_>) -> PluginResult {
        match self.options.when {
            When::After if ctx.succeeded() => self.run(ctx).await,
            _ => Ok(()),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use solid_engine::bundler::BundleError;
    use solid_engine::{AppConfig, EnvMap, ExtendedOptions};
    use tempfile::TempDir;

    fn plugin(script: &str, when: When) -> ExecPlugin {
        ExecPlugin::new(ExecOptions {
            command: "sh".into(),
            args: vec!["-c".into(), script.into()],
            when,
            exit_code: 4,
        })
    }

    fn resolved(root: &std::path::Path, mode: BuildMode) -> ExtendedOptions {
        ExtendedOptions::resolve("site", &AppConfig::new(), mode, root)
    }

    fn ctx<'a>(
        options: &'a ExtendedOptions,
        env: &'a EnvMap,
        error: Option<&'a BundleError>,
    ) -> BuildContext<'a> {
        BuildContext {
            mode: options.mode,
            options,
            env,
            event: None,
            error,
        }
    }

    #[tokio::test]
    async fn test_success_with_env() {
        let dir = TempDir::new().unwrap();
        let options = resolved(dir.path(), BuildMode::Production);
        let mut env = EnvMap::new();
        env.insert("API_URL".into(), "https://api".into());

        let exec = plugin("test \"$API_URL\" = https://api && touch ran", When::Before);
        exec.before_build(&ctx(&options, &env, None)).await.unwrap();
        assert!(dir.path().join("ran").exists());
    }

    #[tokio::test]
    async fn test_failure_depends_on_mode() {
        let dir = TempDir::new().unwrap();
        let env = EnvMap::new();
        let exec = plugin("exit 3", When::Before);

        let dev = resolved(dir.path(), BuildMode::Development);
        match exec.before_build(&ctx(&dev, &env, None)).await {
            Err(PluginError::Recoverable(failure)) => assert_eq!(failure.exit_code, None),
            other => panic!("expected recoverable failure, got {other:?}"),
        }

        let prod = resolved(dir.path(), BuildMode::Production);
        match exec.before_build(&ctx(&prod, &env, None)).await {
            Err(PluginError::Recoverable(failure)) => assert_eq!(failure.exit_code, Some(4)),
            other => panic!("expected recoverable failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_after_skips_failed_builds() {
        let dir = TempDir::new().unwrap();
        let options = resolved(dir.path(), BuildMode::Production);
        let env = EnvMap::new();
        let exec = plugin("touch ran", When::After);

        exec.before_build(&ctx(&options, &env, None)).await.unwrap();
        let failure = BundleError::failed("broken");
        exec.after_build(&ctx(&options, &env, Some(&failure))).await.unwrap();
        assert!(!dir.path().join("ran").exists());

        exec.after_build(&ctx(&options, &env, None)).await.unwrap();
        assert!(dir.path().join("ran").exists());
    }

    #[tokio::test]
    async fn test_missing_program_is_unrecoverable() {
        let dir = TempDir::new().unwrap();
        let options = resolved(dir.path(), BuildMode::Development);
        let env = EnvMap::new();
        let exec = ExecPlugin::new(ExecOptions {
            command: "solid-no-such-command".into(),
            args: Vec::new(),
            when: When::Before,
            exit_code: 1,
        });

        let err = exec.before_build(&ctx(&options, &env, None)).await.unwrap_err();
        assert!(matches!(err, PluginError::Unrecoverable(_)));
    }
}
