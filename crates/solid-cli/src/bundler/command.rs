//! Bundler driven through an external program.
//!
//! Each pass runs the configured program (`parcel` unless the settings say
//! otherwise) as `<program> build <entries...> --dist-dir <out> --public-url
//! <url> [flags] [bundler_args...]`. Watch mode owns a [`FileWatcher`] over
//! the app's source root and re-runs the program after each burst of changes.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use solid_config::Settings;
use solid_engine::bundler::{
    Bundler, BundlerFactory, OutputFormat, Target, WatchSubscription,
};
use solid_engine::{BuildEvent, BuildOutcome, BundleError, BundlerOptions};
use tokio::process::Command;
use tokio::sync::mpsc;

use super::watcher::{FileWatcher, IgnoreRules};

/// Lines of bundler stderr kept in a failure message.
const STDERR_TAIL: usize = 20;

/// Creates a [`CommandBundler`] per build from the project settings.
#[derive(Debug, Clone)]
pub struct CommandBundlerFactory {
    settings: Settings,
}

impl CommandBundlerFactory {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }
}

impl BundlerFactory for CommandBundlerFactory {
    fn create(&self, options: BundlerOptions) -> Result<Box<dyn Bundler>, BundleError> {
        tracing::debug!(program = %self.settings.bundler, watch = options.watch, "Creating bundler");
        Ok(Box::new(CommandBundler::new(&self.settings, options)))
    }
}

#[derive(Debug, Clone)]
pub struct CommandBundler {
    program: String,
    extra_args: Vec<String>,
    debounce: Duration,
    ignore: Vec<String>,
    options: BundlerOptions,
}

impl CommandBundler {
    pub fn new(settings: &Settings, options: BundlerOptions) -> Self {
        Self {
            program: settings.bundler.clone(),
            extra_args: settings.bundler_args.clone(),
            debounce: Duration::from_millis(settings.debounce_ms),
            ignore: settings.watch_ignore.clone(),
            options,
        }
    }

    /// Arguments passed to the program for one pass.
    pub fn args(&self) -> Vec<String> {
        let options = &self.options;
        let mut args = vec!["build".to_string()];
        args.extend(options.entries.iter().cloned());
        args.push("--dist-dir".to_string());
        args.push(options.out_dir.display().to_string());
        args.push("--public-url".to_string());
        args.push(options.public_url.clone());
        if !options.minify {
            args.push("--no-optimize".to_string());
        }
        if !options.source_maps {
            args.push("--no-source-maps".to_string());
        }
        args.extend(self.extra_args.iter().cloned());
        args
    }

    fn command(&self) -> Command {
        let options = &self.options;
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args())
            .current_dir(&options.cwd)
            .envs(&options.env)
            .env(
                "NODE_ENV",
                if options.production {
                    "production"
                } else {
                    "development"
                },
            )
            .env(
                "SOLID_TARGET",
                match options.target {
                    Target::Browser => "browser",
                    Target::Node => "node",
                },
            )
            .env(
                "SOLID_OUTPUT_FORMAT",
                match options.output_format {
                    OutputFormat::Global => "global",
                    OutputFormat::CommonJs => "commonjs",
                },
            )
            .stdin(Stdio::null())
            .kill_on_drop(true);
        cmd
    }

    async fn build_once(&self, changed: Vec<PathBuf>) -> BuildOutcome {
        let start = Instant::now();
        tracing::debug!(program = %self.program, args = ?self.args(), "Running bundler");

        let output = self
            .command()
            .output()
            .await
            .map_err(|source| BundleError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let diagnostics: Vec<String> = stderr.lines().map(str::to_string).collect();
            let tail = diagnostics
                .iter()
                .skip(diagnostics.len().saturating_sub(STDERR_TAIL))
                .cloned()
                .collect::<Vec<_>>()
                .join("\n");
            let mut message = format!("{} exited with {}", self.program, output.status);
            if !tail.is_empty() {
                message.push('\n');
                message.push_str(&tail);
            }
            return Err(BundleError::Failed {
                message,
                diagnostics,
            });
        }

        let out_dir = self.options.out_dir.clone();
        let outputs = tokio::task::spawn_blocking(move || collect_files(&out_dir))
            .await
            .unwrap_or_default();

        Ok(BuildEvent {
            duration: start.elapsed(),
            changed,
            outputs,
        })
    }
}

#[async_trait]
impl Bundler for CommandBundler {
    async fn run(&mut self) -> BuildOutcome {
        self.build_once(Vec::new()).await
    }

    async fn watch(&mut self) -> Result<WatchSubscription, BundleError> {
        let rules = IgnoreRules::new(self.ignore.clone()).exclude_dir(self.options.out_dir.clone());
        let (watcher, mut changes) =
            FileWatcher::new(self.options.root.clone(), rules, self.debounce)
                .map_err(|e| BundleError::Watch(e.to_string()))?;

        let (tx, rx) = mpsc::channel(16);
        let bundler = self.clone();
        let task = tokio::spawn(async move {
            let _watcher = watcher;
            if tx.send(bundler.build_once(Vec::new()).await).await.is_err() {
                return;
            }

            while let Some(first) = changes.recv().await {
                // Let a burst of saves settle into one pass.
                tokio::time::sleep(bundler.debounce).await;
                let mut changed = vec![first.path().to_path_buf()];
                while let Ok(more) = changes.try_recv() {
                    let path = more.path().to_path_buf();
                    if !changed.contains(&path) {
                        changed.push(path);
                    }
                }

                tracing::debug!(files = changed.len(), "Change detected, rebuilding");
                if tx.send(bundler.build_once(changed).await).await.is_err() {
                    break;
                }
            }
        });

        Ok(WatchSubscription::new(rx, move || task.abort()))
    }
}

/// Every file under `dir`, sorted. Missing or unreadable directories yield
/// nothing.
fn collect_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        let Ok(entries) = std::fs::read_dir(&current) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
            } else {
                files.push(path);
            }
        }
    }
    files.sort();
    files
}
