//! Build and dev entrypoints.
//!
//! [`Solid`] resolves a registered app into per-run options, loads the run's
//! environment, and drives the bundler with middleware dispatched around each
//! pass:
//!
//! - `build` runs `before`, one production pass, then `after` exactly once
//!   with the pass result (success or failure).
//! - `dev` runs `before`, subscribes to the bundler's watch stream and
//!   dispatches `after` on every completion. With hard watch enabled the
//!   bundler is torn down on its second completion and a fresh instance is
//!   started after a short settle delay, `before` included.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Notify, oneshot};
use tokio::task::JoinHandle;

use crate::app::{BuildMode, ExtendedOptions};
use crate::bundler::{BuildEvent, BundleError, BundlerFactory, BundlerOptions};
use crate::dispatch::{DispatchReport, Dispatcher};
use crate::env::{DotenvLoader, EnvLoader, EnvMap, resolve_env};
use crate::error::{EngineError, Result};
use crate::exit::{ExitHandler, ProcessExit, terminate};
use crate::plugin::{BuildContext, Lifecycle, Plugin};
use crate::registry::AppRegistry;
use crate::report;
use crate::state::{RunState, StateTracker};

/// Delay between tearing down a watch bundler and starting its replacement.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(250);

/// Which app to run and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub app: String,
    /// Named environment; selects `.env.<name>` instead of `.env`
    pub env: Option<String>,
    pub disabled_plugins: Vec<String>,
}

impl RunRequest {
    pub fn new(app: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            env: None,
            disabled_plugins: Vec::new(),
        }
    }

    pub fn env(mut self, name: impl Into<String>) -> Self {
        self.env = Some(name.into());
        self
    }

    pub fn disable(mut self, plugin: impl Into<String>) -> Self {
        self.disabled_plugins.push(plugin.into());
        self
    }
}

/// Result of a successful production build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub app: String,
    pub event: BuildEvent,
    pub before: DispatchReport,
    pub after: DispatchReport,
}

/// Orchestrator handle. Cheap to clone.
#[derive(Clone)]
pub struct Solid {
    registry: Arc<AppRegistry>,
    factory: Arc<dyn BundlerFactory>,
    env_loader: Arc<dyn EnvLoader>,
    exit: Arc<dyn ExitHandler>,
    dispatcher: Arc<Dispatcher>,
    project_root: PathBuf,
    settle_delay: Duration,
}

impl Solid {
    pub fn new(registry: AppRegistry, factory: Arc<dyn BundlerFactory>) -> Self {
        let exit: Arc<dyn ExitHandler> = Arc::new(ProcessExit);
        Self {
            registry: Arc::new(registry),
            factory,
            env_loader: Arc::new(DotenvLoader),
            dispatcher: Arc::new(Dispatcher::new(exit.clone())),
            exit,
            project_root: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    pub fn with_env_loader(mut self, loader: Arc<dyn EnvLoader>) -> Self {
        self.env_loader = loader;
        self
    }

    pub fn with_exit_handler(mut self, exit: Arc<dyn ExitHandler>) -> Self {
        self.dispatcher = Arc::new(Dispatcher::new(exit.clone()));
        self.exit = exit;
        self
    }

    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = root.into();
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn registry(&self) -> &AppRegistry {
        &self.registry
    }

    pub fn project_root(&self) -> &std::path::Path {
        &self.project_root
    }

    /// Run one production build of `request.app`.
    ///
    /// A failed bundle is reported to `after` middleware and then returned
    /// as [`EngineError::Build`]; it does not terminate the process.
    pub async fn build(&self, request: RunRequest) -> Result<BuildReport> {
        let run = self.prepare(request, BuildMode::Production).await?;
        let app = run.options.name.clone();
        tracing::info!(app = %app, out_dir = %run.options.output_dir().display(), "Starting production build");

        run.state.transition(RunState::BeforeMiddleware)?;
        let before = self.dispatch(&run, Lifecycle::Before, &run.context(None, None)).await?;

        run.state.transition(RunState::Building)?;
        let options = BundlerOptions::from_run(&run.options, &run.env, false);
        let outcome = match self.factory.create(options) {
            Ok(mut bundler) => bundler.run().await,
            Err(err) => Err(err),
        };

        run.state.transition(RunState::AfterMiddleware)?;
        if let Err(err) = &outcome {
            report::build_failed(&app, &err.to_string());
        }
        let ctx = run.context(outcome.as_ref().ok(), outcome.as_ref().err());
        let after = self.dispatch(&run, Lifecycle::After, &ctx).await?;

        match outcome {
            Ok(event) => {
                run.state.transition(RunState::Done)?;
                tracing::info!(app = %app, duration = ?event.duration, "Build finished");
                Ok(BuildReport {
                    app,
                    event,
                    before,
                    after,
                })
            }
            Err(source) => {
                run.state.fail();
                Err(EngineError::Build { app, source })
            }
        }
    }

    /// Start a development watch session for `request.app`.
    ///
    /// Returns once the first build pass has been through `after`
    /// middleware. The session keeps running in the background until
    /// [`DevSession::stop`] is called or a fatal error ends it.
    pub async fn dev(&self, request: RunRequest) -> Result<DevSession> {
        let run = self.prepare(request, BuildMode::Development).await?;
        let app = run.options.name.clone();
        let state = run.state.clone();
        let stop = Arc::new(Notify::new());
        let (ready_tx, ready_rx) = oneshot::channel();

        tracing::info!(app = %app, hard_watch = run.options.hard_watch, "Starting dev session");
        let handle = tokio::spawn({
            let solid = self.clone();
            let stop = stop.clone();
            async move { solid.watch_loop(run, stop, ready_tx).await }
        });

        if ready_rx.await.is_err() {
            // The session ended before its first pass completed.
            return match handle.await {
                Ok(Err(err)) => Err(err),
                Ok(Ok(())) | Err(_) => Err(EngineError::SessionAborted(app)),
            };
        }

        Ok(DevSession {
            app,
            state,
            stop,
            handle,
        })
    }

    async fn prepare(&self, request: RunRequest, mode: BuildMode) -> Result<PreparedRun> {
        let state = StateTracker::new(&request.app);
        state.transition(RunState::Configuring)?;

        let config = match self.registry.get(&request.app) {
            Ok(config) => config,
            Err(_) => {
                state.fail();
                let err = EngineError::AppNotRegistered(request.app);
                return Err(terminate(self.exit.as_ref(), err));
            }
        };

        let options = ExtendedOptions::resolve(&request.app, config, mode, &self.project_root);
        let env = match resolve_env(
            self.env_loader.clone(),
            &self.project_root,
            request.env.as_deref(),
            &options.pass_envs,
        )
        .await
        {
            Ok(env) => env,
            Err(err) => {
                state.fail();
                return Err(terminate(self.exit.as_ref(), err.into()));
            }
        };

        tracing::debug!(app = %options.name, %mode, vars = env.len(), "Run prepared");
        Ok(PreparedRun {
            options,
            env,
            plugins: config.plugins.clone(),
            disabled: request.disabled_plugins,
            state,
        })
    }

    async fn dispatch(
        &self,
        run: &PreparedRun,
        lifecycle: Lifecycle,
        ctx: &BuildContext<'_>,
    ) -> Result<DispatchReport> {
        self.dispatcher
            .dispatch(lifecycle, ctx, &run.plugins, &run.disabled)
            .await
            .inspect_err(|_| run.state.fail())
    }

    async fn watch_loop(
        self,
        run: PreparedRun,
        stop: Arc<Notify>,
        ready: oneshot::Sender<()>,
    ) -> Result<()> {
        let app = run.options.name.clone();
        let mut ready = Some(ready);

        // One iteration per bundler instance.
        loop {
            run.state.transition(RunState::BeforeMiddleware)?;
            self.dispatch(&run, Lifecycle::Before, &run.context(None, None))
                .await?;

            run.state.transition(RunState::Building)?;
            let options = BundlerOptions::from_run(&run.options, &run.env, true);
            let subscribed = match self.factory.create(options) {
                Ok(mut bundler) => bundler.watch().await.map(|sub| (bundler, sub)),
                Err(err) => Err(err),
            };
            let (bundler, mut subscription) = match subscribed {
                Ok(pair) => pair,
                Err(source) => {
                    run.state.transition(RunState::AfterMiddleware)?;
                    report::build_failed(&app, &source.to_string());
                    self.dispatch(&run, Lifecycle::After, &run.context(None, Some(&source)))
                        .await?;
                    run.state.fail();
                    return Err(EngineError::Build { app, source });
                }
            };

            let mut completions = 0usize;
            loop {
                let next = tokio::select! {
                    biased;
                    _ = stop.notified() => None,
                    next = subscription.next() => Some(next),
                };

                let outcome = match next {
                    None => {
                        subscription.unsubscribe();
                        drop(bundler);
                        run.state.transition(RunState::Stopped)?;
                        tracing::info!(app = %app, "Dev session stopped");
                        return Ok(());
                    }
                    Some(None) => {
                        tracing::warn!(app = %app, "Bundler stopped delivering build events");
                        run.state.fail();
                        return Err(EngineError::SessionAborted(app));
                    }
                    Some(Some(outcome)) => outcome,
                };

                completions += 1;
                run.state.transition(RunState::AfterMiddleware)?;
                match &outcome {
                    Ok(event) => {
                        tracing::info!(app = %app, duration = ?event.duration, changed = event.changed.len(), "Rebuilt")
                    }
                    Err(err) => report::build_failed(&app, &err.to_string()),
                }
                let ctx = run.context(outcome.as_ref().ok(), outcome.as_ref().err());
                self.dispatch(&run, Lifecycle::After, &ctx).await?;

                if let Some(ready) = ready.take() {
                    let _ = ready.send(());
                }

                if run.options.hard_watch && completions >= 2 {
                    break;
                }
                run.state.transition(RunState::WatchIdle)?;
            }

            run.state.transition(RunState::Restarting)?;
            subscription.unsubscribe();
            drop(bundler);
            tracing::info!(app = %app, delay = ?self.settle_delay, "Restarting bundler");

            tokio::select! {
                biased;
                _ = stop.notified() => {
                    run.state.transition(RunState::Stopped)?;
                    tracing::info!(app = %app, "Dev session stopped");
                    return Ok(());
                }
                _ = tokio::time::sleep(self.settle_delay) => {}
            }
        }
    }
}

impl std::fmt::Debug for Solid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Solid")
            .field("apps", &self.registry.names().collect::<Vec<_>>())
            .field("project_root", &self.project_root)
            .field("settle_delay", &self.settle_delay)
            .finish_non_exhaustive()
    }
}

/// Per-run data shared by every dispatch of the run.
struct PreparedRun {
    options: ExtendedOptions,
    env: EnvMap,
    plugins: Vec<Arc<dyn Plugin>>,
    disabled: Vec<String>,
    state: StateTracker,
}

impl PreparedRun {
    fn context<'a>(
        &'a self,
        event: Option<&'a BuildEvent>,
        error: Option<&'a BundleError>,
    ) -> BuildContext<'a> {
        BuildContext {
            mode: self.options.mode,
            options: &self.options,
            env: &self.env,
            event,
            error,
        }
    }
}

/// Handle to a running dev session.
///
/// Dropping the handle leaves the session running; call [`DevSession::stop`]
/// to end it.
#[derive(Debug)]
pub struct DevSession {
    app: String,
    state: StateTracker,
    stop: Arc<Notify>,
    handle: JoinHandle<Result<()>>,
}

impl DevSession {
    pub fn app(&self) -> &str {
        &self.app
    }

    pub fn state(&self) -> RunState {
        self.state.current()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Detached handle that can stop the session while it is being awaited.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(self.stop.clone())
    }

    /// Ask the session to stop. The bundler is unsubscribed at the next
    /// point the session waits on it.
    pub fn stop(&self) {
        self.stop.notify_one();
    }

    /// Wait for the session to end.
    pub async fn wait(self) -> Result<()> {
        match self.handle.await {
            Ok(result) => result,
            Err(err) => {
                tracing::error!(app = %self.app, error = %err, "Dev session task failed");
                Err(EngineError::SessionAborted(self.app))
            }
        }
    }

    pub async fn shutdown(self) -> Result<()> {
        self.stop();
        self.wait().await
    }
}

#[derive(Debug, Clone)]
pub struct StopHandle(Arc<Notify>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.notify_one();
    }
}
