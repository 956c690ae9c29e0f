//! Underlying bundler interface.
//!
//! The orchestrator never bundles anything itself. It asks a
//! [`BundlerFactory`] for a fresh [`Bundler`] instance per build (and per
//! hard-watch restart), then either runs it once or subscribes to its watch
//! stream. Build results are passed through to middleware untouched.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::app::ExtendedOptions;
use crate::env::EnvMap;
use solid_config::AppType;

/// Runtime context the bundle targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Browser,
    Node,
}

/// Module format of the emitted bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Script that assigns to the global scope
    Global,
    CommonJs,
}

/// Options handed to the bundler factory for one instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundlerOptions {
    pub entries: Vec<String>,
    pub cwd: PathBuf,
    pub out_dir: PathBuf,
    pub root: PathBuf,
    pub public_url: String,
    pub production: bool,
    pub minify: bool,
    pub source_maps: bool,
    pub target: Target,
    pub output_format: OutputFormat,
    pub watch: bool,
    pub env: EnvMap,
}

impl BundlerOptions {
    /// Translate resolved app options into bundler options.
    ///
    /// Production web builds are minified; every non-production build gets
    /// source maps.
    pub fn from_run(options: &ExtendedOptions, env: &EnvMap, watch: bool) -> Self {
        let production = options.mode.is_production();
        let (target, output_format) = match options.app_type {
            AppType::Web => (Target::Browser, OutputFormat::Global),
            AppType::Node => (Target::Node, OutputFormat::CommonJs),
        };

        Self {
            entries: options.input.clone(),
            cwd: options.project_root.clone(),
            out_dir: options.output_dir(),
            root: options.source_root(),
            public_url: options.public_url.clone(),
            production,
            minify: production && options.app_type == AppType::Web,
            source_maps: !production,
            target,
            output_format,
            watch,
            env: env.clone(),
        }
    }
}

/// Successful build pass as reported by the bundler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildEvent {
    pub duration: Duration,
    /// Files that triggered the pass; empty for initial builds
    pub changed: Vec<PathBuf>,
    /// Files written by the pass, when the bundler reports them
    pub outputs: Vec<PathBuf>,
}

/// Failed build pass, or a bundler that could not be started.
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("{message}")]
    Failed {
        message: String,
        /// Raw diagnostic output from the bundler
        diagnostics: Vec<String>,
    },

    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("watcher error: {0}")]
    Watch(String),
}

impl BundleError {
    pub fn failed(message: impl Into<String>) -> Self {
        BundleError::Failed {
            message: message.into(),
            diagnostics: Vec::new(),
        }
    }
}

pub type BuildOutcome = Result<BuildEvent, BundleError>;

/// One bundler instance, bound to the options it was created with.
#[async_trait]
pub trait Bundler: Send {
    /// Run a single build pass.
    async fn run(&mut self) -> BuildOutcome;

    /// Start watching. The subscription yields one outcome per completed
    /// pass, starting with the initial build.
    async fn watch(&mut self) -> Result<WatchSubscription, BundleError>;
}

pub trait BundlerFactory: Send + Sync {
    fn create(&self, options: BundlerOptions) -> Result<Box<dyn Bundler>, BundleError>;
}

/// Stream of watch-mode build completions.
///
/// Dropping or unsubscribing runs the teardown hook exactly once, so no
/// completion is delivered after teardown.
pub struct WatchSubscription {
    events: mpsc::Receiver<BuildOutcome>,
    teardown: Option<Box<dyn FnOnce() + Send>>,
}

impl WatchSubscription {
    pub fn new(
        events: mpsc::Receiver<BuildOutcome>,
        teardown: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            events,
            teardown: Some(Box::new(teardown)),
        }
    }

    /// Next completed pass, or `None` once the bundler stops delivering.
    pub async fn next(&mut self) -> Option<BuildOutcome> {
        self.events.recv().await
    }

    pub fn unsubscribe(mut self) {
        self.teardown_once();
    }

    fn teardown_once(&mut self) {
        self.events.close();
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl Drop for WatchSubscription {
    fn drop(&mut self) {
        self.teardown_once();
    }
}
