//! Test doubles shared by the orchestrator integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use solid_engine::bundler::{
    BuildOutcome, Bundler, BundlerFactory, BundlerOptions, WatchSubscription,
};
use solid_engine::env::EnvError;
use solid_engine::{
    AppRegistry, BuildContext, BuildEvent, BundleError, EnvLoader, EnvMap, ExitHandler, Plugin,
    PluginError, PluginResult, Solid,
};
use tokio::sync::mpsc;

/// Records exit requests instead of terminating.
#[derive(Default)]
pub struct RecordingExit {
    codes: Mutex<Vec<i32>>,
}

impl RecordingExit {
    pub fn codes(&self) -> Vec<i32> {
        self.codes.lock().clone()
    }
}

impl ExitHandler for RecordingExit {
    fn exit(&self, code: i32) {
        self.codes.lock().push(code);
    }
}

/// Shared call log. Entries look like `"lint:before:start"`.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn calls_matching(log: &CallLog, suffix: &str) -> Vec<String> {
    log.lock()
        .iter()
        .filter(|entry| entry.ends_with(suffix))
        .cloned()
        .collect()
}

type Responder = Box<dyn Fn() -> PluginResult + Send + Sync>;

/// Plugin that logs each hook call and returns scripted results.
pub struct RecordingPlugin {
    name: String,
    log: CallLog,
    delay: Duration,
    before: Option<Responder>,
    after: Option<Responder>,
    /// Whether each `after` call saw a failed pass
    pub after_errors: Mutex<Vec<bool>>,
    /// Env seen by `before` calls
    pub seen_env: Mutex<Vec<EnvMap>>,
}

impl RecordingPlugin {
    pub fn new(name: &str, log: &CallLog) -> Self {
        Self {
            name: name.to_string(),
            log: log.clone(),
            delay: Duration::ZERO,
            before: None,
            after: None,
            after_errors: Mutex::new(Vec::new()),
            seen_env: Mutex::new(Vec::new()),
        }
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn before_returns(mut self, f: impl Fn() -> PluginResult + Send + Sync + 'static) -> Self {
        self.before = Some(Box::new(f));
        self
    }

    pub fn after_returns(mut self, f: impl Fn() -> PluginResult + Send + Sync + 'static) -> Self {
        self.after = Some(Box::new(f));
        self
    }

    async fn hook(&self, phase: &str, responder: &Option<Responder>) -> PluginResult {
        self.log.lock().push(format!("{}:{phase}:start", self.name));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.log.lock().push(format!("{}:{phase}:end", self.name));
        match responder {
            Some(f) => f(),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Plugin for RecordingPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    async fn before_build(&self, ctx: &BuildContext<'_>) -> PluginResult {
        self.seen_env.lock().push(ctx.env.clone());
        self.hook("before", &self.before).await
    }

    async fn after_build(&self, ctx: &BuildContext<'_>) -> PluginResult {
        self.after_errors.lock().push(ctx.error.is_some());
        self.hook("after", &self.after).await
    }
}

pub fn recoverable(message: &'static str) -> impl Fn() -> PluginResult + Send + Sync {
    move || Err(PluginError::recoverable(message))
}

pub fn crash(message: &'static str) -> impl Fn() -> PluginResult + Send + Sync {
    move || Err(PluginError::unrecoverable(anyhow::anyhow!(message)))
}

/// Shared bookkeeping of a [`MockFactory`].
#[derive(Default)]
pub struct MockState {
    pub created: usize,
    pub teardowns: usize,
    pub options: Vec<BundlerOptions>,
    /// Results handed out by `run`, oldest first; empty means success
    pub run_results: VecDeque<BuildOutcome>,
    /// Senders of every watch subscription, in creation order
    pub senders: Vec<mpsc::Sender<BuildOutcome>>,
    pub fail_create: bool,
}

/// Bundler factory whose instances are driven by the test.
#[derive(Clone, Default)]
pub struct MockFactory {
    pub state: Arc<Mutex<MockState>>,
}

impl MockFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created(&self) -> usize {
        self.state.lock().created
    }

    pub fn teardowns(&self) -> usize {
        self.state.lock().teardowns
    }

    pub fn push_run_result(&self, outcome: BuildOutcome) {
        self.state.lock().run_results.push_back(outcome);
    }

    pub fn sender(&self, index: usize) -> mpsc::Sender<BuildOutcome> {
        self.state.lock().senders[index].clone()
    }

    pub fn subscriptions(&self) -> usize {
        self.state.lock().senders.len()
    }

    /// Deliver a completion to the newest subscription.
    pub async fn complete(&self, outcome: BuildOutcome) {
        let sender = {
            let state = self.state.lock();
            state.senders.last().cloned()
        };
        sender
            .expect("no watch subscription")
            .send(outcome)
            .await
            .expect("subscription closed");
    }
}

impl BundlerFactory for MockFactory {
    fn create(&self, options: BundlerOptions) -> Result<Box<dyn Bundler>, BundleError> {
        let mut state = self.state.lock();
        if state.fail_create {
            return Err(BundleError::failed("bundler unavailable"));
        }
        state.created += 1;
        state.options.push(options);
        Ok(Box::new(MockBundler {
            state: self.state.clone(),
        }))
    }
}

struct MockBundler {
    state: Arc<Mutex<MockState>>,
}

#[async_trait]
impl Bundler for MockBundler {
    async fn run(&mut self) -> BuildOutcome {
        self.state
            .lock()
            .run_results
            .pop_front()
            .unwrap_or_else(|| Ok(BuildEvent::default()))
    }

    async fn watch(&mut self) -> Result<WatchSubscription, BundleError> {
        let (tx, rx) = mpsc::channel(8);
        self.state.lock().senders.push(tx);
        let state = self.state.clone();
        Ok(WatchSubscription::new(rx, move || {
            state.lock().teardowns += 1;
        }))
    }
}

/// In-memory dotenv files and host variables.
#[derive(Default)]
pub struct MemoryEnv {
    pub files: HashMap<String, EnvMap>,
    pub host: HashMap<String, String>,
}

impl EnvLoader for MemoryEnv {
    fn load(&self, path: &Path) -> Result<Option<EnvMap>, EnvError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(self.files.get(&name).cloned())
    }

    fn host_var(&self, key: &str) -> Option<String> {
        self.host.get(key).cloned()
    }
}

pub struct Harness {
    pub solid: Solid,
    pub factory: MockFactory,
    pub exit: Arc<RecordingExit>,
}

pub fn harness(registry: AppRegistry) -> Harness {
    harness_with_env(registry, MemoryEnv::default())
}

pub fn harness_with_env(registry: AppRegistry, env: MemoryEnv) -> Harness {
    let factory = MockFactory::new();
    let exit = Arc::new(RecordingExit::default());
    let solid = Solid::new(registry, Arc::new(factory.clone()))
        .with_exit_handler(exit.clone())
        .with_env_loader(Arc::new(env))
        .with_project_root("/project")
        .with_settle_delay(Duration::from_millis(10));
    Harness {
        solid,
        factory,
        exit,
    }
}

/// Poll `cond` until it holds or two seconds pass.
pub async fn wait_until(mut cond: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !cond() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not met in time"
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
