//! Run state tracking.
//!
//! Every `build` and `dev` run walks a small state machine. Transitions are
//! validated so an orchestrator bug shows up as an error instead of a hook
//! running at the wrong time.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    Idle,
    /// Resolving options and environment
    Configuring,
    BeforeMiddleware,
    /// Waiting on the bundler for a pass to complete
    Building,
    AfterMiddleware,
    /// Watch session between passes
    WatchIdle,
    /// Hard-watch teardown and settle delay
    Restarting,
    Done,
    Failed,
    Stopped,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::Configuring => "configuring",
            RunState::BeforeMiddleware => "before-middleware",
            RunState::Building => "building",
            RunState::AfterMiddleware => "after-middleware",
            RunState::WatchIdle => "watch-idle",
            RunState::Restarting => "restarting",
            RunState::Done => "done",
            RunState::Failed => "failed",
            RunState::Stopped => "stopped",
        }
    }

    pub fn valid_next_states(&self) -> &'static [RunState] {
        use RunState::*;
        match self {
            Idle => &[Configuring],
            Configuring => &[BeforeMiddleware, Failed],
            BeforeMiddleware => &[Building, Failed],
            Building => &[AfterMiddleware, Failed, Stopped],
            AfterMiddleware => &[Done, WatchIdle, Restarting, Failed],
            WatchIdle => &[AfterMiddleware, Failed, Stopped],
            Restarting => &[BeforeMiddleware, Stopped],
            Done | Failed | Stopped => &[],
        }
    }

    pub fn can_transition_to(&self, next: RunState) -> bool {
        self.valid_next_states().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Done | RunState::Failed | RunState::Stopped)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared, validated view of one run's state.
#[derive(Debug, Clone)]
pub struct StateTracker {
    app: Arc<str>,
    state: Arc<RwLock<RunState>>,
}

impl StateTracker {
    pub fn new(app: &str) -> Self {
        Self {
            app: Arc::from(app),
            state: Arc::new(RwLock::new(RunState::Idle)),
        }
    }

    pub fn current(&self) -> RunState {
        *self.state.read()
    }

    pub fn transition(&self, next: RunState) -> Result<(), EngineError> {
        let mut state = self.state.write();
        if !state.can_transition_to(next) {
            return Err(EngineError::InvalidTransition {
                from: *state,
                to: next,
            });
        }
        tracing::debug!(app = %self.app, from = %*state, to = %next, "Run state changed");
        *state = next;
        Ok(())
    }

    /// Move to `Failed` unless the run already ended.
    pub fn fail(&self) {
        let mut state = self.state.write();
        if !state.is_terminal() {
            tracing::debug!(app = %self.app, from = %*state, "Run failed");
            *state = RunState::Failed;
        }
    }
}
