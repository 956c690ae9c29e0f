//! Watch-mode orchestration tests.

mod common;

use std::sync::Arc;

use common::*;
use solid_engine::{
    AppConfig, AppRegistry, BuildEvent, BundleError, DevSession, EngineError, RunRequest,
    RunState,
};

fn registry(plugin: Arc<RecordingPlugin>, hard_watch: bool) -> AppRegistry {
    let mut registry = AppRegistry::new();
    registry
        .register(
            "site",
            AppConfig::new().hard_watch(hard_watch).plugin(plugin),
        )
        .unwrap();
    registry
}

/// Start a session and deliver its initial build.
async fn start(h: &Harness) -> DevSession {
    let pending = tokio::spawn({
        let solid = h.solid.clone();
        async move { solid.dev(RunRequest::new("site")).await }
    });
    wait_until(|| h.factory.subscriptions() == 1).await;
    h.factory.complete(Ok(BuildEvent::default())).await;
    pending.await.unwrap().unwrap()
}

#[tokio::test]
async fn test_dev_returns_after_initial_pass() {
    let log = call_log();
    let plugin = Arc::new(RecordingPlugin::new("p", &log));
    let h = harness(registry(plugin.clone(), true));

    let session = start(&h).await;

    assert_eq!(session.app(), "site");
    assert_eq!(session.state(), RunState::WatchIdle);
    assert_eq!(calls_matching(&log, "p:before:end").len(), 1);
    assert_eq!(calls_matching(&log, "p:after:end").len(), 1);

    let state = h.factory.state.lock();
    assert!(state.options[0].watch);
    assert!(!state.options[0].production);
    assert!(state.options[0].source_maps);
    drop(state);
    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_hard_watch_restarts_on_second_completion() {
    let log = call_log();
    let plugin = Arc::new(RecordingPlugin::new("p", &log));
    let h = harness(registry(plugin.clone(), true));
    let session = start(&h).await;

    h.factory.complete(Ok(BuildEvent::default())).await;
    wait_until(|| h.factory.subscriptions() == 2).await;

    assert_eq!(h.factory.created(), 2);
    assert_eq!(h.factory.teardowns(), 1);
    assert_eq!(calls_matching(&log, "p:before:end").len(), 2);
    assert_eq!(calls_matching(&log, "p:after:end").len(), 2);

    // The discarded instance can no longer deliver completions.
    assert!(h.factory.sender(0).send(Ok(BuildEvent::default())).await.is_err());

    h.factory.complete(Ok(BuildEvent::default())).await;
    wait_until(|| calls_matching(&log, "p:after:end").len() == 3).await;
    assert_eq!(h.factory.created(), 2);

    session.shutdown().await.unwrap();
    assert_eq!(h.factory.teardowns(), 2);
}

#[tokio::test]
async fn test_soft_watch_runs_before_once() {
    let log = call_log();
    let plugin = Arc::new(RecordingPlugin::new("p", &log));
    let h = harness(registry(plugin.clone(), false));
    let session = start(&h).await;

    for expected in 2..=4 {
        h.factory.complete(Ok(BuildEvent::default())).await;
        wait_until(|| calls_matching(&log, "p:after:end").len() == expected).await;
    }

    assert_eq!(calls_matching(&log, "p:before:end").len(), 1);
    assert_eq!(h.factory.created(), 1);
    assert_eq!(h.factory.teardowns(), 0);
    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_failed_rebuild_keeps_watching() {
    let log = call_log();
    let plugin = Arc::new(RecordingPlugin::new("p", &log));
    let h = harness(registry(plugin.clone(), false));
    let session = start(&h).await;

    h.factory
        .complete(Err(BundleError::failed("unexpected token")))
        .await;
    wait_until(|| plugin.after_errors.lock().len() == 2).await;

    assert_eq!(*plugin.after_errors.lock(), vec![false, true]);
    assert!(h.exit.codes().is_empty());
    wait_until(|| session.state() == RunState::WatchIdle).await;
    assert!(!session.is_finished());
    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_stop_unsubscribes() {
    let log = call_log();
    let plugin = Arc::new(RecordingPlugin::new("p", &log));
    let h = harness(registry(plugin, true));
    let session = start(&h).await;

    session.stop();
    wait_until(|| h.factory.teardowns() == 1).await;
    assert!(h.factory.sender(0).send(Ok(BuildEvent::default())).await.is_err());
}

#[tokio::test]
async fn test_dropping_session_keeps_it_running() {
    let log = call_log();
    let plugin = Arc::new(RecordingPlugin::new("p", &log));
    let h = harness(registry(plugin, false));
    let session = start(&h).await;
    drop(session);

    h.factory.complete(Ok(BuildEvent::default())).await;
    wait_until(|| calls_matching(&log, "p:after:end").len() == 2).await;
    assert_eq!(h.factory.teardowns(), 0);
}

#[tokio::test]
async fn test_crash_in_after_ends_session_with_code_3() {
    let log = call_log();
    let plugin = Arc::new(RecordingPlugin::new("p", &log).after_returns(crash("boom")));
    let h = harness(registry(plugin, true));

    let pending = tokio::spawn({
        let solid = h.solid.clone();
        async move { solid.dev(RunRequest::new("site")).await }
    });
    wait_until(|| h.factory.subscriptions() == 1).await;
    h.factory.complete(Ok(BuildEvent::default())).await;

    let err = pending.await.unwrap().unwrap_err();
    assert!(matches!(err, EngineError::PluginCrashed { .. }));
    assert_eq!(h.exit.codes(), vec![3]);
    wait_until(|| h.factory.teardowns() == 1).await;
}

#[tokio::test]
async fn test_bundler_start_failure_reaches_after() {
    let log = call_log();
    let plugin = Arc::new(RecordingPlugin::new("p", &log));
    let h = harness(registry(plugin.clone(), true));
    h.factory.state.lock().fail_create = true;

    let err = h.solid.dev(RunRequest::new("site")).await.unwrap_err();

    assert!(matches!(err, EngineError::Build { .. }));
    assert_eq!(*plugin.after_errors.lock(), vec![true]);
    assert!(h.exit.codes().is_empty());
}

#[tokio::test]
async fn test_unregistered_app_in_dev() {
    let log = call_log();
    let h = harness(registry(Arc::new(RecordingPlugin::new("p", &log)), true));

    let err = h.solid.dev(RunRequest::new("nope")).await.unwrap_err();

    assert!(matches!(err, EngineError::AppNotRegistered(_)));
    assert_eq!(h.exit.codes(), vec![1]);
    assert_eq!(h.factory.created(), 0);
}
