//! Bounded-wait execution tests for `ActionExecutor`.
//!
//! Covers the visibility precondition, inline dispatch for zero timeouts,
//! deadline handling, fault absorption and the perform log.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{
    capture_tracing, detached, init_tracing, list, zero_area, CapturedLogs, DisconnectedInjector,
    ProbeAction, ProbeResult,
};

use touchdriver_core::action::{ActionError, SwipeAction, TextAction};
use touchdriver_core::config::ExecutorConfig;
use touchdriver_core::direction::PhysicalDirection;
use touchdriver_core::executor::{ActionExecutor, PerformOutcome, PerformStatus};
use touchdriver_core::geometry::Rect;
use touchdriver_core::injector::RecordingInjector;

fn screen() -> Rect {
    Rect::new(0, 0, 1080, 1920)
}

fn recording_executor() -> (ActionExecutor, Arc<RecordingInjector>) {
    init_tracing();
    let injector = Arc::new(RecordingInjector::new());
    let executor = ActionExecutor::new(injector.clone());
    (executor, injector)
}

// ---------------------------------------------------------------------------
// Visibility precondition
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_zero_area_element_fails_fast() {
    let (executor, injector) = recording_executor();
    let (action, state) = ProbeAction::new(1000, Duration::ZERO, ProbeResult::Succeed);

    let err = executor.perform(&zero_area(), action).await.unwrap_err();

    assert!(matches!(err, ActionError::ElementNotVisible { .. }));
    assert!(err.to_string().contains("ProbeAction"));
    assert!(err.to_string().contains("text=collapsed"));
    assert_eq!(state.calls(), 0, "action body must not run");
    assert_eq!(injector.call_count(), 0);
}

#[tokio::test]
async fn test_detached_element_fails_fast_for_every_wrapper() {
    let (executor, injector) = recording_executor();
    let element = detached();

    assert!(executor.click(&element).await.is_err());
    assert!(executor.long_click(&element).await.is_err());
    assert!(executor.double_click(&element).await.is_err());
    assert!(executor.scroll(&element, PhysicalDirection::Up).await.is_err());
    assert!(executor.drag(&element, PhysicalDirection::Left).await.is_err());
    assert!(executor.set_text(&element, "nope").await.is_err());

    assert_eq!(injector.call_count(), 0);
    assert!(executor
        .history()
        .iter()
        .all(|r| r.status == PerformStatus::NotVisible));
}

// ---------------------------------------------------------------------------
// Inline dispatch
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_zero_timeout_runs_inline_on_caller_thread() {
    let (executor, injector) = recording_executor();
    let (action, state) = ProbeAction::new(0, Duration::ZERO, ProbeResult::Succeed);
    let caller = std::thread::current().id();

    state.push("before");
    let ok = executor.perform(&list(screen()), action).await.unwrap();
    state.push("after");

    assert!(ok);
    assert_eq!(state.trace(), vec!["before", "body", "after"]);
    assert_eq!(*state.thread.lock().unwrap(), Some(caller));
    assert_eq!(injector.call_count(), 2);
}

#[tokio::test]
async fn test_zero_timeout_propagates_body_error() {
    let (executor, _injector) = recording_executor();
    let (action, state) = ProbeAction::new(0, Duration::ZERO, ProbeResult::Fail);

    let err = executor.perform(&list(screen()), action).await.unwrap_err();
    assert!(matches!(err, ActionError::Injection(_)));
    assert_eq!(state.calls(), 1);

    let history = executor.history();
    assert!(matches!(history[0].status, PerformStatus::Faulted(ref m) if m.contains("probe failure")));
}

#[tokio::test]
async fn test_zero_timeout_text_on_dead_transport_propagates() {
    init_tracing();
    let injector = Arc::new(DisconnectedInjector::default());
    let executor = ActionExecutor::new(injector.clone());

    let err = executor
        .perform(&list(screen()), TextAction::with_timeout("abc", 0))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not connected"));
}

// ---------------------------------------------------------------------------
// Waited dispatch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_waited_body_result_is_returned() {
    let (executor, _injector) = recording_executor();

    let (action, _) = ProbeAction::new(1000, Duration::ZERO, ProbeResult::Succeed);
    assert!(executor.perform(&list(screen()), action).await.unwrap());

    let (action, state) = ProbeAction::new(1000, Duration::ZERO, ProbeResult::ReturnFalse);
    let outcome = executor.try_perform(&list(screen()), action).await.unwrap();
    assert!(matches!(outcome, PerformOutcome::Completed(false)));
    assert!(state.completed());
}

#[tokio::test(start_paused = true)]
async fn test_deadline_returns_false_and_body_keeps_running() {
    let (executor, injector) = recording_executor();
    let (action, state) = ProbeAction::new(10, Duration::from_millis(200), ProbeResult::Succeed);

    let outcome = executor.try_perform(&list(screen()), action).await.unwrap();
    assert!(matches!(outcome, PerformOutcome::DeadlineExceeded));
    assert_eq!(state.calls(), 1);
    assert!(!state.completed());
    assert_eq!(injector.call_count(), 0);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(state.completed(), "detached body runs to completion");
    assert_eq!(injector.call_count(), 2);
    assert_eq!(executor.history()[0].status, PerformStatus::TimedOut);
}

#[tokio::test(start_paused = true)]
async fn test_deadline_as_bool_is_false_not_error() {
    let (executor, _injector) = recording_executor();
    let (action, _) = ProbeAction::new(5, Duration::from_secs(2), ProbeResult::Succeed);
    assert!(!executor.perform(&list(screen()), action).await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_abort_on_timeout_stops_body() {
    init_tracing();
    let injector = Arc::new(RecordingInjector::new());
    let config = ExecutorConfig::default().with_abort_on_timeout(true);
    let executor = ActionExecutor::with_config(injector.clone(), config);
    assert!(executor.config().abort_on_timeout);
    let (action, state) = ProbeAction::new(10, Duration::from_millis(200), ProbeResult::Succeed);

    assert!(!executor.perform(&list(screen()), action).await.unwrap());
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert!(!state.completed());
    assert_eq!(injector.call_count(), 0);
}

#[tokio::test]
async fn test_waited_body_error_is_absorbed() {
    let (executor, _injector) = recording_executor();
    let (action, _) = ProbeAction::new(1000, Duration::ZERO, ProbeResult::Fail);

    let ok = executor.perform(&list(screen()), action).await.unwrap();
    assert!(!ok);

    let (action, _) = ProbeAction::new(1000, Duration::ZERO, ProbeResult::Fail);
    let outcome = executor.try_perform(&list(screen()), action).await.unwrap();
    assert!(matches!(outcome, PerformOutcome::Faulted(ActionError::Injection(_))));
}

#[tokio::test]
async fn test_panicking_body_is_absorbed() {
    let (executor, _injector) = recording_executor();
    let (action, _) = ProbeAction::new(1000, Duration::ZERO, ProbeResult::Panic);

    let outcome = executor.try_perform(&list(screen()), action).await.unwrap();
    assert!(matches!(outcome, PerformOutcome::Faulted(ActionError::TaskFailed(_))));
}

#[tokio::test]
async fn test_scroll_on_dead_transport_is_false() {
    init_tracing();
    let injector = Arc::new(DisconnectedInjector::default());
    let executor = ActionExecutor::new(injector.clone());

    let ok = executor.scroll(&list(screen()), PhysicalDirection::Down).await.unwrap();
    assert!(!ok);
    assert_eq!(injector.attempts.load(std::sync::atomic::Ordering::SeqCst), 1);
}

// ---------------------------------------------------------------------------
// Convenience wrappers and the perform log
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_scroll_injects_full_gesture() {
    let (executor, injector) = recording_executor();
    assert!(executor.scroll(&list(screen()), PhysicalDirection::Down).await.unwrap());
    assert_eq!(injector.events().len(), 51);
}

#[tokio::test]
async fn test_set_text_and_clicks() {
    let (executor, injector) = recording_executor();
    let field = list(Rect::new(0, 0, 400, 100));

    assert!(executor.click(&field).await.unwrap());
    assert!(executor.double_click(&field).await.unwrap());
    assert!(executor.set_text(&field, "hello").await.unwrap());

    assert_eq!(injector.events().len(), 6);
    assert_eq!(injector.text(), vec!["hello".to_string()]);
}

#[tokio::test]
async fn test_subscribers_receive_records() {
    let (executor, _injector) = recording_executor();
    let mut rx = executor.subscribe();

    executor
        .perform(&list(screen()), SwipeAction::with_timeout(PhysicalDirection::Left, false, 0))
        .await
        .unwrap();
    let _ = executor.click(&detached()).await;

    let first = rx.recv().await.unwrap();
    assert_eq!(first.action, "SwipeAction{left}");
    assert_eq!(first.status, PerformStatus::Success);
    assert!(first.element.contains("android.widget.ListView"));

    let second = rx.recv().await.unwrap();
    assert_eq!(second.status, PerformStatus::NotVisible);
    assert_ne!(first.id, second.id);

    let json = serde_json::to_string(&second).unwrap();
    assert!(json.contains("not_visible"));
}

#[tokio::test]
async fn test_concurrent_performs_on_different_elements() {
    let (executor, injector) = recording_executor();
    let executor = Arc::new(executor);
    let a = list(Rect::new(0, 0, 500, 500));
    let b = list(Rect::new(500, 500, 1000, 1000));

    let (ra, rb) = tokio::join!(executor.click(&a), executor.click(&b));
    assert!(ra.unwrap());
    assert!(rb.unwrap());
    assert_eq!(injector.events().len(), 4);
}

#[tokio::test]
async fn test_executor_lends_its_injector() {
    let (executor, injector) = recording_executor();
    assert!(!executor.config().debug);
    assert!(!executor.config().abort_on_timeout);

    let down = executor.injector().touch_down(10, 20).await.unwrap();
    executor.injector().touch_up(down, 10, 20).await.unwrap();
    assert_eq!(injector.call_count(), 2);
}

// ---------------------------------------------------------------------------
// Call tracing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_debug_config_traces_invocations() {
    let logs = CapturedLogs::default();
    let _guard = capture_tracing(&logs);
    let injector = Arc::new(RecordingInjector::new());
    let executor =
        ActionExecutor::with_config(injector, ExecutorConfig::default().with_debug(true));

    executor
        .perform(&list(screen()), TextAction::with_timeout("traced", 0))
        .await
        .unwrap();

    let output = logs.contents();
    assert!(
        output.contains("Invoking UiElement.perform(TextAction{traced})"),
        "output: {}",
        output
    );
}

#[tokio::test]
async fn test_invocation_trace_is_off_by_default() {
    let logs = CapturedLogs::default();
    let _guard = capture_tracing(&logs);
    let executor = ActionExecutor::new(Arc::new(RecordingInjector::new()));

    executor
        .perform(&list(screen()), TextAction::with_timeout("quiet", 0))
        .await
        .unwrap();

    let output = logs.contents();
    assert!(output.contains("action complete"), "output: {}", output);
    assert!(!output.contains("Invoking UiElement.perform"), "output: {}", output);
}
