//! Shared test helpers for touchdriver-core integration tests.
//!
//! Provides element fixtures, a scriptable [`ProbeAction`] whose body can be
//! slowed down, made to fail or panic, and an injector that always fails.

#![allow(dead_code)]

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, Once};
use std::sync::Arc;
use std::thread::ThreadId;
use std::time::Duration;

use async_trait::async_trait;

use touchdriver_core::action::{Action, ActionError};
use touchdriver_core::element::UiElement;
use touchdriver_core::geometry::Rect;
use touchdriver_core::injector::{DownTime, InjectorError, InputInjector};

static TRACING: Once = Once::new();

/// Installs a test-writer subscriber once per test binary.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Collects formatted tracing output in memory.
#[derive(Debug, Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Installs a debug-level subscriber writing to `logs` for the current
/// thread until the guard is dropped.
pub fn capture_tracing(logs: &CapturedLogs) -> tracing::subscriber::DefaultGuard {
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::set_default(subscriber)
}

// ---------------------------------------------------------------------------
// Element fixtures
// ---------------------------------------------------------------------------

/// A visible, scrollable list covering `bounds`.
pub fn list(bounds: Rect) -> UiElement {
    UiElement::builder()
        .class_name("android.widget.ListView")
        .attribute(touchdriver_core::attribute::Attribute::Scrollable, true)
        .bounds(bounds)
        .build()
}

/// An element whose visible bounds have zero area.
pub fn zero_area() -> UiElement {
    UiElement::builder()
        .text("collapsed")
        .bounds(Rect::new(100, 100, 100, 300))
        .build()
}

/// An element explicitly marked as not in the live tree.
pub fn detached() -> UiElement {
    UiElement::builder()
        .text("detached")
        .bounds(Rect::new(0, 0, 500, 500))
        .not_visible()
        .build()
}

// ---------------------------------------------------------------------------
// Scriptable action
// ---------------------------------------------------------------------------

/// What a [`ProbeAction`] body does after its delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeResult {
    Succeed,
    ReturnFalse,
    Fail,
    Panic,
}

/// Observations shared between a [`ProbeAction`] and the test.
#[derive(Debug, Default)]
pub struct ProbeState {
    pub calls: AtomicUsize,
    pub completed: AtomicBool,
    pub thread: Mutex<Option<ThreadId>>,
    pub trace: Mutex<Vec<String>>,
}

impl ProbeState {
    pub fn push(&self, entry: &str) {
        self.trace.lock().unwrap().push(entry.to_string());
    }

    pub fn trace(&self) -> Vec<String> {
        self.trace.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> bool {
        self.completed.load(Ordering::SeqCst)
    }
}

/// An action that taps the element center after an optional delay and then
/// ends as scripted.
pub struct ProbeAction {
    pub timeout_ms: u64,
    pub delay: Duration,
    pub result: ProbeResult,
    pub state: Arc<ProbeState>,
}

impl ProbeAction {
    pub fn new(timeout_ms: u64, delay: Duration, result: ProbeResult) -> (Self, Arc<ProbeState>) {
        let state = Arc::new(ProbeState::default());
        (
            Self {
                timeout_ms,
                delay,
                result,
                state: state.clone(),
            },
            state,
        )
    }
}

impl fmt::Display for ProbeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProbeAction{{{:?}}}", self.result)
    }
}

#[async_trait]
impl Action for ProbeAction {
    fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    fn name(&self) -> &'static str {
        "probe"
    }

    async fn perform(
        &self,
        injector: &dyn InputInjector,
        element: &UiElement,
    ) -> Result<bool, ActionError> {
        self.state.calls.fetch_add(1, Ordering::SeqCst);
        *self.state.thread.lock().unwrap() = Some(std::thread::current().id());
        self.state.push("body");

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let rect = element.visible_bounds().unwrap_or_default();
        let down = injector.touch_down(rect.center_x(), rect.center_y()).await?;
        injector.touch_up(down, rect.center_x(), rect.center_y()).await?;
        self.state.completed.store(true, Ordering::SeqCst);

        match self.result {
            ProbeResult::Succeed => Ok(true),
            ProbeResult::ReturnFalse => Ok(false),
            ProbeResult::Fail => Err(ActionError::Injection(InjectorError::EventRejected(
                "probe failure".to_string(),
            ))),
            ProbeResult::Panic => panic!("probe panicked"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failing transport
// ---------------------------------------------------------------------------

/// An injector whose device is gone.
#[derive(Debug, Default)]
pub struct DisconnectedInjector {
    pub attempts: AtomicUsize,
}

#[async_trait]
impl InputInjector for DisconnectedInjector {
    async fn touch_down(&self, _x: i32, _y: i32) -> Result<DownTime, InjectorError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(InjectorError::Disconnected)
    }

    async fn touch_move(&self, _down: DownTime, _x: i32, _y: i32) -> Result<(), InjectorError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(InjectorError::Disconnected)
    }

    async fn touch_up(&self, _down: DownTime, _x: i32, _y: i32) -> Result<(), InjectorError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(InjectorError::Disconnected)
    }

    async fn inject_text(&self, _text: &str) -> Result<(), InjectorError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(InjectorError::Disconnected)
    }
}
