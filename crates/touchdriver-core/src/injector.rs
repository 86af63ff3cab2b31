//! Input injection capability.
//!
//! The [`InputInjector`] trait is the seam between the gesture logic in this
//! crate and whatever transport actually delivers input to a device or
//! emulator. A gesture is a `down`, any number of `move`s, and an `up`; every
//! event after the `down` carries the [`DownTime`] anchor returned by
//! [`InputInjector::touch_down`] so the transport can correlate them.
//!
//! [`RecordingInjector`] is an in-memory sink that records every event in
//! submission order. It is useful for dry runs and as a test double.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::Instant;

/// Platform default long-press recognition threshold.
pub const DEFAULT_LONG_PRESS_TIMEOUT: Duration = Duration::from_millis(500);

/// Errors reported by an input transport.
#[derive(Error, Debug)]
pub enum InjectorError {
    /// The transport is not connected to a device.
    #[error("Injector is not connected")]
    Disconnected,

    /// The device refused the event.
    #[error("Event rejected: {0}")]
    EventRejected(String),

    /// An I/O error occurred while talking to the device.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Timestamp of the `down` event that started a gesture, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DownTime(pub u64);

/// Low-level input transport.
///
/// Implementations must deliver events in the order they are submitted.
#[async_trait]
pub trait InputInjector: Send + Sync {
    /// Starts a touch at `(x, y)` and returns the gesture's down-time anchor.
    async fn touch_down(&self, x: i32, y: i32) -> Result<DownTime, InjectorError>;

    /// Moves the touch started at `down_time` to `(x, y)`.
    async fn touch_move(&self, down_time: DownTime, x: i32, y: i32) -> Result<(), InjectorError>;

    /// Lifts the touch started at `down_time` at `(x, y)`.
    async fn touch_up(&self, down_time: DownTime, x: i32, y: i32) -> Result<(), InjectorError>;

    /// Types `text` into the focused input.
    async fn inject_text(&self, text: &str) -> Result<(), InjectorError>;

    /// How long a touch must be held to register as a long press.
    fn long_press_timeout(&self) -> Duration {
        DEFAULT_LONG_PRESS_TIMEOUT
    }
}

/// Phase of a recorded touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    Down,
    Move,
    Up,
}

/// A touch event as received by a [`RecordingInjector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TouchEvent {
    /// Position in the injector's event stream, starting at 0.
    pub index: u64,
    pub phase: TouchPhase,
    pub x: i32,
    pub y: i32,
    pub down_time: DownTime,
}

#[derive(Debug, Default)]
struct Recorded {
    events: Vec<TouchEvent>,
    text: Vec<String>,
}

/// Append-only in-memory event sink.
#[derive(Debug)]
pub struct RecordingInjector {
    epoch: Instant,
    long_press_timeout: Duration,
    recorded: Mutex<Recorded>,
}

impl Default for RecordingInjector {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingInjector {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
            long_press_timeout: DEFAULT_LONG_PRESS_TIMEOUT,
            recorded: Mutex::new(Recorded::default()),
        }
    }

    /// Overrides the long-press threshold this injector reports.
    pub fn with_long_press_timeout(mut self, timeout: Duration) -> Self {
        self.long_press_timeout = timeout;
        self
    }

    /// A copy of every touch event recorded so far.
    pub fn events(&self) -> Vec<TouchEvent> {
        self.lock().events.clone()
    }

    /// Text injected so far, one entry per call.
    pub fn text(&self) -> Vec<String> {
        self.lock().text.clone()
    }

    /// Total number of injection calls (touch and text).
    pub fn call_count(&self) -> usize {
        let recorded = self.lock();
        recorded.events.len() + recorded.text.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, phase: TouchPhase, down_time: DownTime, x: i32, y: i32) {
        let mut recorded = self.lock();
        let index = recorded.events.len() as u64;
        recorded.events.push(TouchEvent {
            index,
            phase,
            x,
            y,
            down_time,
        });
    }
}

#[async_trait]
impl InputInjector for RecordingInjector {
    async fn touch_down(&self, x: i32, y: i32) -> Result<DownTime, InjectorError> {
        let down_time = DownTime(self.epoch.elapsed().as_millis() as u64);
        self.push(TouchPhase::Down, down_time, x, y);
        Ok(down_time)
    }

    async fn touch_move(&self, down_time: DownTime, x: i32, y: i32) -> Result<(), InjectorError> {
        self.push(TouchPhase::Move, down_time, x, y);
        Ok(())
    }

    async fn touch_up(&self, down_time: DownTime, x: i32, y: i32) -> Result<(), InjectorError> {
        self.push(TouchPhase::Up, down_time, x, y);
        Ok(())
    }

    async fn inject_text(&self, text: &str) -> Result<(), InjectorError> {
        self.lock().text.push(text.to_string());
        Ok(())
    }

    fn long_press_timeout(&self) -> Duration {
        self.long_press_timeout
    }
}
