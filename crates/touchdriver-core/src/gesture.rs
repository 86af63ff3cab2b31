//! Touch gesture synthesis.
//!
//! Turns logical swipe, drag and tap requests into timed `down`/`move`/`up`
//! event sequences submitted to an [`InputInjector`].
//!
//! A swipe is interpolated over [`SWIPE_STEPS`] steps inside the element's
//! visible bounds, keeping a 10% margin from the edges, with a short pause
//! between moves so the target sees a human-speed gesture rather than a
//! teleport. A drag additionally holds the initial touch for 1.5x the
//! long-press threshold and pauses before lifting, so the target recognizes
//! a long-press-then-drag instead of a fling.

use std::time::Duration;

use tokio::time::sleep;

use crate::action::ActionError;
use crate::direction::PhysicalDirection;
use crate::element::UiElement;
use crate::geometry::Rect;
use crate::injector::{DownTime, InputInjector};

/// Number of interpolation steps between the start and end of a swipe.
pub const SWIPE_STEPS: i32 = 50;

/// Pause between consecutive move events.
pub const MOVE_INTERVAL: Duration = Duration::from_millis(5);

/// Pause at the final position of a drag before lifting.
pub const DROP_HOLD: Duration = Duration::from_millis(100);

/// Multiplier applied to the long-press threshold for drag and long-press
/// holds.
pub const LONG_PRESS_FACTOR: f32 = 1.5;

const EDGE_MARGIN_RATIO: f64 = 0.1;

/// A point in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Start and end of a swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwipePath {
    pub start: Point,
    pub end: Point,
}

/// Computes the swipe path across `rect` for `direction`.
///
/// Vertical swipes run along the horizontal center, horizontal swipes along
/// the vertical center. Both ends are inset by 10% of the extent along the
/// swipe axis, truncated to whole pixels.
pub fn swipe_path(rect: &Rect, direction: PhysicalDirection) -> SwipePath {
    let margin_h = (rect.height() as f64 * EDGE_MARGIN_RATIO) as i32;
    let margin_w = (rect.width() as f64 * EDGE_MARGIN_RATIO) as i32;
    let (cx, cy) = (rect.center_x(), rect.center_y());

    let (start, end) = match direction {
        PhysicalDirection::Down => (
            Point::new(cx, rect.bottom - margin_h),
            Point::new(cx, rect.top + margin_h),
        ),
        PhysicalDirection::Up => (
            Point::new(cx, rect.top + margin_h),
            Point::new(cx, rect.bottom - margin_h),
        ),
        PhysicalDirection::Left => (
            Point::new(rect.left + margin_w, cy),
            Point::new(rect.right - margin_w, cy),
        ),
        // Mirror of Left: both ends inset by the width margin.
        PhysicalDirection::Right => (
            Point::new(rect.right - margin_w, cy),
            Point::new(rect.left + margin_w, cy),
        ),
    };
    SwipePath { start, end }
}

/// Intermediate move positions for `path`, excluding the exact start and end.
///
/// Returns `steps - 1` points. Offsets from the start are truncated toward
/// zero.
pub fn interpolate(path: &SwipePath, steps: i32) -> Vec<Point> {
    if steps <= 1 {
        return Vec::new();
    }
    let x_step = (path.end.x - path.start.x) as f64 / steps as f64;
    let y_step = (path.end.y - path.start.y) as f64 / steps as f64;
    (1..steps)
        .map(|i| {
            Point::new(
                path.start.x + (x_step * i as f64) as i32,
                path.start.y + (y_step * i as f64) as i32,
            )
        })
        .collect()
}

/// Swipes or drags across `element` in `direction`.
///
/// Always returns `Ok(true)` once the gesture has been injected; the effect on
/// the UI is not verified.
pub async fn synthesize(
    injector: &dyn InputInjector,
    element: &UiElement,
    direction: PhysicalDirection,
    drag: bool,
) -> Result<bool, ActionError> {
    let rect = element
        .visible_bounds()
        .ok_or_else(|| ActionError::ElementNotVisible {
            element: element.to_string(),
            action: format!("swipe {}", direction),
        })?;
    let path = swipe_path(&rect, direction);

    // First touch lands exactly on the requested start point.
    let down_time = injector.touch_down(path.start.x, path.start.y).await?;
    if drag {
        sleep(long_press_hold(injector)).await;
    }
    for point in interpolate(&path, SWIPE_STEPS) {
        injector.touch_move(down_time, point.x, point.y).await?;
        sleep(MOVE_INTERVAL).await;
    }
    if drag {
        sleep(DROP_HOLD).await;
    }
    injector.touch_up(down_time, path.end.x, path.end.y).await?;
    Ok(true)
}

/// Presses at `point` and releases after `hold` (immediately when zero).
pub async fn press(
    injector: &dyn InputInjector,
    point: Point,
    hold: Duration,
) -> Result<DownTime, ActionError> {
    let down_time = injector.touch_down(point.x, point.y).await?;
    if !hold.is_zero() {
        sleep(hold).await;
    }
    injector.touch_up(down_time, point.x, point.y).await?;
    Ok(down_time)
}

/// How long to hold a touch so it registers as a long press.
pub fn long_press_hold(injector: &dyn InputInjector) -> Duration {
    injector.long_press_timeout().mul_f32(LONG_PRESS_FACTOR)
}
