//! Actions that can be performed on a UI element.
//!
//! An [`Action`] is a stateless, reusable description of an interaction plus
//! a timeout budget. Actions know how to drive an [`InputInjector`] against a
//! target [`UiElement`]; the bounded-wait protocol around them lives in
//! [`executor`](crate::executor).
//!
//! Canonical instances exist for the common cases and are identity-stable:
//!
//! ```
//! use touchdriver_core::action::SwipeAction;
//! use touchdriver_core::direction::PhysicalDirection;
//!
//! let a = SwipeAction::to_scroll(PhysicalDirection::Down);
//! let b = SwipeAction::to_scroll(PhysicalDirection::Down);
//! assert!(std::ptr::eq(a, b));
//! ```

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::direction::PhysicalDirection;
use crate::element::UiElement;
use crate::gesture::{self, Point};
use crate::injector::{InjectorError, InputInjector};

/// Errors raised while performing an action.
#[derive(Error, Debug)]
pub enum ActionError {
    /// The target element is not visible, so the action was never started.
    #[error("Element is not visible for {action}: {element}")]
    ElementNotVisible {
        /// Rendering of the element at the time of the check.
        element: String,
        /// Description of the rejected action.
        action: String,
    },

    /// A direction outside up/down/left/right was supplied.
    #[error("Unknown scroll direction: {0}")]
    UnknownDirection(String),

    /// The input transport failed.
    #[error("Injection failed: {0}")]
    Injection(#[from] InjectorError),

    /// The task running the action panicked or was aborted.
    #[error("Action task failed: {0}")]
    TaskFailed(String),
}

/// An interaction with a UI element.
#[async_trait]
pub trait Action: fmt::Display + Send + Sync {
    /// How long the caller waits for [`perform`](Action::perform), in
    /// milliseconds. `0` runs the action inline without waiting.
    fn timeout_ms(&self) -> u64;

    /// Short static name for span metadata.
    fn name(&self) -> &'static str;

    /// Drives `injector` against `element`. Returns whether the action
    /// considers itself successful.
    async fn perform(
        &self,
        injector: &dyn InputInjector,
        element: &UiElement,
    ) -> Result<bool, ActionError>;
}

#[async_trait]
impl<T: Action + ?Sized> Action for &'static T {
    fn timeout_ms(&self) -> u64 {
        (**self).timeout_ms()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn perform(
        &self,
        injector: &dyn InputInjector,
        element: &UiElement,
    ) -> Result<bool, ActionError> {
        (**self).perform(injector, element).await
    }
}

#[async_trait]
impl<T: Action + ?Sized> Action for Arc<T> {
    fn timeout_ms(&self) -> u64 {
        (**self).timeout_ms()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn perform(
        &self,
        injector: &dyn InputInjector,
        element: &UiElement,
    ) -> Result<bool, ActionError> {
        (**self).perform(injector, element).await
    }
}

fn target_point(element: &UiElement, action: &dyn Action) -> Result<Point, ActionError> {
    element
        .visible_bounds()
        .map(|r| Point::new(r.center_x(), r.center_y()))
        .ok_or_else(|| ActionError::ElementNotVisible {
            element: element.to_string(),
            action: action.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Clicks
// ---------------------------------------------------------------------------

/// Kind of tap performed by a [`ClickAction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClickKind {
    Single,
    Long,
    Double,
}

/// Taps the center of the element's visible bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickAction {
    kind: ClickKind,
    timeout_ms: u64,
}

/// Default wait budget for clicks and swipes.
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;

static CLICK: ClickAction = ClickAction::new(ClickKind::Single, DEFAULT_TIMEOUT_MS);
static LONG_CLICK: ClickAction = ClickAction::new(ClickKind::Long, DEFAULT_TIMEOUT_MS);
static DOUBLE_CLICK: ClickAction = ClickAction::new(ClickKind::Double, DEFAULT_TIMEOUT_MS);

impl ClickAction {
    pub const fn new(kind: ClickKind, timeout_ms: u64) -> Self {
        Self { kind, timeout_ms }
    }

    pub fn single() -> &'static ClickAction {
        &CLICK
    }

    pub fn long() -> &'static ClickAction {
        &LONG_CLICK
    }

    pub fn double() -> &'static ClickAction {
        &DOUBLE_CLICK
    }

    pub fn kind(&self) -> ClickKind {
        self.kind
    }
}

impl fmt::Display for ClickAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ClickKind::Single => "single",
            ClickKind::Long => "long",
            ClickKind::Double => "double",
        };
        write!(f, "ClickAction{{{}}}", kind)
    }
}

#[async_trait]
impl Action for ClickAction {
    fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    fn name(&self) -> &'static str {
        match self.kind {
            ClickKind::Single => "click",
            ClickKind::Long => "long_click",
            ClickKind::Double => "double_click",
        }
    }

    async fn perform(
        &self,
        injector: &dyn InputInjector,
        element: &UiElement,
    ) -> Result<bool, ActionError> {
        let point = target_point(element, self)?;
        match self.kind {
            ClickKind::Single => {
                gesture::press(injector, point, std::time::Duration::ZERO).await?;
            }
            ClickKind::Long => {
                gesture::press(injector, point, gesture::long_press_hold(injector)).await?;
            }
            ClickKind::Double => {
                gesture::press(injector, point, std::time::Duration::ZERO).await?;
                gesture::press(injector, point, std::time::Duration::ZERO).await?;
            }
        }
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Swipes
// ---------------------------------------------------------------------------

/// Swipes (or drags) across the element's visible bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwipeAction {
    direction: PhysicalDirection,
    drag: bool,
    timeout_ms: u64,
}

static SCROLL_UP: SwipeAction = SwipeAction::new(PhysicalDirection::Up, false);
static SCROLL_DOWN: SwipeAction = SwipeAction::new(PhysicalDirection::Down, false);
static SCROLL_LEFT: SwipeAction = SwipeAction::new(PhysicalDirection::Left, false);
static SCROLL_RIGHT: SwipeAction = SwipeAction::new(PhysicalDirection::Right, false);

impl SwipeAction {
    /// A swipe with the default 1000 ms budget.
    pub const fn new(direction: PhysicalDirection, drag: bool) -> Self {
        Self::with_timeout(direction, drag, DEFAULT_TIMEOUT_MS)
    }

    pub const fn with_timeout(direction: PhysicalDirection, drag: bool, timeout_ms: u64) -> Self {
        Self {
            direction,
            drag,
            timeout_ms,
        }
    }

    /// A long-press-then-drag gesture in `direction`.
    pub const fn drag(direction: PhysicalDirection) -> Self {
        Self::new(direction, true)
    }

    /// The canonical scroll instance for `direction`.
    pub fn to_scroll(direction: PhysicalDirection) -> &'static SwipeAction {
        match direction {
            PhysicalDirection::Up => &SCROLL_UP,
            PhysicalDirection::Down => &SCROLL_DOWN,
            PhysicalDirection::Left => &SCROLL_LEFT,
            PhysicalDirection::Right => &SCROLL_RIGHT,
        }
    }

    /// Like [`to_scroll`](Self::to_scroll) for a direction given by name.
    pub fn to_scroll_named(direction: &str) -> Result<&'static SwipeAction, ActionError> {
        Ok(Self::to_scroll(direction.parse()?))
    }

    pub fn direction(&self) -> PhysicalDirection {
        self.direction
    }

    pub fn is_drag(&self) -> bool {
        self.drag
    }
}

impl fmt::Display for SwipeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.drag {
            write!(f, "SwipeAction{{{}, drag}}", self.direction)
        } else {
            write!(f, "SwipeAction{{{}}}", self.direction)
        }
    }
}

#[async_trait]
impl Action for SwipeAction {
    fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    fn name(&self) -> &'static str {
        if self.drag {
            "drag"
        } else {
            "swipe"
        }
    }

    async fn perform(
        &self,
        injector: &dyn InputInjector,
        element: &UiElement,
    ) -> Result<bool, ActionError> {
        gesture::synthesize(injector, element, self.direction, self.drag).await
    }
}

// ---------------------------------------------------------------------------
// Text entry
// ---------------------------------------------------------------------------

/// Types text into the focused input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextAction {
    text: String,
    timeout_ms: u64,
}

impl TextAction {
    /// Default wait budget for text entry.
    pub const DEFAULT_TIMEOUT_MS: u64 = 100;

    pub fn new(text: impl Into<String>) -> Self {
        Self::with_timeout(text, Self::DEFAULT_TIMEOUT_MS)
    }

    pub fn with_timeout(text: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            text: text.into(),
            timeout_ms,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for TextAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TextAction{{{}}}", self.text)
    }
}

#[async_trait]
impl Action for TextAction {
    fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    fn name(&self) -> &'static str {
        "set_text"
    }

    async fn perform(
        &self,
        injector: &dyn InputInjector,
        _element: &UiElement,
    ) -> Result<bool, ActionError> {
        injector.inject_text(&self.text).await?;
        Ok(true)
    }
}
