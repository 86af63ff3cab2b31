//! Bounded-wait action execution.
//!
//! [`ActionExecutor`] runs an [`Action`] against a [`UiElement`] in two
//! explicit steps:
//!
//! 1. **Visibility check.** A hidden or zero-area element fails fast with
//!    [`ActionError::ElementNotVisible`]; the action body never runs.
//! 2. **Dispatch.** An action with a zero timeout runs inline on the calling
//!    task and its result (or error) is returned directly. Otherwise the body
//!    is spawned and the caller waits for whichever comes first: the body
//!    finishing or the deadline passing.
//!
//! The three outcomes of a waited dispatch are modeled by [`PerformOutcome`].
//! [`ActionExecutor::perform`] collapses them to a `bool`: a body that errors
//! or overruns its deadline reads as `false`, never as an `Err`.
//!
//! A body that overruns is not interrupted by default. The gesture keeps
//! injecting in the background after the caller has been told it failed; set
//! [`ExecutorConfig::abort_on_timeout`] to abort it instead.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use touchdriver_core::direction::PhysicalDirection;
//! use touchdriver_core::element::UiElement;
//! use touchdriver_core::executor::ActionExecutor;
//! use touchdriver_core::geometry::Rect;
//! use touchdriver_core::injector::RecordingInjector;
//!
//! #[tokio::main]
//! async fn main() {
//!     let executor = ActionExecutor::new(Arc::new(RecordingInjector::new()));
//!     let list = UiElement::builder()
//!         .bounds(Rect::new(0, 0, 1080, 1920))
//!         .build();
//!
//!     match executor.scroll(&list, PhysicalDirection::Down).await {
//!         Ok(true) => println!("scrolled"),
//!         Ok(false) => println!("scroll timed out"),
//!         Err(e) => eprintln!("{}", e),
//!     }
//! }
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info_span, warn, Instrument};
use uuid::Uuid;

use crate::action::{Action, ActionError, ClickAction, SwipeAction, TextAction};
use crate::config::ExecutorConfig;
use crate::direction::PhysicalDirection;
use crate::element::UiElement;
use crate::injector::InputInjector;

/// How a dispatched action ended.
#[derive(Debug)]
pub enum PerformOutcome {
    /// The body ran to completion and returned this result.
    Completed(bool),
    /// The body failed while running on its own task.
    Faulted(ActionError),
    /// The deadline passed before the body finished.
    DeadlineExceeded,
}

impl PerformOutcome {
    /// True only for `Completed(true)`.
    pub fn is_success(&self) -> bool {
        matches!(self, PerformOutcome::Completed(true))
    }
}

/// Final status of a perform call, as recorded in the perform log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum PerformStatus {
    Success,
    Failure,
    TimedOut,
    Faulted(String),
    NotVisible,
}

/// A logged perform call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// Description of the action.
    pub action: String,
    /// Rendering of the target element.
    pub element: String,
    pub status: PerformStatus,
    pub duration_ms: u64,
}

/// Runs actions against elements with bounded waits.
///
/// The executor owns a handle to the input transport and lends it to each
/// action. It holds no per-element state: concurrent calls on different
/// elements are independent, and calls on the same element are not
/// serialized.
pub struct ActionExecutor {
    injector: Arc<dyn InputInjector>,
    config: ExecutorConfig,
    history: Mutex<VecDeque<PerformRecord>>,
    record_tx: broadcast::Sender<PerformRecord>,
}

impl ActionExecutor {
    /// Creates an executor with the default configuration.
    pub fn new(injector: Arc<dyn InputInjector>) -> Self {
        Self::with_config(injector, ExecutorConfig::default())
    }

    pub fn with_config(injector: Arc<dyn InputInjector>, config: ExecutorConfig) -> Self {
        let capacity = config.log_capacity.max(1);
        let (record_tx, _) = broadcast::channel(capacity);
        Self {
            injector,
            config,
            history: Mutex::new(VecDeque::with_capacity(capacity)),
            record_tx,
        }
    }

    pub fn injector(&self) -> &Arc<dyn InputInjector> {
        &self.injector
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Subscribes to perform records as they are produced.
    pub fn subscribe(&self) -> broadcast::Receiver<PerformRecord> {
        self.record_tx.subscribe()
    }

    /// The most recent perform records, oldest first.
    pub fn history(&self) -> Vec<PerformRecord> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// Fails with [`ActionError::ElementNotVisible`] unless `element` is
    /// visible.
    pub fn check_visible(&self, element: &UiElement, action: &dyn Action) -> Result<(), ActionError> {
        if element.is_visible() {
            Ok(())
        } else {
            Err(ActionError::ElementNotVisible {
                element: element.to_string(),
                action: action.to_string(),
            })
        }
    }

    /// Performs `action` on `element`.
    ///
    /// Returns `Err` for a hidden element, or when an inline (zero-timeout)
    /// body fails. A waited body that fails or overruns yields `Ok(false)`.
    pub async fn perform<A>(&self, element: &UiElement, action: A) -> Result<bool, ActionError>
    where
        A: Action + 'static,
    {
        match self.try_perform(element, action).await? {
            PerformOutcome::Completed(success) => Ok(success),
            PerformOutcome::Faulted(_) | PerformOutcome::DeadlineExceeded => Ok(false),
        }
    }

    /// Like [`perform`](Self::perform) but keeps the full outcome.
    pub async fn try_perform<A>(
        &self,
        element: &UiElement,
        action: A,
    ) -> Result<PerformOutcome, ActionError>
    where
        A: Action + 'static,
    {
        let span = info_span!("perform", action = action.name());
        async {
            if self.config.debug {
                debug!("Invoking UiElement.perform({})", action);
            }
            let start = Instant::now();
            let description = action.to_string();

            if let Err(e) = self.check_visible(element, &action) {
                self.record(&description, element, PerformStatus::NotVisible, start);
                return Err(e);
            }

            let result = self.perform_and_wait(element, action).await;
            let status = match &result {
                Ok(PerformOutcome::Completed(true)) => PerformStatus::Success,
                Ok(PerformOutcome::Completed(false)) => PerformStatus::Failure,
                Ok(PerformOutcome::DeadlineExceeded) => PerformStatus::TimedOut,
                Ok(PerformOutcome::Faulted(e)) | Err(e) => PerformStatus::Faulted(e.to_string()),
            };
            let success = status == PerformStatus::Success;
            debug!(elapsed_ms = start.elapsed().as_millis() as u64, success, "action complete");
            self.record(&description, element, status, start);
            result
        }
        .instrument(span)
        .await
    }

    async fn perform_and_wait<A>(
        &self,
        element: &UiElement,
        action: A,
    ) -> Result<PerformOutcome, ActionError>
    where
        A: Action + 'static,
    {
        let timeout_ms = action.timeout_ms();
        if timeout_ms == 0 {
            return action
                .perform(self.injector.as_ref(), element)
                .await
                .map(PerformOutcome::Completed);
        }

        let injector = Arc::clone(&self.injector);
        let target = element.clone();
        let mut task =
            tokio::spawn(async move { action.perform(injector.as_ref(), &target).await });

        let outcome = tokio::select! {
            joined = &mut task => match joined {
                Ok(Ok(success)) => PerformOutcome::Completed(success),
                Ok(Err(e)) => {
                    warn!(error = %e, "action failed");
                    PerformOutcome::Faulted(e)
                }
                Err(e) => {
                    warn!(error = %e, "action task failed");
                    PerformOutcome::Faulted(ActionError::TaskFailed(e.to_string()))
                }
            },
            _ = tokio::time::sleep(Duration::from_millis(timeout_ms)) => {
                warn!(timeout_ms, "action deadline exceeded");
                if self.config.abort_on_timeout {
                    task.abort();
                }
                PerformOutcome::DeadlineExceeded
            }
        };
        Ok(outcome)
    }

    fn record(&self, action: &str, element: &UiElement, status: PerformStatus, start: Instant) {
        let record = PerformRecord {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            action: action.to_string(),
            element: element.to_string(),
            status,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        {
            let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
            if history.len() >= self.config.log_capacity.max(1) {
                history.pop_front();
            }
            history.push_back(record.clone());
        }
        // No subscribers is fine.
        let _ = self.record_tx.send(record);
    }

    pub async fn click(&self, element: &UiElement) -> Result<bool, ActionError> {
        self.perform(element, ClickAction::single()).await
    }

    pub async fn long_click(&self, element: &UiElement) -> Result<bool, ActionError> {
        self.perform(element, ClickAction::long()).await
    }

    pub async fn double_click(&self, element: &UiElement) -> Result<bool, ActionError> {
        self.perform(element, ClickAction::double()).await
    }

    /// Swipes across `element` using the canonical scroll action.
    pub async fn scroll(
        &self,
        element: &UiElement,
        direction: PhysicalDirection,
    ) -> Result<bool, ActionError> {
        self.perform(element, SwipeAction::to_scroll(direction)).await
    }

    /// Long-presses `element` and drags across it.
    pub async fn drag(
        &self,
        element: &UiElement,
        direction: PhysicalDirection,
    ) -> Result<bool, ActionError> {
        self.perform(element, SwipeAction::drag(direction)).await
    }

    pub async fn set_text(&self, element: &UiElement, text: &str) -> Result<bool, ActionError> {
        self.perform(element, TextAction::new(text)).await
    }
}
