//! # touchdriver-core
//!
//! Element model, bounded-wait action execution and touch gesture synthesis
//! for device UI automation.
//!
//! The crate sits between an element-tree provider (which captures
//! [`UiElement`](element::UiElement) snapshots) and an input transport
//! (an [`InputInjector`](injector::InputInjector)). It decides *what* to
//! inject for a tap, long press, swipe, drag or text entry, and wraps every
//! interaction in a visibility check and a bounded wait.
//!
//! ## Modules
//!
//! - [`geometry`] - Screen rectangles
//! - [`attribute`] - Attribute keys and typed values
//! - [`element`] - Immutable element snapshots and child predicates
//! - [`direction`] - Physical/logical directions, axes and converters
//! - [`injector`] - Input transport trait and an in-memory recording sink
//! - [`gesture`] - Swipe/drag path computation and event synthesis
//! - [`action`] - Click, swipe and text actions
//! - [`executor`] - Bounded-wait execution engine and perform log
//! - [`config`] - Engine configuration
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use touchdriver_core::element::UiElement;
//! use touchdriver_core::executor::ActionExecutor;
//! use touchdriver_core::geometry::Rect;
//! use touchdriver_core::injector::RecordingInjector;
//!
//! #[tokio::main]
//! async fn main() {
//!     let injector = Arc::new(RecordingInjector::new());
//!     let executor = ActionExecutor::new(injector.clone());
//!
//!     let button = UiElement::builder()
//!         .text("Sign in")
//!         .bounds(Rect::new(40, 900, 1040, 1020))
//!         .build();
//!
//!     executor.click(&button).await.expect("button not visible");
//!     println!("{} events injected", injector.events().len());
//! }
//! ```

pub mod action;
pub mod attribute;
pub mod config;
pub mod direction;
pub mod element;
pub mod executor;
pub mod geometry;
pub mod gesture;
pub mod injector;
