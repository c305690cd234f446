#![forbid(unsafe_code)]

//! Runtime: the environment seam, live tracking, and the overlay
//! controller.
//!
//! # Role in Tether
//! `tether-runtime` hosts everything stateful: it measures elements through
//! an [`Environment`], re-resolves on scroll/resize signals, decides
//! dismissal, and owns the open/close lifecycle. All of it is
//! single-threaded `Rc`/`RefCell` state driven synchronously by host
//! callbacks — there is no executor and no queue.
//!
//! # Primary responsibilities
//! - **Environment**: the [`Environment`] trait and the RAII
//!   [`ListenerGuard`] subscription contract.
//! - **Tracking**: [`PositionTracker`] re-runs the measure + resolve pass
//!   per signal and publishes through a [`PositionCell`].
//! - **Dismissal**: outside-press and Escape decisions.
//! - **Controller**: [`OverlayController`] ties the above to an open flag,
//!   owned or host-delegated.
//!
//! # Testing
//! The `mock` module (tests and the `test-helpers` feature) provides an
//! in-memory environment with listener instrumentation.

pub mod controller;
pub mod dismiss;
pub mod env;
pub mod open_state;
pub mod position_cell;
pub mod signal;
pub mod tracker;

#[cfg(any(test, feature = "test-helpers"))]
pub mod mock;

pub use controller::OverlayController;
pub use env::{ElementId, Environment, ListenerGuard, SignalCallback};
pub use open_state::{DelegatedOpenState, OpenState, OwnedOpenState};
pub use position_cell::{PositionCell, PositionSubscription};
pub use signal::{Signal, SignalKind};
pub use tracker::PositionTracker;

#[cfg(any(test, feature = "test-helpers"))]
pub use mock::MockEnv;
