#![forbid(unsafe_code)]

//! Dismissal decisions: which input signals request a close.
//!
//! Two triggers, both active only while the overlay is open:
//!
//! - **Outside pointer press** — a pointer-down whose point lies inside
//!   neither the trigger rect nor the overlay rect.
//! - **Escape key** — a key-down for Escape, regardless of focus location
//!   or modifier state.
//!
//! The host environment has no DOM event targets, so "inside" is a
//! geometric point-in-rect test against rects measured at event time. An
//! element that cannot be measured (detached, unsized) cannot contain the
//! press and does not veto dismissal.
//!
//! The functions here are pure; the controller owns the subscription
//! wiring and the per-instance state, so one overlay's dismissal never
//! closes another instance.

use crate::signal::Signal;
use tether_core::{PointerEvent, Rect};

/// True if the press landed inside neither of the given rects.
#[must_use]
pub fn is_outside_press(
    event: &PointerEvent,
    trigger: Option<Rect>,
    overlay: Option<Rect>,
) -> bool {
    let inside = |rect: Option<Rect>| rect.is_some_and(|r| r.contains(event.position));
    !inside(trigger) && !inside(overlay)
}

/// Decide whether a signal requests dismissal, given the freshly measured
/// trigger and overlay rects.
#[must_use]
pub fn should_dismiss(signal: &Signal, trigger: Option<Rect>, overlay: Option<Rect>) -> bool {
    match signal {
        Signal::PointerDown(event) => is_outside_press(event, trigger, overlay),
        Signal::KeyDown(key) => key.is_escape(),
        Signal::Scroll | Signal::Resize => false,
    }
}
