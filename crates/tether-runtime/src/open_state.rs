#![forbid(unsafe_code)]

//! Ownership strategies for the open/close boolean.
//!
//! The controller never branches on "controlled vs. uncontrolled" in its
//! transition logic; it routes every change through an injected
//! [`OpenState`] strategy. Only the source of truth differs:
//!
//! - [`OwnedOpenState`] — the controller's private boolean; a change
//!   request is applied directly.
//! - [`DelegatedOpenState`] — the host owns the boolean and receives
//!   change requests through a callback; the accepted value flows back via
//!   [`OpenState::record`].

use std::cell::Cell;
use std::rc::Rc;

/// Source of truth for the open/close boolean.
pub trait OpenState {
    /// The current value.
    fn get(&self) -> bool;

    /// Ask for a change. An owned state applies it; a delegated state
    /// forwards the request to its owner without mutating anything.
    fn request(&self, open: bool);

    /// Record an accepted value (the owner's prop flowing back).
    fn record(&self, open: bool);

    /// True if a `request` takes effect immediately.
    fn owned(&self) -> bool;
}

/// Controller-owned boolean (uncontrolled mode).
#[derive(Debug, Default)]
pub struct OwnedOpenState {
    open: Cell<bool>,
}

impl OpenState for OwnedOpenState {
    fn get(&self) -> bool {
        self.open.get()
    }

    fn request(&self, open: bool) {
        self.open.set(open);
    }

    fn record(&self, open: bool) {
        self.open.set(open);
    }

    fn owned(&self) -> bool {
        true
    }
}

/// Host-owned boolean (controlled mode). Shares the flag cell with the
/// host and emits change requests through `on_change`.
pub struct DelegatedOpenState {
    open: Rc<Cell<bool>>,
    on_change: Box<dyn Fn(bool)>,
}

impl DelegatedOpenState {
    /// Wrap a host-owned flag and its change-request callback.
    #[must_use]
    pub fn new(open: Rc<Cell<bool>>, on_change: impl Fn(bool) + 'static) -> Self {
        Self {
            open,
            on_change: Box::new(on_change),
        }
    }
}

impl OpenState for DelegatedOpenState {
    fn get(&self) -> bool {
        self.open.get()
    }

    fn request(&self, open: bool) {
        if open != self.open.get() {
            (self.on_change)(open);
        }
    }

    fn record(&self, open: bool) {
        self.open.set(open);
    }

    fn owned(&self) -> bool {
        false
    }
}

impl std::fmt::Debug for DelegatedOpenState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelegatedOpenState")
            .field("open", &self.open.get())
            .finish_non_exhaustive()
    }
}
