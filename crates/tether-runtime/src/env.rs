#![forbid(unsafe_code)]

//! The environment seam: measurement and ambient signal subscription.
//!
//! [`Environment`] is the engine's only view of the host surface (a DOM,
//! a terminal cell grid, a scene graph). It provides synchronous geometry
//! queries and signal subscriptions; nothing here is async.
//!
//! # Listener lifetime
//!
//! `subscribe` hands back a [`ListenerGuard`] holding the only strong
//! reference to the callback; the environment keeps a weak one. Dropping
//! the guard therefore unsubscribes synchronously — the callback can never
//! fire again, even if the environment has not pruned its registry yet.
//! This is the same guard discipline the engine's position cell uses, and
//! it is what makes "zero residual listeners after close" testable.

use crate::signal::{Signal, SignalKind};
use std::rc::Rc;
use tether_core::{MeasureError, Rect, Size};

/// Opaque handle to a host element (trigger or overlay panel).
///
/// The engine never inspects the element; it only asks the environment to
/// measure it and to compare event coordinates against the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(u64);

impl ElementId {
    /// Wrap a raw host identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw host identifier.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// A signal listener callback. Stored weakly by environments; the strong
/// reference lives in the [`ListenerGuard`].
pub type SignalCallback = Rc<dyn Fn(&Signal)>;

/// A DOM-like host surface.
///
/// All methods are synchronous queries or synchronous registry updates.
/// Implementations are single-threaded; the engine shares them via `Rc`.
pub trait Environment {
    /// Measure an element's current viewport-relative rectangle. Pure
    /// query, no caching — callers re-invoke whenever geometry might have
    /// changed (open, scroll, resize).
    fn measure(&self, element: ElementId) -> Result<Rect, MeasureError>;

    /// The current visible viewport bounds. Re-read on every pass.
    fn viewport(&self) -> Size;

    /// Register a listener for one signal kind. The returned guard is the
    /// callback's owner; see the module docs for the lifetime contract.
    fn subscribe(&self, kind: SignalKind, callback: SignalCallback) -> ListenerGuard;
}

/// RAII ownership of a subscribed listener callback.
///
/// Dropping the guard drops the only strong reference to the callback,
/// which unsubscribes it synchronously.
pub struct ListenerGuard {
    _callback: Option<SignalCallback>,
}

impl ListenerGuard {
    /// Guard retaining the given callback.
    #[must_use]
    pub fn retaining(callback: SignalCallback) -> Self {
        Self {
            _callback: Some(callback),
        }
    }

    /// A guard owning nothing. Useful for environments without a signal
    /// source for some kind.
    #[must_use]
    pub fn noop() -> Self {
        Self { _callback: None }
    }
}

impl std::fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("active", &self._callback.is_some())
            .finish()
    }
}
