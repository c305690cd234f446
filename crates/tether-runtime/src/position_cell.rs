#![forbid(unsafe_code)]

//! Version-tracked publication of resolved positions.
//!
//! [`PositionCell`] holds the overlay's current [`ResolvedPosition`]
//! (`None` while closed) in shared single-threaded storage. When the value
//! changes (by `PartialEq`), live subscribers are notified in registration
//! order.
//!
//! # Invariants
//!
//! 1. `version` increments by exactly 1 on each value-changing mutation.
//! 2. Publishing an equal value is a no-op (no version bump, no
//!    notification) — scroll storms that settle on the same position do
//!    not fan out.
//! 3. Subscribers are notified in registration order.
//! 4. Dropping a [`PositionSubscription`] guard unsubscribes synchronously;
//!    dead entries are pruned lazily on the next notification.
//!
//! # Failure Modes
//!
//! Publishing from within a subscriber callback panics (`RefCell` borrow
//! rules). Re-entrant publication indicates a design bug in the host's
//! subscriber graph, not a recoverable condition.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tether_core::ResolvedPosition;

type PositionCallback = Rc<dyn Fn(Option<&ResolvedPosition>)>;
type PositionCallbackWeak = Weak<dyn Fn(Option<&ResolvedPosition>)>;

struct CellInner {
    value: Option<ResolvedPosition>,
    version: u64,
    /// Subscribers stored weakly; strong ownership lives in the guards.
    subscribers: Vec<PositionCallbackWeak>,
}

/// Shared holder for the current resolved position.
///
/// Cloning a `PositionCell` creates another handle to the **same** inner
/// state; both handles see the same value and share subscribers.
pub struct PositionCell {
    inner: Rc<RefCell<CellInner>>,
}

impl Clone for PositionCell {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl std::fmt::Debug for PositionCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("PositionCell")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl Default for PositionCell {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionCell {
    /// An empty cell (no position, version 0, no subscribers).
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(CellInner {
                value: None,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// The current position, if any.
    #[must_use]
    pub fn get(&self) -> Option<ResolvedPosition> {
        self.inner.borrow().value
    }

    /// Publish a new position (or `None` on close). No-op when equal to
    /// the current value.
    pub fn set(&self, value: Option<ResolvedPosition>) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return;
            }
            inner.value = value;
            inner.version += 1;
        }
        self.notify();
    }

    /// Subscribe to position changes. The callback receives the new value
    /// each time it changes, including the `None` published on close.
    ///
    /// Returns a guard; dropping it unsubscribes.
    pub fn subscribe(
        &self,
        callback: impl Fn(Option<&ResolvedPosition>) + 'static,
    ) -> PositionSubscription {
        let strong: PositionCallback = Rc::new(callback);
        let weak = Rc::downgrade(&strong);
        self.inner.borrow_mut().subscribers.push(weak);
        PositionSubscription { _guard: strong }
    }

    /// Current version. Increments once per value-changing publication;
    /// useful for dirty-checking in host render loops.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of registered subscribers, including dead entries not yet
    /// pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    fn notify(&self) {
        // Collect live callbacks first so no borrow is held during calls.
        let callbacks: Vec<PositionCallback> = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|w| w.strong_count() > 0);
            inner.subscribers.iter().filter_map(Weak::upgrade).collect()
        };
        let value = self.get();
        for cb in &callbacks {
            cb(value.as_ref());
        }
    }
}

/// RAII guard for a position subscriber.
pub struct PositionSubscription {
    _guard: PositionCallback,
}

impl std::fmt::Debug for PositionSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PositionSubscription").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tether_core::Placement;

    fn pos(top: f64, left: f64) -> ResolvedPosition {
        ResolvedPosition {
            top,
            left,
            placement: Placement::BottomStart,
        }
    }

    #[test]
    fn get_set_and_version() {
        let cell = PositionCell::new();
        assert_eq!(cell.get(), None);
        assert_eq!(cell.version(), 0);

        cell.set(Some(pos(44.0, 20.0)));
        assert_eq!(cell.get(), Some(pos(44.0, 20.0)));
        assert_eq!(cell.version(), 1);
    }

    #[test]
    fn equal_value_is_noop() {
        let cell = PositionCell::new();
        cell.set(Some(pos(1.0, 2.0)));
        cell.set(Some(pos(1.0, 2.0)));
        assert_eq!(cell.version(), 1);
    }

    #[test]
    fn subscribers_notified_on_change_and_clear() {
        let cell = PositionCell::new();
        let seen = Rc::new(Cell::new(0u32));
        let last_was_none = Rc::new(Cell::new(false));
        let seen_cb = Rc::clone(&seen);
        let none_cb = Rc::clone(&last_was_none);

        let _sub = cell.subscribe(move |value| {
            seen_cb.set(seen_cb.get() + 1);
            none_cb.set(value.is_none());
        });

        cell.set(Some(pos(1.0, 2.0)));
        assert_eq!(seen.get(), 1);
        assert!(!last_was_none.get());

        cell.set(None);
        assert_eq!(seen.get(), 2);
        assert!(last_was_none.get());
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let cell = PositionCell::new();
        let seen = Rc::new(Cell::new(0u32));
        let seen_cb = Rc::clone(&seen);
        let sub = cell.subscribe(move |_| seen_cb.set(seen_cb.get() + 1));

        cell.set(Some(pos(1.0, 2.0)));
        assert_eq!(seen.get(), 1);

        drop(sub);
        cell.set(Some(pos(3.0, 4.0)));
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn clone_shares_state() {
        let a = PositionCell::new();
        let b = a.clone();
        a.set(Some(pos(9.0, 9.0)));
        assert_eq!(b.get(), Some(pos(9.0, 9.0)));
        assert_eq!(b.version(), 1);
    }

    #[test]
    fn dead_subscribers_pruned_on_notify() {
        let cell = PositionCell::new();
        let sub = cell.subscribe(|_| {});
        assert_eq!(cell.subscriber_count(), 1);
        drop(sub);
        // Still listed until the next notification prunes it.
        assert_eq!(cell.subscriber_count(), 1);
        cell.set(Some(pos(1.0, 1.0)));
        assert_eq!(cell.subscriber_count(), 0);
    }
}
