#![forbid(unsafe_code)]

//! The overlay controller: open/close lifecycle, dismissal wiring, and
//! position publication.
//!
//! # State machine
//!
//! Two states, `Closed` and `Open`. On `Closed -> Open` the controller
//! runs one synchronous measure + resolve pass (so the first paint already
//! has a position), starts the live tracker, and attaches the dismissal
//! listeners — in that order, after the activating event has already been
//! dispatched, so the click that opened the overlay can never immediately
//! close it. On `Open -> Closed` the tracker and dismissal guards are
//! dropped synchronously, the published position is cleared to `None`, and
//! the instance generation is bumped to fence any still-in-flight signal.
//!
//! # Ownership modes
//!
//! The open boolean lives behind an injected [`OpenState`] strategy
//! ([`OwnedOpenState`] or [`DelegatedOpenState`]); the transition logic is
//! identical in both modes. In controlled mode `open()`/`close()` and the
//! dismissal listeners only *emit* change requests; the host applies the
//! accepted value through [`OverlayController::set_open`].
//!
//! # Invariants
//!
//! 1. `resolved_position()` is `Some` only while the overlay is mounted;
//!    geometry is re-measured on every `Closed -> Open` transition.
//! 2. Closing removes every listener registration synchronously — a
//!    controller that went through open/close leaves zero residual
//!    listeners (asserted against `MockEnv::listener_count`).
//! 3. Each controller instance owns its own listener closures; dismissing
//!    one overlay never closes another.
//! 4. Measurement failures are recovered locally and silently; nothing in
//!    the controller panics in non-test code.

use crate::dismiss;
use crate::env::{ElementId, Environment, ListenerGuard, SignalCallback};
use crate::open_state::{DelegatedOpenState, OpenState, OwnedOpenState};
use crate::position_cell::{PositionCell, PositionSubscription};
use crate::signal::SignalKind;
use crate::tracker::PositionTracker;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, trace};

use tether_core::{OverlayConfig, ResolvedPosition};

#[derive(Debug, Clone, Copy, Default)]
struct Elements {
    trigger: Option<ElementId>,
    overlay: Option<ElementId>,
}

struct ControllerInner<E: Environment + 'static> {
    env: Rc<E>,
    tracker: PositionTracker<E>,
    open_state: Box<dyn OpenState>,
    elements: RefCell<Elements>,
    dismiss_guards: RefCell<Vec<ListenerGuard>>,
    /// Bumped on every mount/unmount; in-flight dismissal callbacks from a
    /// previous session compare against it and drop themselves.
    generation: Cell<u64>,
    /// Whether the overlay is currently mounted (tracking + dismissal
    /// live). In controlled mode this can lag the host's flag by one
    /// `set_open` call.
    mounted: Cell<bool>,
    disposed: Cell<bool>,
}

/// Controller for one anchored overlay instance.
///
/// Dropping the controller disposes it (all listeners removed).
pub struct OverlayController<E: Environment + 'static> {
    inner: Rc<ControllerInner<E>>,
}

impl<E: Environment + 'static> OverlayController<E> {
    /// Uncontrolled controller: it owns the open boolean itself.
    #[must_use]
    pub fn new(env: Rc<E>, config: OverlayConfig) -> Self {
        Self::with_open_state(env, config, Box::new(OwnedOpenState::default()))
    }

    /// Controlled controller: the host owns the open flag and receives
    /// change requests through `on_open_change`; it applies the accepted
    /// value via [`set_open`]. The controller never mounts at
    /// construction — a host whose flag starts `true` reconciles with one
    /// `set_open(true)` call after attaching elements.
    ///
    /// [`set_open`]: OverlayController::set_open
    #[must_use]
    pub fn controlled(
        env: Rc<E>,
        config: OverlayConfig,
        open: Rc<Cell<bool>>,
        on_open_change: impl Fn(bool) + 'static,
    ) -> Self {
        Self::with_open_state(
            env,
            config,
            Box::new(DelegatedOpenState::new(open, on_open_change)),
        )
    }

    fn with_open_state(env: Rc<E>, config: OverlayConfig, open_state: Box<dyn OpenState>) -> Self {
        let tracker = PositionTracker::new(Rc::clone(&env), config);
        Self {
            inner: Rc::new(ControllerInner {
                env,
                tracker,
                open_state,
                elements: RefCell::new(Elements::default()),
                dismiss_guards: RefCell::new(Vec::new()),
                generation: Cell::new(0),
                mounted: Cell::new(false),
                disposed: Cell::new(false),
            }),
        }
    }

    /// Attach (or re-attach) the trigger element. While open, the position
    /// refreshes immediately against the new element.
    pub fn attach_trigger(&self, id: ElementId) {
        self.inner.elements.borrow_mut().trigger = Some(id);
        self.sync_tracker_elements();
    }

    /// Attach (or re-attach) the overlay panel element.
    pub fn attach_overlay(&self, id: ElementId) {
        self.inner.elements.borrow_mut().overlay = Some(id);
        self.sync_tracker_elements();
    }

    fn sync_tracker_elements(&self) {
        let elements = *self.inner.elements.borrow();
        self.inner
            .tracker
            .set_elements(elements.trigger, elements.overlay);
        if self.inner.mounted.get() {
            self.inner.tracker.refresh();
        }
    }

    /// The current open flag (the strategy's value, not the mount state).
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.inner.open_state.get()
    }

    /// Request the overlay to open.
    pub fn open(&self) {
        self.request_open(true);
    }

    /// Request the overlay to close.
    pub fn close(&self) {
        self.request_open(false);
    }

    fn request_open(&self, open: bool) {
        if self.inner.disposed.get() {
            trace!(open, "open request ignored: controller disposed");
            return;
        }
        self.inner.open_state.request(open);
        if self.inner.open_state.owned() {
            apply_open(&self.inner, open);
        }
    }

    /// Apply an accepted open value. This is the controlled-mode flow-back
    /// path; in uncontrolled mode it behaves like `open()`/`close()`.
    pub fn set_open(&self, open: bool) {
        if self.inner.disposed.get() {
            return;
        }
        self.inner.open_state.record(open);
        apply_open(&self.inner, open);
    }

    /// The current resolved position; `None` while closed.
    #[must_use]
    pub fn resolved_position(&self) -> Option<ResolvedPosition> {
        self.inner.tracker.position()
    }

    /// The cell positions are published through, for hosts that want
    /// version-based dirty checking.
    #[must_use]
    pub fn position_cell(&self) -> &PositionCell {
        self.inner.tracker.cell()
    }

    /// Subscribe to position changes (including the `None` on close).
    pub fn subscribe_position(
        &self,
        callback: impl Fn(Option<&ResolvedPosition>) + 'static,
    ) -> PositionSubscription {
        self.inner.tracker.cell().subscribe(callback)
    }

    /// Notify that the overlay's content has mounted and sized itself:
    /// triggers the second resolve pass of the two-pass layout. No-op
    /// while closed.
    pub fn overlay_mounted(&self) {
        if self.inner.mounted.get() {
            self.inner.tracker.refresh();
        }
    }

    /// Remove every listener and render the controller inert. Idempotent;
    /// also invoked on drop.
    pub fn dispose(&self) {
        if self.inner.disposed.replace(true) {
            return;
        }
        if self.inner.mounted.get() {
            unmount(&self.inner);
        }
        if self.inner.open_state.owned() {
            self.inner.open_state.record(false);
        }
        debug!("overlay controller disposed");
    }
}

impl<E: Environment + 'static> Drop for OverlayController<E> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<E: Environment + 'static> std::fmt::Debug for OverlayController<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayController")
            .field("open", &self.is_open())
            .field("mounted", &self.inner.mounted.get())
            .field("position", &self.resolved_position())
            .finish()
    }
}

fn apply_open<E: Environment + 'static>(inner: &Rc<ControllerInner<E>>, open: bool) {
    if open && !inner.mounted.get() {
        mount(inner);
    } else if !open && inner.mounted.get() {
        unmount(inner);
    }
}

fn mount<E: Environment + 'static>(inner: &Rc<ControllerInner<E>>) {
    let elements = *inner.elements.borrow();
    inner
        .tracker
        .set_elements(elements.trigger, elements.overlay);

    // Synchronous first pass; a trigger that cannot be measured aborts
    // the open (and tells a controlled host so).
    if let Err(err) = inner.tracker.start() {
        debug!(%err, "open aborted: trigger not measurable");
        if inner.open_state.owned() {
            inner.open_state.record(false);
        } else {
            inner.open_state.request(false);
        }
        return;
    }

    // Dismissal attaches only now, after the activating event has been
    // fully dispatched, so the opening press cannot reach these listeners.
    let generation = inner.generation.get() + 1;
    inner.generation.set(generation);
    for kind in [SignalKind::PointerDown, SignalKind::KeyDown] {
        let weak = Rc::downgrade(inner);
        let callback: SignalCallback = Rc::new(move |signal| {
            let Some(inner) = weak.upgrade() else { return };
            if inner.generation.get() != generation || !inner.mounted.get() {
                trace!(generation, "dropping stale dismissal signal");
                return;
            }
            let elements = *inner.elements.borrow();
            let trigger_rect = elements.trigger.and_then(|id| inner.env.measure(id).ok());
            let overlay_rect = elements.overlay.and_then(|id| inner.env.measure(id).ok());
            if dismiss::should_dismiss(signal, trigger_rect, overlay_rect) {
                debug!(?signal, "dismissal requested");
                inner.open_state.request(false);
                if inner.open_state.owned() {
                    apply_open(&inner, false);
                }
            }
        });
        let guard = inner.env.subscribe(kind, callback);
        inner.dismiss_guards.borrow_mut().push(guard);
    }

    inner.mounted.set(true);
    debug!("overlay opened");
}

fn unmount<E: Environment + 'static>(inner: &Rc<ControllerInner<E>>) {
    inner.tracker.stop();
    inner.dismiss_guards.borrow_mut().clear();
    inner.generation.set(inner.generation.get() + 1);
    inner.mounted.set(false);
    debug!("overlay closed");
}
