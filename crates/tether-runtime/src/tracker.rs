#![forbid(unsafe_code)]

//! Live position tracking.
//!
//! While an overlay is open, [`PositionTracker`] subscribes to scroll and
//! resize signals and re-runs the measure + resolve pass on each one,
//! publishing through a [`PositionCell`]. Stopping drops the signal guards
//! in the same call — unsubscription is synchronous, and a late callback
//! delivered by a still-unpruned registry is fenced by a generation
//! counter.
//!
//! # Invariants
//!
//! 1. A published position always reflects the most recent signal
//!    processed; coalesced intermediate scrolls are irrelevant as long as
//!    the final settled position is correct.
//! 2. After `stop()`, no callback from the stopped session can publish:
//!    guards are dropped synchronously and the generation is bumped.
//! 3. A failed re-measure leaves the previous position in place (the
//!    worst symptom is a momentarily stale overlay, never a panic).
//! 4. `start()` performs one synchronous pass before subscribing, so the
//!    first published position exists before the host paints.

use crate::env::{ElementId, Environment, ListenerGuard, SignalCallback};
use crate::position_cell::PositionCell;
use crate::signal::SignalKind;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::trace;

use tether_core::{MeasureError, OverlayConfig, ResolvedPosition, Size, resolve};

struct TrackerShared {
    config: OverlayConfig,
    trigger: Option<ElementId>,
    overlay: Option<ElementId>,
    /// Bumped on every start/stop; signal callbacks from older sessions
    /// compare against it and drop themselves.
    generation: u64,
    guards: Vec<ListenerGuard>,
}

/// Re-resolves the overlay position on every scroll/resize while active.
pub struct PositionTracker<E: Environment + 'static> {
    env: Rc<E>,
    cell: PositionCell,
    shared: Rc<RefCell<TrackerShared>>,
}

impl<E: Environment + 'static> PositionTracker<E> {
    /// Create an idle tracker. Nothing is subscribed until [`start`].
    ///
    /// [`start`]: PositionTracker::start
    #[must_use]
    pub fn new(env: Rc<E>, config: OverlayConfig) -> Self {
        Self {
            env,
            cell: PositionCell::new(),
            shared: Rc::new(RefCell::new(TrackerShared {
                config,
                trigger: None,
                overlay: None,
                generation: 0,
                guards: Vec::new(),
            })),
        }
    }

    /// Set the elements to track. Takes effect on the next pass.
    pub fn set_elements(&self, trigger: Option<ElementId>, overlay: Option<ElementId>) {
        let mut shared = self.shared.borrow_mut();
        shared.trigger = trigger;
        shared.overlay = overlay;
    }

    /// The position cell positions are published through.
    #[must_use]
    pub fn cell(&self) -> &PositionCell {
        &self.cell
    }

    /// The current position, if tracking.
    #[must_use]
    pub fn position(&self) -> Option<ResolvedPosition> {
        self.cell.get()
    }

    /// True while signal subscriptions are live.
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        !self.shared.borrow().guards.is_empty()
    }

    /// Begin tracking: one synchronous measure + resolve pass, then
    /// subscribe to scroll and resize. A tracker that was already running
    /// is restarted (old guards dropped first).
    ///
    /// # Errors
    ///
    /// `MeasureError::Detached` if no trigger is set or the trigger cannot
    /// be measured; the tracker stays idle and the published position is
    /// cleared, so a failed restart cannot keep serving the previous
    /// session's position. An unmeasurable *overlay* is not an error — the
    /// pass resolves against [`Size::ZERO`] and [`refresh`] picks up the
    /// real size on mount.
    ///
    /// [`refresh`]: PositionTracker::refresh
    pub fn start(&self) -> Result<(), MeasureError> {
        let generation = {
            let mut shared = self.shared.borrow_mut();
            shared.guards.clear();
            shared.generation += 1;
            shared.generation
        };

        let measured = self
            .shared
            .borrow()
            .trigger
            .ok_or(MeasureError::Detached)
            .and_then(|id| self.env.measure(id));
        let trigger_rect = match measured {
            Ok(rect) => rect,
            Err(err) => {
                self.cell.set(None);
                return Err(err);
            }
        };

        let (overlay_id, config) = {
            let shared = self.shared.borrow();
            (shared.overlay, shared.config)
        };
        let overlay_size = overlay_id
            .and_then(|id| self.env.measure(id).ok())
            .map_or(Size::ZERO, |r| r.size());
        self.cell.set(Some(resolve(
            trigger_rect,
            overlay_size,
            self.env.viewport(),
            &config,
        )));

        for kind in [SignalKind::Scroll, SignalKind::Resize] {
            let weak = Rc::downgrade(&self.shared);
            let env = Rc::clone(&self.env);
            let cell = self.cell.clone();
            let callback: SignalCallback = Rc::new(move |_signal| {
                let Some(shared) = weak.upgrade() else { return };
                if shared.borrow().generation != generation {
                    trace!(generation, "dropping stale tracking signal");
                    return;
                }
                refresh_pass(env.as_ref(), &shared, &cell);
            });
            let guard = self.env.subscribe(kind, callback);
            self.shared.borrow_mut().guards.push(guard);
        }
        Ok(())
    }

    /// Re-run the measure + resolve pass immediately. Used for the second
    /// resolve once an overlay reports its real size on mount, and after
    /// element re-attachment. No-op while idle.
    pub fn refresh(&self) {
        if !self.is_tracking() {
            return;
        }
        refresh_pass(self.env.as_ref(), &self.shared, &self.cell);
    }

    /// Stop tracking: drop the signal guards synchronously, fence any
    /// still-queued callbacks, and clear the published position.
    pub fn stop(&self) {
        {
            let mut shared = self.shared.borrow_mut();
            shared.generation += 1;
            shared.guards.clear();
        }
        self.cell.set(None);
    }
}

impl<E: Environment + 'static> std::fmt::Debug for PositionTracker<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PositionTracker")
            .field("tracking", &self.is_tracking())
            .field("position", &self.position())
            .finish()
    }
}

/// One measure + resolve pass. A failed trigger measure keeps the previous
/// position; a failed overlay measure falls back to a zero-size resolve.
fn refresh_pass<E: Environment>(env: &E, shared: &RefCell<TrackerShared>, cell: &PositionCell) {
    let (trigger, overlay_id, config) = {
        let shared = shared.borrow();
        (shared.trigger, shared.overlay, shared.config)
    };
    let Some(trigger) = trigger else { return };
    let trigger_rect = match env.measure(trigger) {
        Ok(rect) => rect,
        Err(err) => {
            trace!(%err, "trigger measure failed, keeping previous position");
            return;
        }
    };
    let overlay_size = overlay_id
        .and_then(|id| env.measure(id).ok())
        .map_or(Size::ZERO, |r| r.size());
    cell.set(Some(resolve(
        trigger_rect,
        overlay_size,
        env.viewport(),
        &config,
    )));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockEnv;
    use tether_core::{Placement, Rect};

    const TRIGGER: ElementId = ElementId::new(1);
    const OVERLAY: ElementId = ElementId::new(2);

    fn env_with_trigger() -> Rc<MockEnv> {
        let env = Rc::new(MockEnv::new(Size::new(800.0, 600.0)));
        env.attach(
            TRIGGER,
            Rect::from_position(20.0, 10.0, Size::new(100.0, 30.0)),
        );
        env
    }

    fn tracker(env: &Rc<MockEnv>) -> PositionTracker<MockEnv> {
        let config = OverlayConfig::new(Placement::BottomStart).offset(4.0);
        let t = PositionTracker::new(Rc::clone(env), config);
        t.set_elements(Some(TRIGGER), Some(OVERLAY));
        t
    }

    #[test]
    fn start_publishes_initial_position() {
        let env = env_with_trigger();
        env.attach(
            OVERLAY,
            Rect::from_position(0.0, 0.0, Size::new(200.0, 150.0)),
        );
        let tracker = tracker(&env);
        tracker.start().unwrap();

        let pos = tracker.position().unwrap();
        assert_eq!(pos.top, 44.0);
        assert_eq!(pos.left, 20.0);
        assert_eq!(env.listener_count(), 2);
    }

    #[test]
    fn start_without_trigger_fails_idle() {
        let env = Rc::new(MockEnv::new(Size::new(800.0, 600.0)));
        let config = OverlayConfig::default();
        let tracker = PositionTracker::new(Rc::clone(&env), config);
        assert_eq!(tracker.start(), Err(MeasureError::Detached));
        assert!(!tracker.is_tracking());
        assert_eq!(tracker.position(), None);
        assert_eq!(env.listener_count(), 0);
    }

    #[test]
    fn unsized_overlay_resolves_zero_then_refreshes() {
        let env = env_with_trigger();
        env.attach_unsized(OVERLAY);
        let tracker = tracker(&env);
        tracker.start().unwrap();

        // Zero-size fallback puts the overlay on the anchor line.
        let first = tracker.position().unwrap();
        assert_eq!(first.top, 44.0);

        // Overlay content laid out; second pass picks up the real size.
        env.set_rect(
            OVERLAY,
            Rect::from_position(20.0, 44.0, Size::new(200.0, 150.0)),
        );
        tracker.refresh();
        let second = tracker.position().unwrap();
        assert_eq!(second.top, 44.0);
        assert_eq!(second.placement, Placement::BottomStart);
        assert!(tracker.cell().version() >= 1);
    }

    #[test]
    fn scroll_updates_position() {
        let env = env_with_trigger();
        let tracker = tracker(&env);
        tracker.start().unwrap();
        assert_eq!(tracker.position().unwrap().top, 44.0);

        // Scrolling down moves content up.
        env.scroll_by(0.0, 10.0);
        assert_eq!(tracker.position().unwrap().top, 34.0);
    }

    #[test]
    fn resize_updates_position() {
        let env = env_with_trigger();
        env.attach(
            OVERLAY,
            Rect::from_position(0.0, 0.0, Size::new(200.0, 150.0)),
        );
        let config = OverlayConfig::new(Placement::BottomStart)
            .offset(4.0)
            .auto_placement(true);
        let tracker = PositionTracker::new(Rc::clone(&env), config);
        tracker.set_elements(Some(TRIGGER), Some(OVERLAY));
        tracker.start().unwrap();
        assert_eq!(tracker.position().unwrap().placement, Placement::BottomStart);

        // Shrinking the viewport forces the flip on the next pass.
        env.resize(Size::new(800.0, 60.0));
        assert_eq!(tracker.position().unwrap().placement, Placement::TopStart);
    }

    #[test]
    fn failed_measure_keeps_previous_position() {
        let env = env_with_trigger();
        let tracker = tracker(&env);
        tracker.start().unwrap();
        let before = tracker.position().unwrap();

        env.detach(TRIGGER);
        env.scroll_by(0.0, 10.0);
        assert_eq!(tracker.position(), Some(before));
    }

    #[test]
    fn stop_unsubscribes_and_clears() {
        let env = env_with_trigger();
        let tracker = tracker(&env);
        tracker.start().unwrap();
        assert_eq!(env.listener_count(), 2);

        tracker.stop();
        assert_eq!(env.listener_count(), 0);
        assert_eq!(tracker.position(), None);
        assert!(!tracker.is_tracking());

        // Signals after stop publish nothing.
        env.scroll_by(0.0, 10.0);
        assert_eq!(tracker.position(), None);
    }

    #[test]
    fn failed_restart_clears_stale_position() {
        let env = env_with_trigger();
        let tracker = tracker(&env);
        tracker.start().unwrap();
        assert!(tracker.position().is_some());

        // Trigger gone by the time of the restart: the tracker must not
        // keep serving the previous session's position.
        env.detach(TRIGGER);
        assert_eq!(tracker.start(), Err(MeasureError::Detached));
        assert!(!tracker.is_tracking());
        assert_eq!(tracker.position(), None);
        assert_eq!(env.listener_count(), 0);
    }

    #[test]
    fn restart_remeasures_fresh_geometry() {
        let env = env_with_trigger();
        let tracker = tracker(&env);
        tracker.start().unwrap();
        tracker.stop();

        // Geometry changed while closed; reopen must not reuse the stale
        // position.
        env.set_rect(
            TRIGGER,
            Rect::from_position(300.0, 200.0, Size::new(100.0, 30.0)),
        );
        tracker.start().unwrap();
        let pos = tracker.position().unwrap();
        assert_eq!(pos.top, 234.0);
        assert_eq!(pos.left, 300.0);
    }
}
