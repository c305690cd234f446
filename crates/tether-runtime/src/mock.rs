#![forbid(unsafe_code)]

//! In-memory [`Environment`] double with listener instrumentation.
//!
//! `MockEnv` models the host surface as a flat set of elements with known
//! rects plus a viewport size, and lets tests drive the ambient signals
//! directly (`scroll_by`, `resize`, `press_at`, `key_down`). The listener
//! registry counts live registrations so lifecycle tests can assert "zero
//! residual listeners after close" — the leak defect class is caught here,
//! not at runtime.
//!
//! Dispatch clones the live callbacks out of the registry before invoking
//! them, so a callback may drop its own guard (or another's) without
//! re-entering the registry borrow. A listener removed mid-dispatch may
//! still observe the in-flight signal; subscribers that care (the tracker,
//! the controller) fence on their generation counter.

use crate::env::{ElementId, Environment, ListenerGuard, SignalCallback};
use crate::signal::{Signal, SignalKind};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tether_core::{KeyEvent, MeasureError, PointerEvent, Rect, Size};

#[derive(Debug, Clone, Copy)]
enum MockElement {
    /// Attached with known geometry.
    Sized(Rect),
    /// Attached, but content has not laid out yet.
    Unsized,
}

struct RegisteredListener {
    kind: SignalKind,
    callback: Weak<dyn Fn(&Signal)>,
}

struct MockEnvInner {
    viewport: Size,
    elements: FxHashMap<ElementId, MockElement>,
    /// Registration order is dispatch order, matching the position cell's
    /// notification order guarantee.
    listeners: Vec<RegisteredListener>,
}

/// Test environment. Cloning shares the same inner state.
pub struct MockEnv {
    inner: Rc<RefCell<MockEnvInner>>,
}

impl Clone for MockEnv {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl std::fmt::Debug for MockEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("MockEnv")
            .field("viewport", &inner.viewport)
            .field("elements", &inner.elements.len())
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

impl MockEnv {
    /// An environment with the given viewport and no elements.
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        Self {
            inner: Rc::new(RefCell::new(MockEnvInner {
                viewport,
                elements: FxHashMap::default(),
                listeners: Vec::new(),
            })),
        }
    }

    /// Attach an element with known geometry.
    pub fn attach(&self, id: ElementId, rect: Rect) {
        self.inner
            .borrow_mut()
            .elements
            .insert(id, MockElement::Sized(rect));
    }

    /// Attach an element whose size is not yet known (measures as
    /// [`MeasureError::SizeUnknown`] until [`set_rect`] is called).
    ///
    /// [`set_rect`]: MockEnv::set_rect
    pub fn attach_unsized(&self, id: ElementId) {
        self.inner
            .borrow_mut()
            .elements
            .insert(id, MockElement::Unsized);
    }

    /// Update an element's geometry (attaching it if needed).
    pub fn set_rect(&self, id: ElementId, rect: Rect) {
        self.attach(id, rect);
    }

    /// Detach an element; it measures as [`MeasureError::Detached`].
    pub fn detach(&self, id: ElementId) {
        self.inner.borrow_mut().elements.remove(&id);
    }

    /// Scroll the content by the given delta: every attached rect shifts
    /// opposite the scroll direction, then a `Scroll` signal fires.
    pub fn scroll_by(&self, dx: f64, dy: f64) {
        {
            let mut inner = self.inner.borrow_mut();
            for element in inner.elements.values_mut() {
                if let MockElement::Sized(rect) = element {
                    *rect = rect.translated(-dx, -dy);
                }
            }
        }
        self.dispatch(&Signal::Scroll);
    }

    /// Change the viewport size and fire a `Resize` signal.
    pub fn resize(&self, viewport: Size) {
        self.inner.borrow_mut().viewport = viewport;
        self.dispatch(&Signal::Resize);
    }

    /// Fire a pointer-down at the given viewport coordinates.
    pub fn press_at(&self, x: f64, y: f64) {
        self.dispatch(&Signal::PointerDown(PointerEvent::at(x, y)));
    }

    /// Fire a key-down.
    pub fn key_down(&self, key: KeyEvent) {
        self.dispatch(&Signal::KeyDown(key));
    }

    /// Number of live listener registrations across all signal kinds.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        let mut inner = self.inner.borrow_mut();
        inner.listeners.retain(|l| l.callback.strong_count() > 0);
        inner.listeners.len()
    }

    /// Number of live listener registrations for one signal kind.
    #[must_use]
    pub fn listener_count_of(&self, kind: SignalKind) -> usize {
        let mut inner = self.inner.borrow_mut();
        inner.listeners.retain(|l| l.callback.strong_count() > 0);
        inner.listeners.iter().filter(|l| l.kind == kind).count()
    }

    /// Deliver a signal to every live listener of its kind, in
    /// registration order.
    pub fn dispatch(&self, signal: &Signal) {
        let callbacks: Vec<SignalCallback> = {
            let mut inner = self.inner.borrow_mut();
            inner.listeners.retain(|l| l.callback.strong_count() > 0);
            inner
                .listeners
                .iter()
                .filter(|l| l.kind == signal.kind())
                .filter_map(|l| l.callback.upgrade())
                .collect()
        };
        for callback in &callbacks {
            callback(signal);
        }
    }
}

impl Environment for MockEnv {
    fn measure(&self, element: ElementId) -> Result<Rect, MeasureError> {
        match self.inner.borrow().elements.get(&element) {
            Some(MockElement::Sized(rect)) => Ok(*rect),
            Some(MockElement::Unsized) => Err(MeasureError::SizeUnknown),
            None => Err(MeasureError::Detached),
        }
    }

    fn viewport(&self) -> Size {
        self.inner.borrow().viewport
    }

    fn subscribe(&self, kind: SignalKind, callback: SignalCallback) -> ListenerGuard {
        self.inner.borrow_mut().listeners.push(RegisteredListener {
            kind,
            callback: Rc::downgrade(&callback),
        });
        ListenerGuard::retaining(callback)
    }
}
