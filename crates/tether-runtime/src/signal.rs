#![forbid(unsafe_code)]

//! Ambient environment signals.
//!
//! The engine listens to four signal kinds while an overlay is open:
//! scroll and resize drive position tracking, pointer-down and key-down
//! drive dismissal. Environments deliver whichever coalesced subset they
//! observe; only the latest scroll matters (the tracker converges, it does
//! not replay history).

use tether_core::{KeyEvent, PointerEvent};

/// A signal delivered to a subscribed listener.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    /// Any ancestor scrolled (capture phase in DOM terms).
    Scroll,
    /// The viewport was resized.
    Resize,
    /// A pointer button was pressed.
    PointerDown(PointerEvent),
    /// A key was pressed.
    KeyDown(KeyEvent),
}

impl Signal {
    /// The kind bucket this signal belongs to.
    #[must_use]
    pub const fn kind(&self) -> SignalKind {
        match self {
            Self::Scroll => SignalKind::Scroll,
            Self::Resize => SignalKind::Resize,
            Self::PointerDown(_) => SignalKind::PointerDown,
            Self::KeyDown(_) => SignalKind::KeyDown,
        }
    }
}

/// Subscription buckets for [`Signal`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Scroll,
    Resize,
    PointerDown,
    KeyDown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_core::{KeyCode, KeyEvent};

    #[test]
    fn kind_buckets() {
        assert_eq!(Signal::Scroll.kind(), SignalKind::Scroll);
        assert_eq!(Signal::Resize.kind(), SignalKind::Resize);
        assert_eq!(
            Signal::PointerDown(PointerEvent::at(1.0, 2.0)).kind(),
            SignalKind::PointerDown
        );
        assert_eq!(
            Signal::KeyDown(KeyEvent::plain(KeyCode::Escape)).kind(),
            SignalKind::KeyDown
        );
    }
}
