#![forbid(unsafe_code)]

//! Input event vocabulary consumed by the runtime's dismissal listener.
//!
//! The engine only needs a narrow slice of a host toolkit's event model:
//! where a pointer press landed, and which key went down. Hosts translate
//! their native events into these types when feeding an environment.

use crate::geometry::Point;
use bitflags::bitflags;

bitflags! {
    /// Keyboard modifier state at the time of an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CTRL  = 1 << 1;
        const ALT   = 1 << 2;
        const META  = 1 << 3;
    }
}

/// Key identity for the keys the engine cares about. Everything else
/// arrives as `Char` or `Other` and is ignored by the dismissal listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Escape,
    Enter,
    Tab,
    Char(char),
    Other,
}

/// A key-down event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key-down with no modifiers.
    #[must_use]
    pub fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// Returns true for an Escape press, regardless of modifier state.
    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.code == KeyCode::Escape
    }
}

/// A pointer-down event in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub position: Point,
}

impl PointerEvent {
    /// A pointer press at the given viewport coordinates.
    #[must_use]
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
        }
    }
}
