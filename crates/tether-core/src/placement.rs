#![forbid(unsafe_code)]

//! Symbolic anchor placements.
//!
//! A [`Placement`] names where an overlay sits relative to its trigger
//! (e.g. `BottomStart` = below the trigger, leading edges aligned). The
//! resolver in [`crate::resolve`] maps each variant to a concrete offset
//! formula; this module only carries the vocabulary and the flip algebra
//! auto-placement searches over.
//!
//! # Invariants
//!
//! 1. `flipped_vertical` and `flipped_horizontal` are involutions:
//!    applying either twice yields the original placement.
//! 2. Flips preserve the other axis: a vertical flip keeps the
//!    `-start`/`-center`/`-end` alignment, a horizontal flip keeps the
//!    `top-`/`bottom-` side.
//! 3. For placements where a flip is meaningless (vertical flip of
//!    `Left`/`Right`, horizontal flip of the center variants) the flip is
//!    the identity.

use serde::{Deserialize, Serialize};

/// Placement of an overlay relative to its trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
    /// Above the trigger, leading edges aligned.
    TopStart,
    /// Above the trigger, horizontally centered.
    TopCenter,
    /// Above the trigger, trailing edges aligned.
    TopEnd,
    /// Below the trigger, leading edges aligned.
    #[default]
    BottomStart,
    /// Below the trigger, horizontally centered.
    BottomCenter,
    /// Below the trigger, trailing edges aligned.
    BottomEnd,
    /// To the left of the trigger, top edges aligned.
    Left,
    /// To the right of the trigger, top edges aligned.
    Right,
}

/// The two viewport axes, used when classifying overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Placement {
    /// All placements, in resolver-preference order.
    pub const ALL: [Self; 8] = [
        Self::TopStart,
        Self::TopCenter,
        Self::TopEnd,
        Self::BottomStart,
        Self::BottomCenter,
        Self::BottomEnd,
        Self::Left,
        Self::Right,
    ];

    /// Returns the stable string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TopStart => "top-start",
            Self::TopCenter => "top-center",
            Self::TopEnd => "top-end",
            Self::BottomStart => "bottom-start",
            Self::BottomCenter => "bottom-center",
            Self::BottomEnd => "bottom-end",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Returns true for the `top-*` and `bottom-*` families, whose primary
    /// axis (the side the overlay sits on) is vertical.
    #[must_use]
    pub const fn is_vertical_side(self) -> bool {
        !matches!(self, Self::Left | Self::Right)
    }

    /// Swap `top-*` with `bottom-*`, keeping the alignment suffix.
    /// Identity for `Left`/`Right`.
    #[must_use]
    pub const fn flipped_vertical(self) -> Self {
        match self {
            Self::TopStart => Self::BottomStart,
            Self::TopCenter => Self::BottomCenter,
            Self::TopEnd => Self::BottomEnd,
            Self::BottomStart => Self::TopStart,
            Self::BottomCenter => Self::TopCenter,
            Self::BottomEnd => Self::TopEnd,
            Self::Left | Self::Right => self,
        }
    }

    /// Swap `-start` with `-end` (and `Left` with `Right`), keeping the
    /// side prefix. Identity for the center variants.
    #[must_use]
    pub const fn flipped_horizontal(self) -> Self {
        match self {
            Self::TopStart => Self::TopEnd,
            Self::TopEnd => Self::TopStart,
            Self::BottomStart => Self::BottomEnd,
            Self::BottomEnd => Self::BottomStart,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::TopCenter | Self::BottomCenter => self,
        }
    }

    /// Apply a flip along the given axis.
    #[must_use]
    pub const fn flipped(self, axis: Axis) -> Self {
        match axis {
            Axis::Vertical => self.flipped_vertical(),
            Axis::Horizontal => self.flipped_horizontal(),
        }
    }
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
