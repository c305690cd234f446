#![forbid(unsafe_code)]

//! Placement resolution: from a trigger rect and an overlay size to an
//! absolute viewport position.
//!
//! The resolver is a pure function. Auto-placement is a constrained local
//! search over at most four candidates (requested, vertical flip,
//! horizontal flip, both flips) — not a global optimizer. The vertical
//! axis is tested and flipped first, then the horizontal axis, and the
//! position is clamped into the viewport as the terminal fallback.
//!
//! # Invariants
//!
//! 1. Determinism: identical inputs always produce identical output; there
//!    is no hidden state.
//! 2. With `auto_placement` off, the resolved placement equals the
//!    requested placement even when the overlay overflows.
//! 3. With `auto_placement` on and an overlay no larger than the viewport,
//!    the resolved rect is fully contained in the viewport.
//! 4. Clamping never fails: any overlay/viewport combination yields a
//!    finite position with `top >= 0` and `left >= 0`.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Overlay larger than viewport | no flip can fit it | clamp to `(0, 0)`-anchored bounds, report last-tried placement |
//! | Unknown overlay size | content not yet laid out | caller resolves with [`Size::ZERO`] and re-resolves on mount |
//! | Degenerate trigger rect | trigger measured at zero size | formulas still apply; overlay hugs the collapsed edges |

use crate::geometry::{Point, Rect, Size};
use crate::placement::Placement;
use serde::{Deserialize, Serialize};

/// Per-session overlay description: the caller's requested placement, the
/// auto-placement opt-in, and the gap between trigger and overlay.
///
/// Immutable for the lifetime of one open session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Requested placement relative to the trigger.
    pub placement: Placement,
    /// Whether the resolver may substitute a flipped placement to avoid
    /// viewport overflow.
    pub auto_placement: bool,
    /// Gap in pixels between the trigger edge and the overlay edge.
    pub offset: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            placement: Placement::default(),
            auto_placement: false,
            offset: 0.0,
        }
    }
}

impl OverlayConfig {
    /// Config for the given placement with auto-placement off and no offset.
    #[must_use]
    pub fn new(placement: Placement) -> Self {
        Self {
            placement,
            ..Default::default()
        }
    }

    /// Enable or disable auto-placement.
    #[must_use]
    pub fn auto_placement(mut self, enabled: bool) -> Self {
        self.auto_placement = enabled;
        self
    }

    /// Set the trigger/overlay gap in pixels.
    #[must_use]
    pub fn offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }
}

/// Output of the resolver: where the overlay's top-left corner goes and
/// which placement was actually used.
///
/// `placement` differs from the requested one only when auto-placement
/// substituted a flip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPosition {
    pub top: f64,
    pub left: f64,
    pub placement: Placement,
}

impl ResolvedPosition {
    /// The overlay rect this position produces for the given size.
    #[must_use]
    pub fn rect(&self, overlay: Size) -> Rect {
        Rect::from_position(self.left, self.top, overlay)
    }
}

/// The base offset formula for one placement. Locates the overlay's own
/// top-left corner, so the `top-*` family subtracts the overlay height
/// (anchoring the overlay's bottom edge at `trigger.top - offset`) and
/// `Left` subtracts the overlay width.
#[must_use]
pub fn base_position(trigger: Rect, overlay: Size, placement: Placement, offset: f64) -> Point {
    let (top, left) = match placement {
        Placement::BottomStart => (trigger.bottom + offset, trigger.left),
        Placement::BottomCenter => (
            trigger.bottom + offset,
            trigger.center_x() - overlay.width / 2.0,
        ),
        Placement::BottomEnd => (trigger.bottom + offset, trigger.right - overlay.width),
        Placement::TopStart => (trigger.top - offset - overlay.height, trigger.left),
        Placement::TopCenter => (
            trigger.top - offset - overlay.height,
            trigger.center_x() - overlay.width / 2.0,
        ),
        Placement::TopEnd => (
            trigger.top - offset - overlay.height,
            trigger.right - overlay.width,
        ),
        Placement::Left => (trigger.top, trigger.left - offset - overlay.width),
        Placement::Right => (trigger.top, trigger.right + offset),
    };
    Point::new(left, top)
}

/// Resolve an overlay position.
///
/// With `auto_placement` off this is exactly the base formula for the
/// requested placement. With it on, the candidate search in the module
/// docs runs; see [`OverlayConfig`].
#[must_use]
pub fn resolve(
    trigger: Rect,
    overlay: Size,
    viewport: Size,
    config: &OverlayConfig,
) -> ResolvedPosition {
    let requested = config.placement;
    let at = |placement: Placement| {
        let p = base_position(trigger, overlay, placement, config.offset);
        ResolvedPosition {
            top: p.y,
            left: p.x,
            placement,
        }
    };

    let candidate = at(requested);
    if !config.auto_placement || candidate.rect(overlay).fits_within(viewport) {
        return candidate;
    }

    // Vertical axis first: flip top-* <-> bottom-* when the requested
    // position overflows vertically. The flip is taken even when the
    // flipped side does not fully fit; clamping below is the terminal
    // fallback and reports the last-tried placement.
    let mut current = candidate;
    if overflows_vertical(current.rect(overlay), viewport) {
        let flipped = requested.flipped_vertical();
        if flipped != requested {
            current = at(flipped);
        }
    }

    // Then the horizontal axis: flip -start <-> -end (or Left <-> Right)
    // if the possibly-vertically-flipped candidate still overflows.
    if overflows_horizontal(current.rect(overlay), viewport) {
        let flipped = current.placement.flipped_horizontal();
        if flipped != current.placement {
            current = at(flipped);
        }
    }

    if current.rect(overlay).fits_within(viewport) {
        return current;
    }

    clamp_into_viewport(current, overlay, viewport)
}

fn overflows_vertical(rect: Rect, viewport: Size) -> bool {
    rect.top < 0.0 || rect.bottom > viewport.height
}

fn overflows_horizontal(rect: Rect, viewport: Size) -> bool {
    rect.left < 0.0 || rect.right > viewport.width
}

/// Push the overlay's edges inside the viewport, axis by axis. For an
/// overlay larger than the viewport the upper bound collapses to zero and
/// the overlay pins to the top/left edge.
fn clamp_into_viewport(
    position: ResolvedPosition,
    overlay: Size,
    viewport: Size,
) -> ResolvedPosition {
    ResolvedPosition {
        top: clamp_axis(position.top, overlay.height, viewport.height),
        left: clamp_axis(position.left, overlay.width, viewport.width),
        placement: position.placement,
    }
}

/// Clamp `value` into `[0, limit - extent]` so that `value + extent`
/// stays within `limit`. `limit - extent` can round **up** by one ULP,
/// which would push the reconstructed far edge past the limit; nudge the
/// clamped coordinate down until the edge stays inside.
fn clamp_axis(value: f64, extent: f64, limit: f64) -> f64 {
    let max = (limit - extent).max(0.0);
    let mut clamped = value.clamp(0.0, max);
    while clamped > 0.0 && clamped + extent > limit {
        clamped = clamped.next_down();
    }
    clamped
}
