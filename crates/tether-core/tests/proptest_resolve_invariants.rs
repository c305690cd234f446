//! Property-based invariant tests for the placement resolver.
//!
//! These verify structural invariants that must hold for **any** trigger
//! rect, overlay size, and viewport:
//!
//! 1. Containment: with auto-placement on and an overlay no larger than
//!    the viewport, the resolved rect is fully inside the viewport.
//! 2. Determinism: identical inputs produce identical output.
//! 3. Requested-placement fidelity: auto-placement off never substitutes.
//! 4. Clamp floor: resolved coordinates are never negative under
//!    auto-placement.
//! 5. Flip discipline: the resolved placement is reachable from the
//!    requested one by at most one vertical and one horizontal flip.
//! 6. No panics on extreme values.

use proptest::prelude::*;
use tether_core::{OverlayConfig, Placement, Rect, Size, resolve};

// ── Helpers ─────────────────────────────────────────────────────────────

fn placement_strategy() -> impl Strategy<Value = Placement> {
    prop_oneof![
        Just(Placement::TopStart),
        Just(Placement::TopCenter),
        Just(Placement::TopEnd),
        Just(Placement::BottomStart),
        Just(Placement::BottomCenter),
        Just(Placement::BottomEnd),
        Just(Placement::Left),
        Just(Placement::Right),
    ]
}

fn viewport_strategy() -> impl Strategy<Value = Size> {
    (100.0f64..=2000.0, 100.0f64..=2000.0).prop_map(|(w, h)| Size::new(w, h))
}

/// Triggers anywhere in (and slightly outside) a 2000x2000 region.
fn trigger_strategy() -> impl Strategy<Value = Rect> {
    (
        -100.0f64..=2000.0,
        -100.0f64..=2000.0,
        0.0f64..=400.0,
        0.0f64..=200.0,
    )
        .prop_map(|(left, top, w, h)| Rect::from_position(left, top, Size::new(w, h)))
}

fn offset_strategy() -> impl Strategy<Value = f64> {
    0.0f64..=32.0
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Containment under auto-placement
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn auto_placement_contains_overlay(
        placement in placement_strategy(),
        viewport in viewport_strategy(),
        // Overlay strictly smaller than the smallest viewport dimension.
        overlay_w in 1.0f64..=100.0,
        overlay_h in 1.0f64..=100.0,
        trigger in trigger_strategy(),
        offset in offset_strategy(),
    ) {
        let config = OverlayConfig::new(placement)
            .offset(offset)
            .auto_placement(true);
        let overlay = Size::new(overlay_w, overlay_h);
        let pos = resolve(trigger, overlay, viewport, &config);
        let rect = pos.rect(overlay);

        prop_assert!(
            rect.fits_within(viewport),
            "Overlay {:?} escaped viewport {:?} (trigger={:?}, requested={}, resolved={})",
            rect, viewport, trigger, placement, pos.placement
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Determinism
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn resolve_is_deterministic(
        placement in placement_strategy(),
        auto in any::<bool>(),
        viewport in viewport_strategy(),
        overlay_w in 0.0f64..=3000.0,
        overlay_h in 0.0f64..=3000.0,
        trigger in trigger_strategy(),
        offset in offset_strategy(),
    ) {
        let config = OverlayConfig::new(placement)
            .offset(offset)
            .auto_placement(auto);
        let overlay = Size::new(overlay_w, overlay_h);
        let a = resolve(trigger, overlay, viewport, &config);
        let b = resolve(trigger, overlay, viewport, &config);
        prop_assert_eq!(a, b, "Two calls produced different results");
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Auto-placement off never substitutes
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn manual_mode_keeps_requested_placement(
        placement in placement_strategy(),
        viewport in viewport_strategy(),
        overlay_w in 0.0f64..=3000.0,
        overlay_h in 0.0f64..=3000.0,
        trigger in trigger_strategy(),
        offset in offset_strategy(),
    ) {
        let config = OverlayConfig::new(placement).offset(offset);
        let pos = resolve(trigger, Size::new(overlay_w, overlay_h), viewport, &config);
        prop_assert_eq!(
            pos.placement, placement,
            "Manual mode substituted a placement"
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Clamp floor: no negative coordinates under auto-placement
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn auto_placement_never_negative(
        placement in placement_strategy(),
        viewport in viewport_strategy(),
        overlay_w in 0.0f64..=3000.0,
        overlay_h in 0.0f64..=3000.0,
        trigger in trigger_strategy(),
        offset in offset_strategy(),
    ) {
        let config = OverlayConfig::new(placement)
            .offset(offset)
            .auto_placement(true);
        let pos = resolve(trigger, Size::new(overlay_w, overlay_h), viewport, &config);
        prop_assert!(
            pos.top >= 0.0 && pos.left >= 0.0,
            "Auto-placement produced negative position {:?}",
            pos
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Flip discipline: resolved placement within one flip per axis
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn resolved_placement_is_flip_reachable(
        placement in placement_strategy(),
        viewport in viewport_strategy(),
        overlay_w in 0.0f64..=3000.0,
        overlay_h in 0.0f64..=3000.0,
        trigger in trigger_strategy(),
        offset in offset_strategy(),
    ) {
        let config = OverlayConfig::new(placement)
            .offset(offset)
            .auto_placement(true);
        let pos = resolve(trigger, Size::new(overlay_w, overlay_h), viewport, &config);

        let reachable = [
            placement,
            placement.flipped_vertical(),
            placement.flipped_horizontal(),
            placement.flipped_vertical().flipped_horizontal(),
        ];
        prop_assert!(
            reachable.contains(&pos.placement),
            "Resolved {} is not flip-reachable from requested {}",
            pos.placement, placement
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. No panics on extreme values
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn no_panic_on_extreme_values(
        placement in placement_strategy(),
        auto in any::<bool>(),
        vw in prop_oneof![Just(0.0f64), Just(1.0), Just(1e9), 0.0f64..=1e6],
        vh in prop_oneof![Just(0.0f64), Just(1.0), Just(1e9), 0.0f64..=1e6],
        ow in prop_oneof![Just(0.0f64), Just(1e9), 0.0f64..=1e6],
        oh in prop_oneof![Just(0.0f64), Just(1e9), 0.0f64..=1e6],
        trigger in trigger_strategy(),
        offset in prop_oneof![Just(0.0f64), Just(1e6), 0.0f64..=1000.0],
    ) {
        let config = OverlayConfig::new(placement)
            .offset(offset)
            .auto_placement(auto);
        // Must not panic, and must stay finite.
        let pos = resolve(trigger, Size::new(ow, oh), Size::new(vw, vh), &config);
        prop_assert!(pos.top.is_finite() && pos.left.is_finite());
    }
}
