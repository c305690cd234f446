#![forbid(unsafe_code)]

//! Core: geometry, placement vocabulary, and the placement resolver.
//!
//! # Role in Tether
//! `tether-core` is the pure half of the overlay engine. Everything here is
//! a deterministic function of its arguments: no environment access, no
//! interior mutability, no clocks.
//!
//! # Primary responsibilities
//! - **Geometry**: viewport-relative `Point`/`Size`/`Rect`.
//! - **Placement**: the symbolic anchor vocabulary and its flip algebra.
//! - **Resolve**: base offset formulas, auto-placement search, clamping.
//! - **Events**: the pointer/key vocabulary the dismissal layer consumes.
//!
//! # How it fits in the system
//! The runtime (`tether-runtime`) measures trigger and viewport through its
//! `Environment`, calls [`resolve`] on every open/scroll/resize pass, and
//! publishes the [`ResolvedPosition`] to the host component.

pub mod error;
pub mod event;
pub mod geometry;
pub mod placement;
pub mod resolve;

pub use error::MeasureError;
pub use event::{KeyCode, KeyEvent, Modifiers, PointerEvent};
pub use geometry::{Point, Rect, Size};
pub use placement::{Axis, Placement};
pub use resolve::{OverlayConfig, ResolvedPosition, base_position, resolve};
