#![forbid(unsafe_code)]

//! Measurement failure taxonomy.
//!
//! Every failure here is recovered locally by the runtime: a failed
//! re-measure leaves the previous position in place, a failed first
//! measure resolves against a zero-size overlay or skips the open. None
//! of these ever escape to the host as a panic.

/// Why an element could not be measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureError {
    /// The element handle is not attached to a renderable surface.
    Detached,
    /// The element is attached but its size is not yet known (content
    /// still laying out before first paint).
    SizeUnknown,
}

impl std::fmt::Display for MeasureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Detached => write!(f, "element is not attached to a renderable surface"),
            Self::SizeUnknown => write!(f, "element size is not yet known"),
        }
    }
}

impl std::error::Error for MeasureError {}
