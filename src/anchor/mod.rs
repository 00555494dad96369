//! Anchor geometry and the layout-pass registry.
//!
//! The tour state machine only ever holds [`StepId`](crate::core::StepId)s.
//! Concrete on-screen bounds are resolved here, on every layout pass, so they
//! can never go stale inside the machine.

mod geometry;
mod registry;

pub use geometry::{Point, Rect, Size};
pub use registry::{AnchorEntry, AnchorPass, AnchorRegistry};
