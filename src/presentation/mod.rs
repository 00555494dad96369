//! The outbound interface to a renderer.
//!
//! Rendering itself is out of scope. This module turns the guide's state and
//! the committed anchors into plain values a renderer can draw, and turns
//! points the renderer reports back into tour taps:
//!
//! - [`Frame`]: mode, current anchor bounds, the layer to draw and the accessory
//! - [`Spotlight`]: cutout, tint strips, tap catcher and placed callout
//! - [`Stage`]: per-subtree container holding anchors and callout size

mod frame;
mod stage;

pub use frame::{callout_origin, tint_regions, Frame, Layer, Spotlight, TapTarget};
pub use stage::Stage;
