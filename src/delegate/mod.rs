//! Caller-supplied capabilities for a running tour.
//!
//! A [`GuideDelegate`] decides how the overlay looks, what accessory is shown
//! alongside the tour, how taps on the cutout behave, and what background and
//! callout taps do. Every method has a default, so a delegate only overrides
//! what it cares about.

use crate::tour::Guide;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Tint drawn over everything except the cutout.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    /// Grey level, 0.0 black to 1.0 white
    pub white: f32,
    pub opacity: f32,
}

impl Default for Overlay {
    fn default() -> Self {
        Self {
            white: 0.8,
            opacity: 0.5,
        }
    }
}

/// Opaque key naming an accessory the renderer draws while a tour is visible.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Accessory(String);

impl Accessory {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// An accessory that renders nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Key the renderer resolves to a view.
    pub fn key(&self) -> &str {
        &self.0
    }

    /// True for the empty accessory.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Action run when the cutout is tapped in [`CutoutTouchMode::Custom`].
pub type TapAction = Rc<dyn Fn(&Guide)>;

/// How taps on the highlighted cutout are handled.
#[derive(Clone)]
pub enum CutoutTouchMode {
    /// No tap catcher; taps reach the element underneath.
    Passthrough,
    /// A tap advances the tour.
    Advance,
    /// A tap runs a caller-supplied action.
    Custom(TapAction),
}

impl CutoutTouchMode {
    /// Wrap `action` as a custom cutout handler.
    pub fn custom<F>(action: F) -> Self
    where
        F: Fn(&Guide) + 'static,
    {
        Self::Custom(Rc::new(action))
    }

    /// Whether the cutout needs a tap-catching region.
    pub fn catches_taps(&self) -> bool {
        !matches!(self, Self::Passthrough)
    }
}

impl fmt::Debug for CutoutTouchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passthrough => f.write_str("Passthrough"),
            Self::Advance => f.write_str("Advance"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Capability set consulted by the presentation layer and tap routing.
///
/// # Example
///
/// ```rust
/// use coachmark::delegate::{CutoutTouchMode, GuideDelegate};
/// use coachmark::tour::Guide;
///
/// struct LetTapsThrough;
///
/// impl GuideDelegate for LetTapsThrough {
///     fn cutout_touch_mode(&self, _guide: &Guide) -> CutoutTouchMode {
///         CutoutTouchMode::Passthrough
///     }
///
///     fn on_background_tap(&self, guide: &Guide) {
///         guide.stop(true);
///     }
/// }
/// ```
pub trait GuideDelegate {
    /// Extra view shown whenever the tour is visible. Default: none.
    fn accessory_view(&self, _guide: &Guide) -> Option<Accessory> {
        None
    }

    /// Tint for the dimmed area. Default: the guide's configured overlay.
    fn overlay(&self, guide: &Guide) -> Option<Overlay> {
        Some(guide.config().overlay)
    }

    /// Default: [`CutoutTouchMode::Advance`].
    fn cutout_touch_mode(&self, _guide: &Guide) -> CutoutTouchMode {
        CutoutTouchMode::Advance
    }

    /// Default: advance the tour.
    fn on_background_tap(&self, guide: &Guide) {
        guide.advance();
    }

    /// Default: advance the tour.
    fn on_callout_tap(&self, guide: &Guide) {
        guide.advance();
    }
}

/// Delegate installed when a tour starts without one.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultDelegate;

impl GuideDelegate for DefaultDelegate {
    fn accessory_view(&self, _guide: &Guide) -> Option<Accessory> {
        Some(Accessory::empty())
    }
}
