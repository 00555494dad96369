//! Renderer-facing snapshot of a tour.

use crate::anchor::{AnchorRegistry, Point, Rect, Size};
use crate::core::{Callout, Edge, TourMode, TourState};
use crate::delegate::{Accessory, CutoutTouchMode, Overlay};
use crate::tour::Guide;

/// Where a tap landed, as far as the tour is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TapTarget {
    /// The dimmed area around the cutout
    Background,
    /// The highlighted element's tap catcher
    Cutout,
    /// The callout bubble
    Callout,
    /// The full-screen overlay shown between steps; swallowed without effect
    Overlay,
}

/// The dimmed strips surrounding `cutout` on a screen of `screen` size.
///
/// Left and right strips run the full screen height; top and bottom strips
/// span the cutout's width. Strips are clipped to the screen and those with
/// no area are omitted.
pub fn tint_regions(cutout: Rect, screen: Size) -> Vec<Rect> {
    let mut regions = Vec::with_capacity(4);
    if cutout.min_x() > 0.0 {
        regions.push(Rect::new(0.0, 0.0, cutout.min_x(), screen.height));
    }
    if cutout.max_x() < screen.width {
        regions.push(Rect::new(
            cutout.max_x(),
            0.0,
            screen.width - cutout.max_x(),
            screen.height,
        ));
    }
    if cutout.min_y() > 0.0 {
        regions.push(Rect::new(cutout.min_x(), 0.0, cutout.width, cutout.min_y()));
    }
    if cutout.max_y() < screen.height {
        regions.push(Rect::new(
            cutout.min_x(),
            cutout.max_y(),
            cutout.width,
            screen.height - cutout.max_y(),
        ));
    }
    let bounds = Rect::from_size(screen);
    regions
        .into_iter()
        .map(|region| region.intersection(bounds))
        .filter(|region| !region.is_empty())
        .collect()
}

/// Top-left corner of a callout of `size` placed on `edge` of `anchor`.
pub fn callout_origin(edge: Edge, anchor: Rect, size: Size) -> Point {
    let x = match edge {
        Edge::Top | Edge::Bottom => anchor.mid_x() - size.width / 2.0,
        Edge::Leading => anchor.min_x() - size.width,
        Edge::Trailing => anchor.max_x(),
    };
    let y = match edge {
        Edge::Leading | Edge::Trailing => anchor.mid_y() - size.height / 2.0,
        Edge::Top => anchor.min_y() - size.height,
        Edge::Bottom => anchor.max_y(),
    };
    Point::new(x, y)
}

/// Everything drawn while the tour is `Active` on an anchored step.
#[derive(Clone, Debug)]
pub struct Spotlight {
    pub cutout: Rect,
    pub overlay: Option<Overlay>,
    /// Dimmed strips around the cutout; they catch background taps
    pub tints: Vec<Rect>,
    pub touch_mode: CutoutTouchMode,
    /// Tap-catching region over the cutout, absent for passthrough
    pub tap_catcher: Option<Rect>,
    pub callout: Callout,
    pub callout_frame: Rect,
}

impl Spotlight {
    /// Lay out the spotlight for `cutout`, placing the callout on its edge.
    pub fn new(
        cutout: Rect,
        screen: Size,
        overlay: Option<Overlay>,
        touch_mode: CutoutTouchMode,
        callout: Callout,
        callout_size: Size,
    ) -> Self {
        let origin = callout_origin(callout.edge, cutout, callout_size);
        let tap_catcher = touch_mode.catches_taps().then_some(cutout);
        Self {
            cutout,
            overlay,
            tints: tint_regions(cutout, screen),
            touch_mode,
            tap_catcher,
            callout,
            callout_frame: Rect::new(origin.x, origin.y, callout_size.width, callout_size.height),
        }
    }

    /// Classify `point`. The callout sits on top, then the cutout's tap
    /// catcher, then the tint. `None` means the tap falls through to the UI.
    pub fn hit_test(&self, point: Point) -> Option<TapTarget> {
        if self.callout_frame.contains(point) {
            return Some(TapTarget::Callout);
        }
        if self.tap_catcher.is_some_and(|catcher| catcher.contains(point)) {
            return Some(TapTarget::Cutout);
        }
        if self.overlay.is_some() && self.tints.iter().any(|tint| tint.contains(point)) {
            return Some(TapTarget::Background);
        }
        None
    }
}

/// What the renderer draws above the content.
#[derive(Clone, Debug)]
pub enum Layer {
    /// Nothing: the tour is hidden, or the active step has no anchor.
    Empty,
    /// Between steps: full-screen overlay and an invisible callout
    /// placeholder holding layout space.
    Transition {
        overlay: Option<Overlay>,
        placeholder: Option<Callout>,
    },
    Spotlight(Spotlight),
}

/// One presentation pass worth of tour output.
#[derive(Clone, Debug)]
pub struct Frame {
    pub state: TourState,
    /// Bounds of the current step's anchor; `None` when it is not mounted
    pub anchor: Option<Rect>,
    pub layer: Layer,
    /// Shown in every visible mode
    pub accessory: Option<Accessory>,
}

impl Frame {
    /// Build the frame for `guide` from the latest committed anchors.
    pub fn compose(guide: &Guide, anchors: &AnchorRegistry, screen: Size, callout_size: Size) -> Self {
        let state = guide.state();
        let entry = state.current.as_ref().and_then(|step| anchors.lookup(step));
        let anchor = entry.map(|entry| entry.bounds);

        if !state.mode.is_visible() {
            return Self {
                state,
                anchor,
                layer: Layer::Empty,
                accessory: None,
            };
        }

        let delegate = guide.delegate();
        let layer = match (state.mode, entry) {
            (TourMode::Transitioning, entry) => Layer::Transition {
                overlay: delegate.overlay(guide),
                placeholder: entry.map(|entry| entry.callout.clone()),
            },
            (TourMode::Active, Some(entry)) => Layer::Spotlight(Spotlight::new(
                entry.bounds,
                screen,
                delegate.overlay(guide),
                delegate.cutout_touch_mode(guide),
                entry.callout.clone(),
                callout_size,
            )),
            (TourMode::Active, None) => {
                tracing::trace!(step = ?state.current, "active step has no anchor, rendering nothing");
                Layer::Empty
            }
            (TourMode::Hidden, _) => Layer::Empty,
        };

        Self {
            accessory: delegate.accessory_view(guide),
            state,
            anchor,
            layer,
        }
    }

    /// The spotlight layer, if one is drawn.
    pub fn spotlight(&self) -> Option<&Spotlight> {
        match &self.layer {
            Layer::Spotlight(spotlight) => Some(spotlight),
            _ => None,
        }
    }

    /// True when nothing at all is drawn.
    pub fn is_empty(&self) -> bool {
        matches!(self.layer, Layer::Empty) && self.accessory.is_none()
    }

    /// Hit-test `point` against this frame.
    ///
    /// While transitioning, a drawn overlay covers the whole screen and
    /// catches every tap as [`TapTarget::Overlay`].
    pub fn hit_test(&self, point: Point) -> Option<TapTarget> {
        match &self.layer {
            Layer::Spotlight(spotlight) => spotlight.hit_test(point),
            Layer::Transition {
                overlay: Some(_), ..
            } => Some(TapTarget::Overlay),
            Layer::Transition { overlay: None, .. } | Layer::Empty => None,
        }
    }
}
