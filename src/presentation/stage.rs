//! Container tying a guide to the UI subtree it covers.

use super::frame::{Frame, TapTarget};
use crate::anchor::{AnchorPass, AnchorRegistry, Point, Size};
use crate::tour::Guide;

/// Owns the anchor registry and the callout's last reported size for one
/// guided subtree.
///
/// A host drives it once per frame: collect anchors with
/// [`begin_layout`](Self::begin_layout) / [`commit_layout`](Self::commit_layout),
/// report the rendered callout size, then draw [`frame`](Self::frame).
///
/// # Example
///
/// ```rust
/// use coachmark::anchor::{Rect, Size};
/// use coachmark::presentation::Stage;
/// use coachmark::step_catalog;
/// use coachmark::tour::{Guide, ManualScheduler};
///
/// step_catalog! {
///     enum Tour {
///         Search => Bottom("Search here"),
///     }
/// }
///
/// let guide = Guide::new(ManualScheduler::shared());
/// let mut stage = Stage::new(guide.clone(), Size::new(400.0, 800.0));
///
/// let mut pass = stage.begin_layout();
/// pass.tag(&Tour::Search, Rect::new(20.0, 40.0, 360.0, 44.0));
/// stage.commit_layout(pass);
///
/// guide.start::<Tour>(None);
/// let frame = stage.frame();
/// assert_eq!(frame.anchor, Some(Rect::new(20.0, 40.0, 360.0, 44.0)));
/// assert!(frame.spotlight().is_some());
/// ```
#[derive(Debug)]
pub struct Stage {
    guide: Guide,
    anchors: AnchorRegistry,
    screen: Size,
    callout_size: Size,
}

impl Stage {
    /// Stage for `guide` on a screen of `screen` size.
    pub fn new(guide: Guide, screen: Size) -> Self {
        Self {
            guide,
            anchors: AnchorRegistry::new(),
            screen,
            callout_size: Size::ZERO,
        }
    }

    /// The guide shared with the subtree.
    pub fn guide(&self) -> &Guide {
        &self.guide
    }

    /// Anchors from the last committed layout.
    pub fn anchors(&self) -> &AnchorRegistry {
        &self.anchors
    }

    /// Screen size in the shared coordinate space.
    pub fn screen(&self) -> Size {
        self.screen
    }

    /// Update the screen size, e.g. on rotation.
    pub fn set_screen(&mut self, screen: Size) {
        self.screen = screen;
    }

    pub fn callout_size(&self) -> Size {
        self.callout_size
    }

    /// Size-change notification for the rendered callout.
    pub fn set_callout_size(&mut self, size: Size) {
        self.callout_size = size;
    }

    /// Start collecting anchors for a layout pass.
    pub fn begin_layout(&self) -> AnchorPass {
        self.anchors.begin_pass()
    }

    /// Replace the anchors with a finished pass.
    pub fn commit_layout(&mut self, pass: AnchorPass) {
        self.anchors.commit(pass);
    }

    /// Compose the current frame.
    pub fn frame(&self) -> Frame {
        Frame::compose(&self.guide, &self.anchors, self.screen, self.callout_size)
    }

    /// Hit-test `point` against the current frame and route the tap.
    ///
    /// Returns the target that received it, or `None` when the tap should
    /// reach the underlying UI. [`TapTarget::Overlay`] means the tap was
    /// caught by the transition overlay and has no effect.
    pub fn tap(&self, point: Point) -> Option<TapTarget> {
        let target = self.frame().hit_test(point)?;
        self.guide.dispatch_tap(target);
        Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::Rect;
    use crate::core::{StepCatalog, TourMode};
    use crate::delegate::{Accessory, CutoutTouchMode, GuideDelegate};
    use crate::presentation::Layer;
    use crate::tour::ManualScheduler;
    use std::rc::Rc;

    crate::step_catalog! {
        enum TestSteps {
            Intro => Bottom("Welcome"),
            Feature => Top("Try this"),
        }
    }

    struct Passthrough;

    impl GuideDelegate for Passthrough {
        fn accessory_view(&self, _guide: &Guide) -> Option<Accessory> {
            Some(Accessory::new("skip"))
        }

        fn cutout_touch_mode(&self, _guide: &Guide) -> CutoutTouchMode {
            CutoutTouchMode::Passthrough
        }
    }

    fn stage() -> (Rc<ManualScheduler>, Stage) {
        let scheduler = ManualScheduler::shared();
        let guide = Guide::new(scheduler.clone());
        let mut stage = Stage::new(guide, Size::new(400.0, 800.0));
        let mut pass = stage.begin_layout();
        pass.tag(&TestSteps::Intro, Rect::new(100.0, 100.0, 50.0, 50.0));
        pass.tag(&TestSteps::Feature, Rect::new(100.0, 400.0, 50.0, 50.0));
        stage.commit_layout(pass);
        stage.set_callout_size(Size::new(80.0, 40.0));
        (scheduler, stage)
    }

    #[test]
    fn hidden_guide_renders_nothing() {
        let (_, stage) = stage();
        let frame = stage.frame();
        assert!(frame.is_empty());
        assert_eq!(frame.state.mode, TourMode::Hidden);
    }

    #[test]
    fn active_frame_places_callout_below_anchor() {
        let (_, stage) = stage();
        stage.guide().start::<TestSteps>(None);

        let frame = stage.frame();
        let spotlight = frame.spotlight().unwrap();
        assert_eq!(spotlight.cutout, Rect::new(100.0, 100.0, 50.0, 50.0));
        assert_eq!(spotlight.callout_frame, Rect::new(85.0, 150.0, 80.0, 40.0));
        assert_eq!(spotlight.callout.content, "Welcome");
        assert_eq!(spotlight.tints.len(), 4);
        assert_eq!(frame.accessory, Some(Accessory::empty()));
    }

    #[test]
    fn absent_anchor_yields_no_bounds_and_no_cutout() {
        let (_, mut stage) = stage();
        let pass = stage.begin_layout();
        stage.commit_layout(pass);
        stage.guide().start::<TestSteps>(None);

        let frame = stage.frame();
        assert_eq!(frame.state.mode, TourMode::Active);
        assert!(frame.anchor.is_none());
        assert!(matches!(frame.layer, Layer::Empty));
        assert!(frame.spotlight().is_none());
    }

    #[test]
    fn transition_frame_holds_placeholder_callout() {
        let (_, stage) = stage();
        stage.guide().start::<TestSteps>(None);
        stage.guide().advance();

        match stage.frame().layer {
            Layer::Transition {
                overlay,
                placeholder,
            } => {
                assert!(overlay.is_some());
                assert_eq!(placeholder.unwrap().content, "Welcome");
            }
            other => panic!("Expected transition layer, got {other:?}"),
        }
    }

    #[test]
    fn transition_overlay_blocks_taps() {
        let (scheduler, stage) = stage();
        stage.guide().start::<TestSteps>(None);
        stage.guide().advance();
        let generation = stage.guide().generation();

        assert_eq!(stage.tap(Point::new(390.0, 10.0)), Some(TapTarget::Overlay));
        assert_eq!(stage.guide().generation(), generation);

        scheduler.run_until_idle();
        assert_eq!(
            stage.guide().match_current::<TestSteps>(),
            Some(TestSteps::Feature)
        );
    }

    #[test]
    fn tap_on_cutout_advances_by_default() {
        let (scheduler, stage) = stage();
        stage.guide().start::<TestSteps>(None);

        assert_eq!(stage.tap(Point::new(125.0, 125.0)), Some(TapTarget::Cutout));
        scheduler.run_until_idle();
        assert_eq!(
            stage.guide().match_current::<TestSteps>(),
            Some(TestSteps::Feature)
        );
        assert_eq!(stage.frame().anchor, Some(Rect::new(100.0, 400.0, 50.0, 50.0)));
    }

    #[test]
    fn passthrough_cutout_tap_reaches_ui() {
        let (_, stage) = stage();
        stage.guide().start::<TestSteps>(Some(Rc::new(Passthrough)));

        let frame = stage.frame();
        assert!(frame.spotlight().unwrap().tap_catcher.is_none());
        assert_eq!(frame.accessory, Some(Accessory::new("skip")));

        assert_eq!(stage.tap(Point::new(125.0, 125.0)), None);
        assert_eq!(stage.guide().mode(), TourMode::Active);
        assert_eq!(stage.guide().current(), Some(TestSteps::Intro.key()));
    }

    #[test]
    fn callout_size_change_moves_callout() {
        let (_, mut stage) = stage();
        stage.guide().start::<TestSteps>(None);
        stage.set_callout_size(Size::new(200.0, 60.0));

        let frame = stage.frame();
        assert_eq!(
            frame.spotlight().unwrap().callout_frame,
            Rect::new(25.0, 150.0, 200.0, 60.0)
        );
    }
}
