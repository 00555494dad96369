//! Starting and stopping a tour from host UI events.
//!
//! A [`TourTrigger`] is attached to the view that owns a tour. The host
//! forwards appear/disappear events, changes to its "is active" flag, and
//! navigation signals; the trigger turns them into `start` and `stop` calls.

use crate::config::MAX_DELAY;
use crate::core::StepCatalog;
use crate::delegate::GuideDelegate;
use crate::tour::Guide;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;
use std::time::Duration;

/// Caller-controlled start trigger for catalog `C`.
///
/// # Example
///
/// ```rust
/// use coachmark::core::TourMode;
/// use coachmark::host::TourTrigger;
/// use coachmark::step_catalog;
/// use coachmark::tour::{Guide, ManualScheduler};
///
/// step_catalog! {
///     enum Tour {
///         Intro => Bottom("Welcome"),
///     }
/// }
///
/// let scheduler = ManualScheduler::shared();
/// let guide = Guide::new(scheduler.clone());
/// let trigger = TourTrigger::<Tour>::new(guide.clone(), true);
///
/// trigger.on_appear();
/// assert_eq!(guide.mode(), TourMode::Hidden);
/// scheduler.run_until_idle();
/// assert_eq!(guide.mode(), TourMode::Active);
///
/// trigger.on_link(true);
/// assert_eq!(guide.mode(), TourMode::Hidden);
/// ```
pub struct TourTrigger<C: StepCatalog> {
    guide: Guide,
    active: bool,
    start_delay: Duration,
    delegate: Option<Rc<dyn GuideDelegate>>,
    _catalog: PhantomData<fn() -> C>,
}

impl<C: StepCatalog> TourTrigger<C> {
    /// Trigger using the guide's configured start delay.
    pub fn new(guide: Guide, active: bool) -> Self {
        let start_delay = guide.config().start_delay();
        Self {
            guide,
            active,
            start_delay,
            delegate: None,
            _catalog: PhantomData,
        }
    }

    /// Delegate passed to every `start` the trigger makes.
    pub fn with_delegate(mut self, delegate: Rc<dyn GuideDelegate>) -> Self {
        self.delegate = Some(delegate);
        self
    }

    /// Override the start delay, clamped to [`MAX_DELAY`].
    pub fn with_start_delay(mut self, delay: Duration) -> Self {
        if delay > MAX_DELAY {
            tracing::warn!(requested = ?delay, max = ?MAX_DELAY, "start delay clamped");
        }
        self.start_delay = delay.min(MAX_DELAY);
        self
    }

    /// Current value of the active flag.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Delay between appearing and starting.
    pub fn start_delay(&self) -> Duration {
        self.start_delay
    }

    /// The view appeared: start after the start delay if active.
    pub fn on_appear(&self) {
        if !self.active {
            return;
        }
        tracing::debug!(delay = ?self.start_delay, catalog = std::any::type_name::<C>(), "scheduling tour start");
        let guide = self.guide.clone();
        let delegate = self.delegate.clone();
        self.guide.scheduler().schedule_after(
            self.start_delay,
            Box::new(move || guide.start::<C>(delegate)),
        );
    }

    /// The view went away: stop the tour.
    pub fn on_disappear(&self) {
        self.guide.stop(true);
    }

    /// Update the active flag; turning it on starts the tour immediately.
    pub fn set_active(&mut self, active: bool) {
        let rising = active && !self.active;
        self.active = active;
        if rising {
            self.guide.start::<C>(self.delegate.clone());
        }
    }

    /// A navigation link changed visibility; showing it stops the tour.
    pub fn on_link(&self, shown: bool) {
        if shown {
            self.guide.stop(true);
        }
    }

    /// A tab/selection changed; landing on `tag` stops the tour.
    pub fn on_selection<V: PartialEq>(&self, tag: &V, selection: &V) {
        if tag == selection {
            self.guide.stop(true);
        }
    }
}

impl<C: StepCatalog> fmt::Debug for TourTrigger<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TourTrigger")
            .field("catalog", &std::any::type_name::<C>())
            .field("active", &self.active)
            .field("start_delay", &self.start_delay)
            .field("has_delegate", &self.delegate.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{StepCatalog, TourMode, TourState};
    use crate::delegate::{Accessory, DefaultDelegate};
    use crate::tour::ManualScheduler;

    crate::step_catalog! {
        enum TestSteps {
            Intro => Bottom("Welcome"),
            Feature => Top("Try this"),
        }
    }

    struct Labelled;

    impl GuideDelegate for Labelled {
        fn accessory_view(&self, _guide: &Guide) -> Option<Accessory> {
            Some(Accessory::new("labelled"))
        }
    }

    fn setup() -> (Rc<ManualScheduler>, Guide) {
        let scheduler = ManualScheduler::shared();
        let guide = Guide::new(scheduler.clone());
        (scheduler, guide)
    }

    #[test]
    fn appear_starts_after_delay() {
        let (scheduler, guide) = setup();
        let trigger = TourTrigger::<TestSteps>::new(guide.clone(), true);
        assert_eq!(trigger.start_delay(), Duration::from_millis(500));

        trigger.on_appear();
        scheduler.advance_by(Duration::from_millis(499));
        assert_eq!(guide.mode(), TourMode::Hidden);

        scheduler.advance_by(Duration::from_millis(1));
        assert_eq!(guide.current(), Some(TestSteps::Intro.key()));
    }

    #[test]
    fn inactive_appear_does_nothing() {
        let (scheduler, guide) = setup();
        let trigger = TourTrigger::<TestSteps>::new(guide.clone(), false);

        trigger.on_appear();
        assert!(scheduler.is_idle());
        assert_eq!(guide.state(), TourState::hidden());
    }

    #[test]
    fn custom_start_delay_is_used() {
        let (scheduler, guide) = setup();
        let trigger = TourTrigger::<TestSteps>::new(guide.clone(), true)
            .with_start_delay(Duration::from_millis(50));

        trigger.on_appear();
        scheduler.advance_by(Duration::from_millis(50));
        assert_eq!(guide.mode(), TourMode::Active);
    }

    #[test]
    fn oversized_start_delay_is_clamped() {
        let (scheduler, guide) = setup();
        scheduler.advance_by(Duration::from_millis(1));
        let trigger = TourTrigger::<TestSteps>::new(guide.clone(), true)
            .with_start_delay(Duration::MAX);
        assert_eq!(trigger.start_delay(), MAX_DELAY);

        trigger.on_appear();
        scheduler.advance_by(MAX_DELAY);
        assert_eq!(guide.mode(), TourMode::Active);
    }

    #[test]
    fn rising_active_flag_starts_immediately() {
        let (_, guide) = setup();
        let mut trigger = TourTrigger::<TestSteps>::new(guide.clone(), false)
            .with_delegate(Rc::new(Labelled));

        trigger.set_active(true);
        assert!(trigger.is_active());
        assert_eq!(guide.mode(), TourMode::Active);
        assert_eq!(
            guide.delegate().accessory_view(&guide),
            Some(Accessory::new("labelled"))
        );

        let generation = guide.generation();
        trigger.set_active(true);
        assert_eq!(guide.generation(), generation);
    }

    #[test]
    fn disappear_stops() {
        let (_, guide) = setup();
        guide.start::<TestSteps>(Some(Rc::new(DefaultDelegate)));
        let trigger = TourTrigger::<TestSteps>::new(guide.clone(), true);

        trigger.on_disappear();
        assert_eq!(guide.state(), TourState::hidden());
    }

    #[test]
    fn navigation_signals_stop() {
        let (_, guide) = setup();
        let trigger = TourTrigger::<TestSteps>::new(guide.clone(), true);

        guide.start::<TestSteps>(None);
        trigger.on_link(false);
        assert_eq!(guide.mode(), TourMode::Active);
        trigger.on_link(true);
        assert_eq!(guide.mode(), TourMode::Hidden);

        guide.start::<TestSteps>(None);
        trigger.on_selection(&"settings", &"home");
        assert_eq!(guide.mode(), TourMode::Active);
        trigger.on_selection(&"settings", &"settings");
        assert_eq!(guide.mode(), TourMode::Hidden);
    }
}
