//! The tour state machine.

use crate::config::{ConfigError, TourConfig};
use crate::core::{StepCatalog, StepId, TourChange, TourHistory, TourMode, TourState};
use crate::delegate::{CutoutTouchMode, DefaultDelegate, GuideDelegate};
use crate::presentation::TapTarget;
use crate::tour::scheduler::Scheduler;
use chrono::Utc;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use uuid::Uuid;

/// Receives every recorded tour change.
///
/// Called after the guide has released its internal state, so observers may
/// call back into the guide.
pub trait TourObserver {
    fn on_change(&self, guide: &Guide, change: &TourChange);
}

impl<F> TourObserver for F
where
    F: Fn(&Guide, &TourChange),
{
    fn on_change(&self, guide: &Guide, change: &TourChange) {
        self(guide, change)
    }
}

/// Handle returned by [`Guide::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Counts of deferred transition callbacks that arrived after the tour moved on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StaleCallbacks {
    /// Dropped by the generation guard
    pub discarded: u64,
    /// Applied anyway because the guide runs unguarded
    pub applied: u64,
}

pub(super) struct Inner {
    pub(super) tour: Uuid,
    pub(super) state: TourState,
    pub(super) plan: Option<Vec<StepId>>,
    pub(super) delegate: Rc<dyn GuideDelegate>,
    pub(super) generation: u64,
    pub(super) stale: StaleCallbacks,
    history: TourHistory,
}

pub(super) struct Shared {
    pub(super) scheduler: Rc<dyn Scheduler>,
    pub(super) config: TourConfig,
    pub(super) inner: RefCell<Inner>,
    observers: RefCell<Vec<(ObserverId, Rc<dyn TourObserver>)>>,
    next_observer: RefCell<u64>,
}

/// Guided tour over one UI subtree.
///
/// `Guide` is a cheap, reference-counted handle. Clone it and pass it to every
/// part of the UI that needs to start, advance or inspect the tour. All clones
/// observe and drive the same tour. It is single-threaded by construction.
///
/// # Example
///
/// ```rust
/// use coachmark::core::{StepCatalog, TourMode};
/// use coachmark::step_catalog;
/// use coachmark::tour::{Guide, ManualScheduler};
///
/// step_catalog! {
///     enum Tour {
///         Intro => Bottom("Welcome"),
///         Feature => Top("Try this"),
///     }
/// }
///
/// let scheduler = ManualScheduler::shared();
/// let guide = Guide::new(scheduler.clone());
///
/// guide.start::<Tour>(None);
/// assert_eq!(guide.match_current::<Tour>(), Some(Tour::Intro));
///
/// guide.advance();
/// assert_eq!(guide.mode(), TourMode::Transitioning);
/// scheduler.run_until_idle();
/// assert_eq!(guide.match_current::<Tour>(), Some(Tour::Feature));
/// assert_eq!(guide.mode(), TourMode::Active);
///
/// guide.advance();
/// assert_eq!(guide.mode(), TourMode::Hidden);
/// ```
#[derive(Clone)]
pub struct Guide {
    pub(super) shared: Rc<Shared>,
}

impl Guide {
    /// Create a hidden guide with the default configuration.
    pub fn new(scheduler: Rc<dyn Scheduler>) -> Self {
        Self::from_parts(TourConfig::default(), scheduler)
    }

    /// Create a hidden guide, rejecting an invalid configuration.
    pub fn with_config(config: TourConfig, scheduler: Rc<dyn Scheduler>) -> Result<Self, ConfigError> {
        Ok(Self::from_parts(config.checked()?, scheduler))
    }

    fn from_parts(config: TourConfig, scheduler: Rc<dyn Scheduler>) -> Self {
        let history = match config.history_limit {
            Some(limit) => TourHistory::with_limit(limit),
            None => TourHistory::new(),
        };
        Self {
            shared: Rc::new(Shared {
                scheduler,
                config,
                inner: RefCell::new(Inner {
                    tour: Uuid::nil(),
                    state: TourState::hidden(),
                    plan: None,
                    delegate: Rc::new(DefaultDelegate),
                    generation: 0,
                    stale: StaleCallbacks::default(),
                    history,
                }),
                observers: RefCell::new(Vec::new()),
                next_observer: RefCell::new(0),
            }),
        }
    }

    pub(super) fn upgrade(weak: &Weak<Shared>) -> Option<Self> {
        weak.upgrade().map(|shared| Self { shared })
    }

    pub(super) fn downgrade(&self) -> Weak<Shared> {
        Rc::downgrade(&self.shared)
    }

    /// Start a tour over every step of `C`, in enumeration order.
    ///
    /// Replaces any tour in progress. Without a delegate the
    /// [`DefaultDelegate`] is installed. A non-empty catalog goes straight to
    /// `Active` on its first step; an empty one leaves the guide hidden.
    pub fn start<C: StepCatalog>(&self, delegate: Option<Rc<dyn GuideDelegate>>) {
        let plan = C::plan();
        let first = plan.first().cloned();
        let (tour, generation) = {
            let mut inner = self.shared.inner.borrow_mut();
            inner.generation += 1;
            inner.tour = Uuid::new_v4();
            inner.plan = Some(plan);
            inner.delegate = delegate.unwrap_or_else(|| Rc::new(DefaultDelegate));
            inner.history = inner.history.cleared();
            (inner.tour, inner.generation)
        };
        tracing::debug!(
            %tour,
            generation,
            catalog = std::any::type_name::<C>(),
            steps = C::all().len(),
            "tour started"
        );

        // Every run records its opening state, even when it equals the last run's.
        match first {
            Some(step) => self.apply_state(TourState::new(TourMode::Active, Some(step)), true, true),
            None => self.apply_state(TourState::hidden(), false, true),
        }
    }

    /// Move to the next step of the plan, or stop after the last one.
    ///
    /// Does nothing when no tour is running.
    pub fn advance(&self) {
        let next = {
            let inner = self.shared.inner.borrow();
            let (Some(current), Some(plan)) = (&inner.state.current, &inner.plan) else {
                return;
            };
            let Some(index) = plan.iter().position(|step| step == current) else {
                return;
            };
            plan.get(index + 1).cloned()
        };

        match next {
            Some(step) => {
                tracing::debug!(step = %step, "advancing tour");
                self.move_to(step);
            }
            None => {
                tracing::debug!("advanced past last step");
                self.stop(true);
            }
        }
    }

    /// Move to `step` if it belongs to the current plan.
    ///
    /// Steps from other catalogs are ignored. Jumping to the current step
    /// re-runs the transition.
    pub fn jump<C: StepCatalog>(&self, step: &C) {
        self.jump_to(&step.key());
    }

    /// Untyped form of [`jump`](Self::jump).
    pub fn jump_to(&self, step: &StepId) {
        let known = self
            .shared
            .inner
            .borrow()
            .plan
            .as_ref()
            .is_some_and(|plan| plan.contains(step));
        if !known {
            tracing::debug!(step = %step, "jump target not in current plan, ignoring");
            return;
        }
        tracing::debug!(step = %step, "jumping");
        self.move_to(step.clone());
    }

    /// End the tour. `animated` tells the renderer whether to fade out.
    pub fn stop(&self, animated: bool) {
        {
            let mut inner = self.shared.inner.borrow_mut();
            inner.generation += 1;
            inner.plan = None;
            tracing::debug!(tour = %inner.tour, generation = inner.generation, animated, "tour stopped");
        }
        self.set_state(TourState::hidden(), animated);
    }

    /// The step of `C` the tour is currently on, if any.
    pub fn match_current<C: StepCatalog>(&self) -> Option<C> {
        let current = self.current()?;
        C::all().into_iter().find(|step| step.key() == current)
    }

    /// Route a tap the presentation layer hit-tested.
    ///
    /// Ignored unless the tour is `Active`.
    pub fn dispatch_tap(&self, target: TapTarget) {
        if self.mode() != TourMode::Active {
            tracing::trace!(?target, "tap ignored outside active mode");
            return;
        }
        let delegate = self.delegate();
        match target {
            TapTarget::Overlay => {}
            TapTarget::Background => delegate.on_background_tap(self),
            TapTarget::Callout => delegate.on_callout_tap(self),
            TapTarget::Cutout => match delegate.cutout_touch_mode(self) {
                CutoutTouchMode::Passthrough => {}
                CutoutTouchMode::Advance => self.advance(),
                CutoutTouchMode::Custom(action) => action(self),
            },
        }
    }

    /// Register an observer for every future change.
    pub fn subscribe<O>(&self, observer: O) -> ObserverId
    where
        O: TourObserver + 'static,
    {
        let id = {
            let mut next = self.shared.next_observer.borrow_mut();
            *next += 1;
            ObserverId(*next)
        };
        self.shared
            .observers
            .borrow_mut()
            .push((id, Rc::new(observer)));
        id
    }

    /// Remove an observer. Returns whether it was registered.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut observers = self.shared.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        observers.len() != before
    }

    /// Snapshot of the current mode and step.
    pub fn state(&self) -> TourState {
        self.shared.inner.borrow().state.clone()
    }

    /// Current visibility mode.
    pub fn mode(&self) -> TourMode {
        self.shared.inner.borrow().state.mode
    }

    /// Current step, `None` when hidden.
    pub fn current(&self) -> Option<StepId> {
        self.shared.inner.borrow().state.current.clone()
    }

    /// The active plan, `None` when no tour is running.
    pub fn plan(&self) -> Option<Vec<StepId>> {
        self.shared.inner.borrow().plan.clone()
    }

    /// Delegate installed by the last `start`.
    pub fn delegate(&self) -> Rc<dyn GuideDelegate> {
        Rc::clone(&self.shared.inner.borrow().delegate)
    }

    /// Validated configuration the guide was built with.
    pub fn config(&self) -> &TourConfig {
        &self.shared.config
    }

    /// Scheduler running deferred transition phases.
    pub fn scheduler(&self) -> Rc<dyn Scheduler> {
        Rc::clone(&self.shared.scheduler)
    }

    /// Identifier of the current (or last) tour run; nil before the first start.
    pub fn tour_id(&self) -> Uuid {
        self.shared.inner.borrow().tour
    }

    /// Bumped by every start, stop and move.
    pub fn generation(&self) -> u64 {
        self.shared.inner.borrow().generation
    }

    /// Deferred callbacks that arrived after the tour moved on.
    pub fn stale_callbacks(&self) -> StaleCallbacks {
        self.shared.inner.borrow().stale
    }

    /// Changes recorded since the current tour started.
    pub fn history(&self) -> TourHistory {
        self.shared.inner.borrow().history.clone()
    }

    /// Apply a new state, record it, and notify observers.
    ///
    /// Re-asserting the current state records nothing.
    pub(super) fn set_state(&self, to: TourState, animated: bool) {
        self.apply_state(to, animated, false);
    }

    fn apply_state(&self, to: TourState, animated: bool, always_record: bool) {
        let change = {
            let mut inner = self.shared.inner.borrow_mut();
            if inner.state == to && !always_record {
                return;
            }
            let change = TourChange {
                tour: inner.tour,
                from: std::mem::replace(&mut inner.state, to.clone()),
                to,
                animated,
                timestamp: Utc::now(),
            };
            inner.history = inner.history.record(change.clone());
            change
        };
        tracing::debug!(
            tour = %change.tour,
            mode = change.to.mode.name(),
            step = change.to.current.as_ref().map(StepId::as_str),
            animated,
            "tour state changed"
        );

        let observers: Vec<Rc<dyn TourObserver>> = self
            .shared
            .observers
            .borrow()
            .iter()
            .map(|(_, observer)| Rc::clone(observer))
            .collect();
        for observer in observers {
            observer.on_change(self, &change);
        }
    }
}

impl fmt::Debug for Guide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.shared.inner.borrow();
        f.debug_struct("Guide")
            .field("tour", &inner.tour)
            .field("state", &inner.state)
            .field("plan", &inner.plan)
            .field("generation", &inner.generation)
            .finish_non_exhaustive()
    }
}
