//! The move protocol between two steps.
//!
//! Moving away from an `Active` step happens in three phases so the outgoing
//! callout's size is never measured against the incoming anchor:
//!
//! 1. **Fade out** (immediately): mode becomes `Transitioning`, the step is
//!    unchanged so the old callout stays as an invisible placeholder.
//! 2. **Swap** (after the configured transition delay): the step becomes the
//!    target and `Transitioning` is re-asserted.
//! 3. **Settle** (on the following tick): mode becomes `Active`.
//!
//! From any other mode the move is immediate.
//!
//! Phases 2 and 3 are deferred callbacks with no cancellation. Each captures
//! the guide's generation when the move began; whether a stale callback is
//! dropped or applied depends on [`TransitionGuard`].

use crate::config::TransitionGuard;
use crate::core::{StepId, TourMode, TourState};
use crate::tour::machine::Guide;

/// Deferred phase of the move protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MovePhase {
    Swap,
    Settle,
}

impl MovePhase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Swap => "swap",
            Self::Settle => "settle",
        }
    }
}

impl Guide {
    pub(super) fn move_to(&self, target: StepId) {
        let (was_active, generation, current) = {
            let mut inner = self.shared.inner.borrow_mut();
            inner.generation += 1;
            (
                inner.state.mode == TourMode::Active,
                inner.generation,
                inner.state.current.clone(),
            )
        };

        if !was_active {
            self.set_state(TourState::new(TourMode::Active, Some(target)), true);
            return;
        }

        self.set_state(TourState::new(TourMode::Transitioning, current), true);

        let weak = self.downgrade();
        self.shared.scheduler.schedule_after(
            self.shared.config.transition_delay(),
            Box::new(move || {
                if let Some(guide) = Guide::upgrade(&weak) {
                    guide.swap(target, generation);
                }
            }),
        );
    }

    fn swap(&self, target: StepId, generation: u64) {
        if !self.admits(MovePhase::Swap, generation) {
            return;
        }
        self.set_state(TourState::new(TourMode::Transitioning, Some(target)), false);

        let weak = self.downgrade();
        self.shared.scheduler.schedule_next_tick(Box::new(move || {
            if let Some(guide) = Guide::upgrade(&weak) {
                guide.settle(generation);
            }
        }));
    }

    fn settle(&self, generation: u64) {
        if !self.admits(MovePhase::Settle, generation) {
            return;
        }
        let current = self.current();
        self.set_state(TourState::new(TourMode::Active, current), true);
    }

    /// Whether a deferred phase scheduled at `generation` may still run.
    fn admits(&self, phase: MovePhase, generation: u64) -> bool {
        let mut inner = self.shared.inner.borrow_mut();
        if inner.generation == generation {
            return true;
        }

        match self.shared.config.transition_guard {
            TransitionGuard::Generation => {
                inner.stale.discarded += 1;
                tracing::warn!(
                    tour = %inner.tour,
                    phase = phase.name(),
                    scheduled = generation,
                    current = inner.generation,
                    "discarding stale transition callback"
                );
                false
            }
            TransitionGuard::Unguarded => {
                inner.stale.applied += 1;
                tracing::debug!(
                    tour = %inner.tour,
                    phase = phase.name(),
                    scheduled = generation,
                    current = inner.generation,
                    "applying stale transition callback"
                );
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{TourConfig, TransitionGuard};
    use crate::core::{StepCatalog, TourMode, TourState};
    use crate::tour::{Guide, ManualScheduler};
    use std::rc::Rc;
    use tracing_test::traced_test;

    crate::step_catalog! {
        enum TestSteps {
            Intro => Bottom("Welcome"),
            Feature => Top("Try this"),
            Done => Trailing("All set"),
        }
    }

    fn guide(guard: TransitionGuard) -> (Rc<ManualScheduler>, Guide) {
        let scheduler = ManualScheduler::shared();
        let config = TourConfig::default().with_transition_guard(guard);
        let guide = Guide::with_config(config, scheduler.clone()).unwrap();
        (scheduler, guide)
    }

    #[test]
    fn move_from_hidden_is_immediate() {
        let (scheduler, guide) = guide(TransitionGuard::Generation);
        guide.start::<TestSteps>(None);
        guide.stop(false);

        // A stopped guide has no plan, so drive the protocol directly.
        guide.move_to(TestSteps::Feature.key());
        assert_eq!(
            guide.state(),
            TourState::new(TourMode::Active, Some(TestSteps::Feature.key()))
        );
        assert!(scheduler.is_idle());
    }

    #[test]
    fn swap_phase_is_not_animated() {
        let (scheduler, guide) = guide(TransitionGuard::Generation);
        guide.start::<TestSteps>(None);
        guide.advance();
        scheduler.run_until_idle();

        let animated: Vec<bool> = guide.history().changes().iter().map(|c| c.animated).collect();
        assert_eq!(animated, vec![true, true, false, true]);
    }

    #[traced_test]
    #[test]
    fn guarded_stop_discards_pending_transition() {
        let (scheduler, guide) = guide(TransitionGuard::Generation);
        guide.start::<TestSteps>(None);
        guide.advance();
        guide.stop(true);

        scheduler.run_until_idle();

        assert_eq!(guide.state(), TourState::hidden());
        assert_eq!(guide.stale_callbacks().discarded, 1);
        assert_eq!(guide.stale_callbacks().applied, 0);
        assert!(logs_contain("discarding stale transition callback"));
    }

    #[test]
    fn unguarded_stop_is_overwritten_by_pending_transition() {
        let (scheduler, guide) = guide(TransitionGuard::Unguarded);
        guide.start::<TestSteps>(None);
        guide.advance();
        guide.stop(true);
        assert_eq!(guide.state(), TourState::hidden());

        scheduler.run_until_idle();

        assert_eq!(
            guide.state(),
            TourState::new(TourMode::Active, Some(TestSteps::Feature.key()))
        );
        assert!(guide.plan().is_none());
        assert_eq!(guide.stale_callbacks().applied, 2);

        // No plan survives the stop, so the resurrected tour cannot advance.
        guide.advance();
        assert_eq!(guide.current(), Some(TestSteps::Feature.key()));
    }

    #[test]
    fn guarded_double_advance_lands_once() {
        let (scheduler, guide) = guide(TransitionGuard::Generation);
        guide.start::<TestSteps>(None);
        guide.advance();
        guide.advance();

        // The second advance still sees Intro as current, so both target Feature;
        // the second one is immediate because the mode is already Transitioning.
        assert_eq!(
            guide.state(),
            TourState::new(TourMode::Active, Some(TestSteps::Feature.key()))
        );

        scheduler.run_until_idle();
        assert_eq!(guide.current(), Some(TestSteps::Feature.key()));
        assert_eq!(guide.mode(), TourMode::Active);
        assert_eq!(guide.stale_callbacks().discarded, 1);
    }

    #[test]
    fn unguarded_restart_is_overwritten_by_old_tour() {
        let (scheduler, guide) = guide(TransitionGuard::Unguarded);
        guide.start::<TestSteps>(None);
        guide.advance();
        guide.start::<TestSteps>(None);
        assert_eq!(guide.current(), Some(TestSteps::Intro.key()));

        scheduler.run_until_idle();
        assert_eq!(guide.current(), Some(TestSteps::Feature.key()));
        assert_eq!(guide.mode(), TourMode::Active);
    }

    #[test]
    fn dropped_guide_ignores_pending_callbacks() {
        let (scheduler, guide) = guide(TransitionGuard::Unguarded);
        guide.start::<TestSteps>(None);
        guide.advance();
        drop(guide);

        assert_eq!(scheduler.run_until_idle(), 1);
        assert!(scheduler.is_idle());
    }
}
