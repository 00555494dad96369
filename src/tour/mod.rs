//! The tour state machine and its scheduling seam.
//!
//! # Key Concepts
//!
//! - **Guide**: shared handle owning the plan and the tour state
//! - **Move protocol**: the fade-out / swap / settle sequence between steps
//! - **Scheduler**: where deferred phases run; the host's main loop in
//!   production, [`ManualScheduler`] in tests
//!
//! All mutation happens on one logical thread. Deferred phases are plain
//! callbacks handed to the scheduler, never blocking waits.

mod machine;
mod scheduler;
mod transition;

pub use machine::{Guide, ObserverId, StaleCallbacks, TourObserver};
pub use scheduler::{ManualScheduler, Scheduler, Task};
pub use transition::MovePhase;
