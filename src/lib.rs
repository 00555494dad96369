//! Coachmark: a renderer-agnostic guided tour state machine
//!
//! Coachmark walks a user through an ordered set of UI elements, one callout
//! at a time. The state machine at its core knows nothing about pixels: it
//! holds the plan of step identifiers, the current step and a tri-state
//! visibility mode. Anchor bounds are resolved per layout pass, and the
//! presentation layer turns both into plain values a renderer can draw.
//!
//! # Core Concepts
//!
//! - **Step catalog**: a closed enum of steps via the `StepCatalog` trait;
//!   its enumeration order is the tour's order
//! - **Guide**: the shared state machine handle (`start`, `advance`, `jump`, `stop`)
//! - **Anchors**: bounds registered during layout, looked up by step
//! - **Delegate**: caller capabilities with default behaviour
//! - **Frame**: what to draw this pass, and where taps go
//!
//! # Example
//!
//! ```rust
//! use coachmark::anchor::{Point, Rect, Size};
//! use coachmark::core::TourMode;
//! use coachmark::presentation::{Stage, TapTarget};
//! use coachmark::step_catalog;
//! use coachmark::tour::{Guide, ManualScheduler};
//!
//! step_catalog! {
//!     pub enum Onboarding {
//!         Intro => Bottom("Welcome"),
//!         Feature => Top("Try this"),
//!         Done => Trailing("All set"),
//!     }
//! }
//!
//! let scheduler = ManualScheduler::shared();
//! let guide = Guide::new(scheduler.clone());
//! let mut stage = Stage::new(guide.clone(), Size::new(400.0, 800.0));
//!
//! let mut pass = stage.begin_layout();
//! pass.tag(&Onboarding::Intro, Rect::new(20.0, 100.0, 100.0, 40.0));
//! pass.tag(&Onboarding::Feature, Rect::new(20.0, 400.0, 100.0, 40.0));
//! pass.tag(&Onboarding::Done, Rect::new(300.0, 700.0, 60.0, 60.0));
//! stage.commit_layout(pass);
//!
//! guide.start::<Onboarding>(None);
//! assert_eq!(stage.tap(Point::new(50.0, 110.0)), Some(TapTarget::Cutout));
//! scheduler.run_until_idle();
//! assert_eq!(guide.match_current::<Onboarding>(), Some(Onboarding::Feature));
//! assert_eq!(guide.mode(), TourMode::Active);
//! ```

pub mod anchor;
pub mod config;
pub mod core;
pub mod delegate;
pub mod host;
pub mod presentation;
pub mod tour;

// Re-export commonly used types
pub use crate::anchor::{AnchorRegistry, Rect};
pub use crate::config::TourConfig;
pub use crate::core::{Callout, Edge, StepCatalog, StepId, TourMode, TourState};
pub use crate::delegate::{CutoutTouchMode, GuideDelegate};
pub use crate::tour::{Guide, ManualScheduler, Scheduler};
