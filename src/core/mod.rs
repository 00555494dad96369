//! Core tour types.
//!
//! This module contains the data the tour state machine is built from:
//! - Step catalogs and their stable identifiers via the `StepCatalog` trait
//! - The tri-state visibility mode and the observable `TourState`
//! - Immutable history of tour changes
//!
//! Nothing here schedules work or touches the UI.

mod catalog;
mod history;
mod macros;
mod mode;

pub use catalog::{Callout, Edge, StepCatalog, StepId};
pub use history::{TourChange, TourHistory};
pub use mode::{TourMode, TourState};
