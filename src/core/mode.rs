//! Tour visibility mode and the observable tour state.

use super::catalog::StepId;
use serde::{Deserialize, Serialize};

/// Visibility mode of a tour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TourMode {
    /// Nothing is shown.
    #[default]
    Hidden,
    /// Moving between steps; the overlay covers the screen and the callout is
    /// kept only as an invisible placeholder.
    Transitioning,
    /// The current step is highlighted with its callout.
    Active,
}

impl TourMode {
    /// Name for display/logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::Transitioning => "transitioning",
            Self::Active => "active",
        }
    }

    /// Whether anything is rendered in this mode.
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

/// Snapshot of what the presentation layer needs to know.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourState {
    pub mode: TourMode,
    pub current: Option<StepId>,
}

impl TourState {
    /// The state every guide starts in.
    pub fn hidden() -> Self {
        Self::default()
    }

    /// Create a state from its parts.
    pub fn new(mode: TourMode, current: Option<StepId>) -> Self {
        Self { mode, current }
    }

    /// True when the tour is showing `step` with its callout.
    pub fn is_active_on(&self, step: &StepId) -> bool {
        self.mode == TourMode::Active && self.current.as_ref() == Some(step)
    }
}
