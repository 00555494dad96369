//! Tour change history.
//!
//! Every observable change of a tour's state is recorded as an immutable
//! [`TourChange`]. The history lives in memory only and is reset when a new
//! tour starts.

use super::mode::TourState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Record of a single state change.
///
/// # Example
///
/// ```rust
/// use coachmark::core::{StepId, TourChange, TourMode, TourState};
/// use chrono::Utc;
/// use uuid::Uuid;
///
/// let change = TourChange {
///     tour: Uuid::new_v4(),
///     from: TourState::hidden(),
///     to: TourState::new(TourMode::Active, Some(StepId::new("Tour", "Intro"))),
///     animated: true,
///     timestamp: Utc::now(),
/// };
/// assert!(change.to.mode.is_visible());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TourChange {
    /// Tour run the change belongs to
    pub tour: Uuid,
    /// State before the change
    pub from: TourState,
    /// State after the change
    pub to: TourState,
    /// Whether the renderer should animate into the new state
    pub animated: bool,
    /// When the change was applied
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of tour changes.
///
/// `record` returns a new history with the change appended. When a limit is
/// set the oldest changes are dropped first.
///
/// # Example
///
/// ```rust
/// use coachmark::core::{StepId, TourChange, TourHistory, TourMode, TourState};
/// use chrono::Utc;
/// use uuid::Uuid;
///
/// let tour = Uuid::new_v4();
/// let intro = TourState::new(TourMode::Active, Some(StepId::new("Tour", "Intro")));
///
/// let history = TourHistory::new().record(TourChange {
///     tour,
///     from: TourState::hidden(),
///     to: intro.clone(),
///     animated: true,
///     timestamp: Utc::now(),
/// });
///
/// let path = history.path();
/// assert_eq!(path, vec![&TourState::hidden(), &intro]);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TourHistory {
    changes: Vec<TourChange>,
    limit: Option<usize>,
}

impl TourHistory {
    /// Create a new, unbounded, empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty history retaining at most `limit` changes.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            changes: Vec::new(),
            limit: Some(limit),
        }
    }

    /// Record a change, returning a new history.
    pub fn record(&self, change: TourChange) -> Self {
        let mut changes = self.changes.clone();
        changes.push(change);
        if let Some(limit) = self.limit {
            let excess = changes.len().saturating_sub(limit);
            changes.drain(..excess);
        }
        Self {
            changes,
            limit: self.limit,
        }
    }

    /// Same limit, no changes.
    pub fn cleared(&self) -> Self {
        Self {
            changes: Vec::new(),
            limit: self.limit,
        }
    }

    /// States visited: the first change's `from`, then every `to`.
    pub fn path(&self) -> Vec<&TourState> {
        let mut path = Vec::new();
        if let Some(first) = self.changes.first() {
            path.push(&first.from);
        }
        for change in &self.changes {
            path.push(&change.to);
        }
        path
    }

    /// Time from the first to the last retained change.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.changes.first(), self.changes.last()) {
            last.timestamp
                .signed_duration_since(first.timestamp)
                .to_std()
                .ok()
        } else {
            None
        }
    }

    /// All retained changes in order.
    pub fn changes(&self) -> &[TourChange] {
        &self.changes
    }

    pub fn last(&self) -> Option<&TourChange> {
        self.changes.last()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}
