//! Tour configuration.
//!
//! Timing, stale-callback policy, default overlay and history retention.
//! Validation uses Stillwater's `Validation` so every problem is reported in
//! one pass instead of stopping at the first.
//!
//! # Example
//!
//! ```rust
//! use coachmark::config::{TourConfig, TransitionGuard};
//! use std::time::Duration;
//!
//! let config = TourConfig::from_json(r#"{ "transition_delay_ms": 250 }"#).unwrap();
//! assert_eq!(config.transition_delay(), Duration::from_millis(250));
//! assert_eq!(config.transition_guard, TransitionGuard::Generation);
//!
//! let err = TourConfig::from_json(r#"{ "history_limit": 0, "start_delay_ms": 999999 }"#);
//! assert!(err.is_err());
//! ```

pub mod error;

pub use error::{ConfigError, ConfigViolation};

use crate::delegate::Overlay;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Upper bound accepted for any configured delay.
pub const MAX_DELAY: Duration = Duration::from_secs(10);

/// What happens to a deferred transition callback that was scheduled before a
/// newer `start`/`stop`/`advance`/`jump`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionGuard {
    /// Callbacks capture a generation number and are dropped when it is stale.
    #[default]
    Generation,
    /// Callbacks always apply, even after the tour moved on or stopped.
    Unguarded,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TourConfig {
    /// Delay between fading out the old callout and switching steps
    pub transition_delay_ms: u64,
    /// Delay a trigger waits after appearing before it starts the tour
    pub start_delay_ms: u64,
    pub transition_guard: TransitionGuard,
    /// Overlay used by the default delegate
    pub overlay: Overlay,
    /// Maximum number of retained history changes, `None` for unbounded
    pub history_limit: Option<usize>,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            transition_delay_ms: 500,
            start_delay_ms: 500,
            transition_guard: TransitionGuard::Generation,
            overlay: Overlay::default(),
            history_limit: Some(256),
        }
    }
}

impl TourConfig {
    /// `transition_delay_ms` as a `Duration`.
    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_delay_ms)
    }

    /// `start_delay_ms` as a `Duration`.
    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }

    /// Set the stale-callback policy.
    pub fn with_transition_guard(mut self, guard: TransitionGuard) -> Self {
        self.transition_guard = guard;
        self
    }

    /// Set the transition delay, saturating at `u64::MAX` milliseconds.
    pub fn with_transition_delay(mut self, delay: Duration) -> Self {
        self.transition_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Parse a JSON document and validate it. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: TourConfig = serde_json::from_str(json)?;
        config.checked()
    }

    /// Return `self` if valid, otherwise every violation.
    pub fn checked(self) -> Result<Self, ConfigError> {
        match self.validate() {
            Validation::Success(_) => Ok(self),
            Validation::Failure(errors) => {
                Err(ConfigError::Invalid(errors.iter().cloned().collect()))
            }
        }
    }

    /// Check every rule, accumulating ALL violations.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigViolation>> {
        let checks = vec![
            check_delay("transition_delay_ms", self.transition_delay()),
            check_delay("start_delay_ms", self.start_delay()),
            check_unit("white", self.overlay.white),
            check_unit("opacity", self.overlay.opacity),
            if self.history_limit == Some(0) {
                Validation::fail(ConfigViolation::EmptyHistoryLimit)
            } else {
                Validation::success(())
            },
        ];

        Validation::all_vec(checks).map(|_| ())
    }
}

fn check_delay(
    field: &'static str,
    found: Duration,
) -> Validation<(), NonEmptyVec<ConfigViolation>> {
    if found > MAX_DELAY {
        Validation::fail(ConfigViolation::DelayTooLong {
            field,
            found,
            max: MAX_DELAY,
        })
    } else {
        Validation::success(())
    }
}

fn check_unit(field: &'static str, found: f32) -> Validation<(), NonEmptyVec<ConfigViolation>> {
    if (0.0..=1.0).contains(&found) {
        Validation::success(())
    } else {
        Validation::fail(ConfigViolation::OverlayOutOfRange { field, found })
    }
}
