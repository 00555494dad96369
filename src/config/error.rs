//! Configuration error types.

use std::time::Duration;
use thiserror::Error;

/// A single problem found while validating a [`TourConfig`](super::TourConfig).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigViolation {
    #[error("{field} ({found:?}) exceeds the maximum delay ({max:?})")]
    DelayTooLong {
        field: &'static str,
        found: Duration,
        max: Duration,
    },

    #[error("overlay {field} must be within 0.0..=1.0 (found {found})")]
    OverlayOutOfRange { field: &'static str, found: f32 },

    #[error("history_limit must be greater than zero")]
    EmptyHistoryLimit,
}

/// Errors that can occur when loading a tour configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed
    #[error("Failed to parse tour config: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration parsed but broke one or more rules
    #[error("Invalid tour config: {}", summarize(.0))]
    Invalid(Vec<ConfigViolation>),
}

fn summarize(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
