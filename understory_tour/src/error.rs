// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors surfaced to integrators.

use thiserror::Error;

/// Errors returned by tour entry points.
///
/// Unresolved targets, lost targets, and vetoed transitions are not errors; they show up as
/// [`Status`](crate::Status) changes and [`Navigated`](crate::Navigated) outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TourError {
    /// There is no step at `index`.
    #[error("there is no step {index} to start from ({len} steps)")]
    InvalidStep {
        /// Requested index.
        index: usize,
        /// Number of configured steps.
        len: usize,
    },
    /// A step is malformed.
    #[error("step {step}: {reason}")]
    Configuration {
        /// Index of the offending step.
        step: usize,
        /// What is wrong with it.
        reason: &'static str,
    },
    /// The tour was destroyed and released its subscriptions.
    #[error("tour has been destroyed")]
    Destroyed,
}

/// Result alias for tour operations.
pub type Result<T> = core::result::Result<T, TourError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_step() {
        let err = TourError::Configuration {
            step: 3,
            reason: "a target is required",
        };
        assert_eq!(err.to_string(), "step 3: a target is required");
        let err = TourError::InvalidStep { index: 4, len: 2 };
        assert_eq!(
            err.to_string(),
            "there is no step 4 to start from (2 steps)"
        );
    }
}
