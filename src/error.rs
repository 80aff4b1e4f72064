//! Error type for the consensus estimators.

use thiserror::Error;

/// Argument errors raised before any sampling takes place.
///
/// Degenerate samples are not errors: they consume an iteration and the run
/// carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimationError {
    #[error("need at least {required} data points for a minimal sample, got {provided}")]
    NotEnoughSamples { required: usize, provided: usize },

    #[error("expected {expected} quality scores (one per data point), got {provided}")]
    QualityLengthMismatch { expected: usize, provided: usize },
}
