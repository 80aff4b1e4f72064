//! Configuration types for the consensus estimators and the fitting API.

use serde::{Deserialize, Serialize};

/// Default number of trials after which PROSAC's sampling pool would cover
/// the whole dataset (`T_N` in the PROSAC paper).
pub const DEFAULT_PROSAC_CONVERGENCE_TRIALS: usize = 200_000;

/// Settings shared by every run of a [`RobustEstimator`](crate::core::RobustEstimator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusSettings {
    /// Confidence used to shrink the budget when the caller passes an
    /// explicit iteration count.
    pub confidence: f64,
    /// Fixed RNG seed. `None` seeds every run from entropy.
    pub seed: Option<u64>,
    /// Growth-schedule horizon of the PROSAC sampler.
    pub prosac_convergence_trials: usize,
}

impl Default for ConsensusSettings {
    fn default() -> Self {
        Self {
            confidence: 0.99,
            seed: None,
            prosac_convergence_trials: DEFAULT_PROSAC_CONVERGENCE_TRIALS,
        }
    }
}

/// How many minimal samples a run may draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IterationLimit {
    /// Explicit upper bound on the number of iterations.
    Fixed(usize),
    /// Bound derived from an expected outlier ratio and a target probability.
    Adaptive {
        expected_outlier_ratio: f64,
        probability: f64,
    },
}

impl Default for IterationLimit {
    fn default() -> Self {
        Self::Adaptive {
            expected_outlier_ratio: 0.5,
            probability: 0.99,
        }
    }
}

/// Settings for the high-level line and plane fitting functions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitSettings {
    /// Points with a residual strictly below this value are inliers.
    pub max_error: f64,
    pub limit: IterationLimit,
    /// Refit the winning model by least squares over its inliers.
    pub refine: bool,
    pub consensus: ConsensusSettings,
}

impl Default for FitSettings {
    fn default() -> Self {
        Self {
            max_error: 1.0,
            limit: IterationLimit::default(),
            refine: true,
            consensus: ConsensusSettings::default(),
        }
    }
}

impl FitSettings {
    /// Default settings with the given inlier threshold.
    pub fn with_max_error(max_error: f64) -> Self {
        Self {
            max_error,
            ..Self::default()
        }
    }
}
