//! Iteration-budget math shared by RANSAC and PROSAC.
//!
//! The number of minimal samples needed so that, with probability `p`, at
//! least one of them is outlier-free follows the standard formula
//! `k = log(1 - p) / log(1 - (1 - ε)^m)` for outlier ratio `ε` and minimal
//! sample size `m`.

use log::trace;

/// Evaluate the iteration bound without any clamping.
///
/// Returns `None` when the formula is not usable (non-finite or negative),
/// which happens for degenerate inputs such as `ε → 1` or `p → 1`, and for
/// sample sizes beyond `i32::MAX`. The fractional part is truncated.
pub fn raw_iteration_bound(
    expected_outlier_ratio: f64,
    probability: f64,
    sample_size: usize,
) -> Option<usize> {
    let exponent = i32::try_from(sample_size).ok()?;
    let p_good_sample = (1.0 - expected_outlier_ratio).powi(exponent);
    let bound = (1.0 - probability).ln() / (1.0 - p_good_sample).ln();
    if !bound.is_finite() || bound < 0.0 {
        return None;
    }
    Some(bound as usize)
}

/// Number of iterations needed to draw an outlier-free minimal sample of
/// `sample_size` points with the given probability.
///
/// Degenerate inputs yield the minimum of a single iteration.
///
/// ```
/// use robust_estimation::iteration_bound;
///
/// assert_eq!(iteration_bound(0.5, 0.99, 2), 16);
/// ```
pub fn iteration_bound(expected_outlier_ratio: f64, probability: f64, sample_size: usize) -> usize {
    match raw_iteration_bound(expected_outlier_ratio, probability, sample_size) {
        Some(bound) if bound > 0 => bound,
        other => {
            trace!(
                "iteration bound for outlier ratio {expected_outlier_ratio}, probability \
                 {probability}, sample size {sample_size} is {other:?}; using 1"
            );
            1
        }
    }
}

/// RANSAC-style termination criterion that tightens the iteration budget
/// from the best inlier ratio seen so far.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RansacTerminationCriterion {
    /// Desired confidence in \[0, 1\).
    pub confidence: f64,
}

impl RansacTerminationCriterion {
    pub fn new(confidence: f64) -> Self {
        Self { confidence }
    }

    /// Shrink `max_iterations` to the bound implied by `inlier_count` out of
    /// `point_count` points.
    ///
    /// The budget never grows, and an unusable bound leaves it untouched.
    /// Returns `true` when the budget was reduced.
    pub fn check(
        &self,
        inlier_count: usize,
        point_count: usize,
        sample_size: usize,
        max_iterations: &mut usize,
    ) -> bool {
        if point_count == 0 {
            return false;
        }
        let outlier_ratio = 1.0 - inlier_count as f64 / point_count as f64;
        match raw_iteration_bound(outlier_ratio, self.confidence, sample_size) {
            Some(required) if required < *max_iterations => {
                *max_iterations = required;
                true
            }
            _ => false,
        }
    }
}
