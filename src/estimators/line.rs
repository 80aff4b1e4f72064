//! Line estimator for 2D line fitting.

use nalgebra::Point2;

use crate::core::Estimator;
use crate::models::Line2;

/// Line estimator for 2D line fitting.
///
/// Minimal samples are two points; the residual is the perpendicular
/// distance to the line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineEstimator;

impl LineEstimator {
    pub fn new() -> Self {
        Self
    }
}

impl Estimator for LineEstimator {
    type Datum = Point2<f64>;
    type Model = Line2;

    fn sample_size(&self) -> usize {
        2
    }

    fn estimate_model(&self, sample: &[Point2<f64>]) -> Line2 {
        match sample {
            [a, b] => Line2::through(a, b),
            _ => Line2::fit_least_squares(sample).unwrap_or_else(Line2::degenerate),
        }
    }

    fn residual(&self, datum: &Point2<f64>, model: &Line2) -> f64 {
        model.distance_to(datum)
    }
}
