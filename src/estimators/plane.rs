//! Plane estimator for 3D plane fitting.

use nalgebra::Point3;

use crate::core::Estimator;
use crate::models::Plane3;

/// Plane estimator: three-point minimal samples, point-to-plane distance
/// residual.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaneEstimator;

impl PlaneEstimator {
    pub fn new() -> Self {
        Self
    }
}

impl Estimator for PlaneEstimator {
    type Datum = Point3<f64>;
    type Model = Plane3;

    fn sample_size(&self) -> usize {
        3
    }

    fn estimate_model(&self, sample: &[Point3<f64>]) -> Plane3 {
        match sample {
            [a, b, c] => Plane3::through(a, b, c),
            _ => Plane3::fit_least_squares(sample).unwrap_or_else(Plane3::degenerate),
        }
    }

    fn residual(&self, datum: &Point3<f64>, model: &Plane3) -> f64 {
        model.distance_to(datum)
    }
}
