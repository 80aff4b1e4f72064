//! High-level fitting functions for lines and planes.
//!
//! These wrap [`RobustEstimator`] with the bundled estimators and an
//! optional least-squares refit over the final inlier set.

use log::debug;
use nalgebra::{Point2, Point3};

use crate::core::{Consensus, EstimationResult, Estimator, ModelValidity, RobustEstimator};
use crate::error::EstimationError;
use crate::estimators::{LineEstimator, PlaneEstimator};
use crate::models::{Line2, Plane3};
use crate::settings::FitSettings;

/// Robustly fit a 2D line with RANSAC.
///
/// # Arguments
/// * `points` - Candidate points, possibly containing outliers
/// * `settings` - Inlier threshold, iteration limit, refinement and seed
///
/// # Returns
/// `EstimationResult` with the line, its inliers and the iterations used.
pub fn fit_line_ransac(
    points: &[Point2<f64>],
    settings: &FitSettings,
) -> Result<EstimationResult<Line2>, EstimationError> {
    fit(LineEstimator, points, None, settings)
}

/// Robustly fit a 2D line with PROSAC; `qualities[i]` ranks `points[i]`,
/// higher meaning more likely an inlier.
pub fn fit_line_prosac(
    points: &[Point2<f64>],
    qualities: &[f64],
    settings: &FitSettings,
) -> Result<EstimationResult<Line2>, EstimationError> {
    fit(LineEstimator, points, Some(qualities), settings)
}

/// Robustly fit a 3D plane with RANSAC.
pub fn fit_plane_ransac(
    points: &[Point3<f64>],
    settings: &FitSettings,
) -> Result<EstimationResult<Plane3>, EstimationError> {
    fit(PlaneEstimator, points, None, settings)
}

/// Robustly fit a 3D plane with PROSAC.
pub fn fit_plane_prosac(
    points: &[Point3<f64>],
    qualities: &[f64],
    settings: &FitSettings,
) -> Result<EstimationResult<Plane3>, EstimationError> {
    fit(PlaneEstimator, points, Some(qualities), settings)
}

fn fit<E: Estimator>(
    estimator: E,
    points: &[E::Datum],
    qualities: Option<&[f64]>,
    settings: &FitSettings,
) -> Result<EstimationResult<E::Model>, EstimationError> {
    let robust = RobustEstimator::with_settings(estimator, settings.consensus.clone());
    let mut result = match qualities {
        Some(qualities) => robust.prosac(points, qualities, settings.max_error, settings.limit)?,
        None => robust.ransac(points, settings.max_error, settings.limit)?,
    };

    if settings.refine {
        refine_on_inliers(&robust.estimator, points, settings.max_error, &mut result);
    }
    Ok(result)
}

/// Refit the model from all of its inliers (a non-minimal sample) and keep
/// the refit if it explains at least as many points.
pub fn refine_on_inliers<E: Estimator>(
    estimator: &E,
    points: &[E::Datum],
    max_error: f64,
    result: &mut EstimationResult<E::Model>,
) {
    if !result.model.is_found() || result.inliers.len() <= estimator.sample_size() {
        return;
    }

    let support: Vec<E::Datum> = result.inliers.iter().map(|&i| points[i].clone()).collect();
    let refined = estimator.estimate_model(&support);
    if !refined.is_valid() {
        return;
    }

    let inliers: Vec<usize> = (0..points.len())
        .filter(|&i| estimator.residual(&points[i], &refined) < max_error)
        .collect();
    if inliers.len() < result.inliers.len() {
        return;
    }

    debug!(
        "least-squares refit: {} -> {} inliers",
        result.inliers.len(),
        inliers.len()
    );
    result.model = Consensus::Found(refined);
    result.inliers = inliers;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::IterationLimit;
    use approx::assert_relative_eq;

    fn seeded(max_error: f64) -> FitSettings {
        let mut settings = FitSettings::with_max_error(max_error);
        settings.consensus.seed = Some(5);
        settings
    }

    #[test]
    fn refit_keeps_every_inlier_of_a_noisy_line() {
        let mut points: Vec<Point2<f64>> = (0..20)
            .map(|i| {
                let x = i as f64;
                let noise = if i % 2 == 0 { 0.01 } else { -0.01 };
                Point2::new(x, 0.5 * x + 1.0 + noise)
            })
            .collect();
        points.push(Point2::new(3.0, 40.0));
        points.push(Point2::new(-8.0, -30.0));

        let result = fit_line_ransac(&points, &seeded(0.5)).unwrap();
        let line = result.model.model().unwrap();

        assert_eq!(result.inliers, (0..20).collect::<Vec<_>>());
        // Direction (2, 1) / sqrt(5) has normal (-1, 2) / sqrt(5).
        let expected = nalgebra::Vector2::new(-1.0, 2.0).normalize();
        assert_relative_eq!(line.normal, expected, epsilon = 1e-3);
    }

    #[test]
    fn refine_can_be_disabled() {
        let points = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(1.0, 9.0),
        ];
        let mut settings = seeded(0.1);
        settings.refine = false;
        settings.limit = IterationLimit::Fixed(30);

        let result = fit_line_ransac(&points, &settings).unwrap();
        assert_eq!(result.inliers, vec![0, 1, 2]);
    }

    #[test]
    fn plane_fit_rejects_points_off_the_plane() {
        let mut points = Vec::new();
        for i in 0..6 {
            for j in 0..6 {
                points.push(Point3::new(i as f64, j as f64, 2.0));
            }
        }
        points.push(Point3::new(1.0, 1.0, 9.0));
        points.push(Point3::new(4.0, 2.0, -7.0));

        let result = fit_plane_ransac(&points, &seeded(0.1)).unwrap();
        let plane = result.model.model().unwrap();

        assert_eq!(result.inliers.len(), 36);
        assert!(!result.inliers.contains(&36));
        assert!(!result.inliers.contains(&37));
        assert_relative_eq!(plane.normal, nalgebra::Vector3::z(), epsilon = 1e-9);
        assert_relative_eq!(plane.distance, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn plane_fit_works_at_micrometre_spacing() {
        let mut points = Vec::new();
        for i in 0..6 {
            for j in 0..6 {
                points.push(Point3::new(i as f64 * 1e-6, j as f64 * 1e-6, 2e-6));
            }
        }
        points.push(Point3::new(1e-6, 1e-6, 1e-3));

        let mut settings = seeded(1e-8);
        settings.limit = IterationLimit::Fixed(200);
        let result = fit_plane_ransac(&points, &settings).unwrap();
        let plane = result.model.model().unwrap();

        assert_eq!(result.inliers, (0..36).collect::<Vec<_>>());
        assert_relative_eq!(plane.normal, nalgebra::Vector3::z(), epsilon = 1e-6);
        assert_relative_eq!(plane.distance, 2e-6, epsilon = 1e-12);
    }

    #[test]
    fn prosac_plane_fit_uses_quality_ranking() {
        // Two low-quality outliers, then points on the plane z = x.
        let mut points = vec![
            Point3::new(0.0, 0.0, 50.0),
            Point3::new(3.0, 3.0, -50.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 4.0),
            Point3::new(0.0, 4.0, 0.0),
        ];
        for i in 0..5 {
            for j in 0..5 {
                points.push(Point3::new(i as f64, j as f64, i as f64));
            }
        }
        let mut qualities = vec![1.0; points.len()];
        qualities[0] = 0.0;
        qualities[1] = 0.0;

        let result = fit_plane_prosac(&points, &qualities, &seeded(0.1)).unwrap();
        assert_eq!(result.inliers, (2..30).collect::<Vec<_>>());
    }

    #[test]
    fn fitting_reports_argument_errors() {
        let err = fit_plane_ransac(&[Point3::origin(), Point3::origin()], &seeded(0.1)).unwrap_err();
        assert_eq!(
            err,
            EstimationError::NotEnoughSamples {
                required: 3,
                provided: 2
            }
        );

        let err = fit_line_prosac(&[Point2::origin(); 4], &[1.0; 3], &seeded(0.1)).unwrap_err();
        assert!(matches!(err, EstimationError::QualityLengthMismatch { .. }));
    }
}
