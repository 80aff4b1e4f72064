//! Integration tests for the consensus estimators.
//!
//! These run both modes end to end on small synthetic datasets with fixed
//! seeds.

use nalgebra::{Point2, Vector2};
use robust_estimation::*;

/// Line model used through the closure-based API.
#[derive(Clone, Debug)]
struct TestLine {
    normal: Vector2<f64>,
    offset: f64,
    valid: bool,
}

impl ModelValidity for TestLine {
    fn is_valid(&self) -> bool {
        self.valid
    }
}

fn line_through(sample: &[Point2<f64>]) -> TestLine {
    let dir = sample[1] - sample[0];
    let normal = Vector2::new(-dir.y, dir.x);
    let norm = normal.norm();
    if norm < 1e-12 {
        return TestLine {
            normal: Vector2::zeros(),
            offset: 0.0,
            valid: false,
        };
    }
    let normal = normal / norm;
    TestLine {
        offset: normal.dot(&sample[0].coords),
        normal,
        valid: true,
    }
}

fn perpendicular_distance(p: &Point2<f64>, line: &TestLine) -> f64 {
    assert!(line.valid, "residual evaluated against an invalid model");
    (line.normal.dot(&p.coords) - line.offset).abs()
}

fn line_estimator(seed: u64) -> RobustEstimator<impl Estimator<Datum = Point2<f64>, Model = TestLine>> {
    RobustEstimator::from_fns(2, line_through, perpendicular_distance).with_seed(seed)
}

fn diagonal_with_outlier() -> Vec<Point2<f64>> {
    vec![
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 1.0),
        Point2::new(2.0, 2.0),
        Point2::new(3.0, 3.0),
        Point2::new(100.0, -100.0),
    ]
}

/// 40 points on y = 2x - 1 followed by 20 scattered outliers.
fn contaminated_line() -> Vec<Point2<f64>> {
    let mut points: Vec<Point2<f64>> = (0..40)
        .map(|i| {
            let x = i as f64 * 0.5;
            Point2::new(x, 2.0 * x - 1.0)
        })
        .collect();
    for k in 0..20 {
        let x = (k * 7 % 20) as f64;
        let y = 60.0 - (k * 13 % 50) as f64 * 3.0;
        points.push(Point2::new(x, y + 25.0));
    }
    points
}

fn assert_valid_inlier_set(inliers: &[usize], n: usize) {
    assert!(inliers.iter().all(|&i| i < n));
    for w in inliers.windows(2) {
        assert!(w[0] < w[1], "inliers must be ascending and unique: {inliers:?}");
    }
}

#[test]
fn test_ransac_recovers_diagonal_line() {
    let data = diagonal_with_outlier();
    let result = line_estimator(1).solve_ransac(&data, 0.5, 100).unwrap();

    assert!(result.model.is_found());
    assert_eq!(result.inliers, vec![0, 1, 2, 3]);

    let line = result.model.model().unwrap();
    assert!(perpendicular_distance(&Point2::new(10.0, 10.0), line) < 1e-9);
}

#[test]
fn test_ransac_adaptive_recovers_diagonal_line() {
    let data = diagonal_with_outlier();
    let result = line_estimator(2)
        .solve_ransac_adaptive(&data, 0.5, 0.5, 0.99)
        .unwrap();

    assert_eq!(result.inliers, vec![0, 1, 2, 3]);
    assert!(result.iterations <= iteration_bound(0.5, 0.99, 2));
}

#[test]
fn test_prosac_recovers_diagonal_line() {
    let data = diagonal_with_outlier();
    let qualities = [0.9, 0.8, 0.7, 0.6, 0.1];
    let result = line_estimator(3)
        .solve_prosac_adaptive(&data, &qualities, 0.5, 0.5, 0.99)
        .unwrap();

    assert_eq!(result.inliers, vec![0, 1, 2, 3]);
}

#[test]
fn test_prosac_with_outlier_ranked_last_among_many_points() {
    let data = contaminated_line();
    // Inliers get high quality, outliers low quality.
    let qualities: Vec<f64> = (0..data.len())
        .map(|i| if i < 40 { 1.0 - i as f64 * 0.001 } else { 0.1 })
        .collect();

    let result = line_estimator(4)
        .solve_prosac(&data, &qualities, 0.1, 200)
        .unwrap();

    assert_eq!(result.inliers, (0..40).collect::<Vec<_>>());
}

#[test]
fn test_not_enough_samples_boundary() {
    let single = [Point2::new(0.0, 0.0)];
    let err = line_estimator(5).solve_ransac(&single, 0.5, 10).unwrap_err();
    assert_eq!(
        err,
        EstimationError::NotEnoughSamples {
            required: 2,
            provided: 1
        }
    );

    let err = line_estimator(5)
        .solve_prosac(&single, &[1.0], 0.5, 10)
        .unwrap_err();
    assert!(matches!(err, EstimationError::NotEnoughSamples { .. }));

    let pair = [Point2::new(0.0, 0.0), Point2::new(1.0, 2.0)];
    let result = line_estimator(5).solve_ransac(&pair, 0.5, 10).unwrap();
    assert_eq!(result.inliers, vec![0, 1]);

    let result = line_estimator(5)
        .solve_prosac(&pair, &[0.3, 0.7], 0.5, 10)
        .unwrap();
    assert_eq!(result.inliers, vec![0, 1]);
}

#[test]
fn test_quality_length_mismatch_is_checked_before_sampling() {
    let data = diagonal_with_outlier();
    let err = line_estimator(6)
        .solve_prosac(&data, &[1.0; 4], 0.5, 10)
        .unwrap_err();
    assert_eq!(
        err,
        EstimationError::QualityLengthMismatch {
            expected: 5,
            provided: 4
        }
    );
}

#[test]
fn test_degenerate_dataset_returns_no_model() {
    let data = [Point2::new(1.0, 1.0), Point2::new(1.0, 1.0)];

    let result = line_estimator(7).solve_ransac(&data, 0.5, 25).unwrap();
    assert_eq!(result.iterations, 25);
    assert!(matches!(result.model, Consensus::NoModel));
    assert!(result.inliers.is_empty());

    let result = line_estimator(7)
        .solve_prosac(&data, &[1.0, 1.0], 0.5, 25)
        .unwrap();
    assert_eq!(result.iterations, 25);
    assert!(!result.model.is_found());
    assert!(result.inliers.is_empty());
}

#[test]
fn test_inlier_sets_are_valid_across_seeds() {
    let data = contaminated_line();
    let qualities = vec![1.0; data.len()];

    for seed in 0..20 {
        let ransac = line_estimator(seed).solve_ransac(&data, 0.1, 300).unwrap();
        assert_valid_inlier_set(&ransac.inliers, data.len());

        let prosac = line_estimator(seed)
            .solve_prosac(&data, &qualities, 0.1, 300)
            .unwrap();
        assert_valid_inlier_set(&prosac.inliers, data.len());
    }
}

#[test]
fn test_equal_qualities_match_ransac_consensus() {
    let data = contaminated_line();
    let qualities = vec![0.5; data.len()];

    for seed in 0..10 {
        let ransac = line_estimator(seed).solve_ransac(&data, 0.1, 500).unwrap();
        let prosac = line_estimator(seed)
            .solve_prosac(&data, &qualities, 0.1, 500)
            .unwrap();

        assert_eq!(ransac.inliers, (0..40).collect::<Vec<_>>());
        assert_eq!(prosac.inliers, ransac.inliers);
    }
}

#[test]
fn test_fixed_seed_is_reproducible() {
    let data = contaminated_line();
    let a = line_estimator(99).solve_ransac(&data, 0.1, 50).unwrap();
    let b = line_estimator(99).solve_ransac(&data, 0.1, 50).unwrap();

    assert_eq!(a.inliers, b.inliers);
    assert_eq!(a.iterations, b.iterations);
}

#[test]
fn test_fit_line_api_matches_closure_estimator() {
    let data = diagonal_with_outlier();
    let mut settings = FitSettings::with_max_error(0.5);
    settings.consensus.seed = Some(8);

    let result = fit_line_ransac(&data, &settings).unwrap();
    assert_eq!(result.inliers, vec![0, 1, 2, 3]);

    let line = result.model.model().unwrap();
    assert!(line.distance_to(&Point2::new(100.0, -100.0)) > 100.0);
}

#[test]
fn test_iteration_bound_reference_value() {
    assert_eq!(iteration_bound(0.5, 0.99, 2), 16);
    assert_eq!(iteration_bound(1.0, 0.99, 2), 1);
}
