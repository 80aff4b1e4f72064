//! Example: Robust line fitting with RANSAC and PROSAC
//!
//! Run with `RUST_LOG=debug` to follow the budget updates.

use nalgebra::Point2;
use rand::Rng;
use rand::seq::SliceRandom;
use robust_estimation::{FitSettings, IterationLimit, fit_line_prosac, fit_line_ransac};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("=== Robust Line Fitting Example ===\n");

    let n_inliers = 60;
    let n_outliers = 25;

    let mut rng = rand::thread_rng();

    // True line parameters: y = mx + b
    let true_slope = 2.0;
    let true_intercept = 1.0;

    println!("True line: y = {:.2}x + {:.2}", true_slope, true_intercept);
    println!(
        "Generating {} inliers and {} outliers\n",
        n_inliers, n_outliers
    );

    // Each point carries a quality score; inliers tend to score higher,
    // the way a feature matcher's confidence would.
    let mut samples: Vec<(Point2<f64>, f64)> = Vec::new();
    for i in 0..n_inliers {
        let x = (i as f64) * 0.2 - 6.0;
        let y = true_slope * x + true_intercept + rng.gen_range(-0.3..0.3);
        samples.push((Point2::new(x, y), rng.gen_range(0.4..1.0)));
    }
    for _ in 0..n_outliers {
        let x = rng.gen_range(-10.0..10.0);
        let y = rng.gen_range(-20.0..20.0);
        samples.push((Point2::new(x, y), rng.gen_range(0.0..0.6)));
    }
    samples.shuffle(&mut rng);

    let points: Vec<Point2<f64>> = samples.iter().map(|(p, _)| *p).collect();
    let qualities: Vec<f64> = samples.iter().map(|(_, q)| *q).collect();

    let settings = FitSettings {
        max_error: 0.5,
        limit: IterationLimit::Adaptive {
            expected_outlier_ratio: 0.5,
            probability: 0.99,
        },
        ..FitSettings::default()
    };

    let ransac = fit_line_ransac(&points, &settings)?;
    let prosac = fit_line_prosac(&points, &qualities, &settings)?;

    for (name, result) in [("RANSAC", &ransac), ("PROSAC", &prosac)] {
        println!("{name} Results:");
        match result.model.model() {
            Some(line) if line.normal.y.abs() > 1e-12 => {
                let slope = -line.normal.x / line.normal.y;
                let intercept = line.distance / line.normal.y;
                println!("  Estimated line: y = {:.2}x + {:.2}", slope, intercept);
            }
            Some(line) => println!("  Estimated line: x = {:.2}", line.distance / line.normal.x),
            None => println!("  No model found"),
        }
        println!(
            "  Inliers: {} / {} ({:.1}%)",
            result.inliers.len(),
            result.point_count,
            result.inlier_ratio() * 100.0
        );
        println!("  Iterations: {}\n", result.iterations);
    }

    Ok(())
}
