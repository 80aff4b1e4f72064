//! # robust-estimation - RANSAC and PROSAC for arbitrary models
//!
//! `robust-estimation` fits a parametric model to data contaminated by
//! outliers. The caller supplies a minimal sample size, a function building a
//! model from a minimal sample, and a per-point residual; the estimator keeps
//! the model with the largest inlier set.
//!
//! ## Quick Start
//!
//! ```rust
//! use robust_estimation::{fit_line_ransac, FitSettings};
//! use nalgebra::Point2;
//!
//! let points = [
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(2.0, 2.0),
//!     Point2::new(3.0, 3.0),
//!     Point2::new(100.0, -100.0),
//! ];
//!
//! let result = fit_line_ransac(&points, &FitSettings::with_max_error(0.5)).unwrap();
//! assert_eq!(result.inliers, vec![0, 1, 2, 3]);
//! ```
//!
//! ## Custom models
//!
//! Any model type works once it reports whether it is usable:
//!
//! ```rust
//! use robust_estimation::{ModelValidity, RobustEstimator};
//!
//! #[derive(Clone, Debug)]
//! struct Offset(f64);
//!
//! impl ModelValidity for Offset {
//!     fn is_valid(&self) -> bool {
//!         self.0.is_finite()
//!     }
//! }
//!
//! let estimator = RobustEstimator::from_fns(
//!     1,
//!     |sample: &[f64]| Offset(sample[0]),
//!     |x: &f64, model: &Offset| (x - model.0).abs(),
//! )
//! .with_seed(3);
//!
//! let data = [2.0, 2.1, 1.9, 40.0];
//! let result = estimator.solve_ransac_adaptive(&data, 0.5, 0.5, 0.99).unwrap();
//! assert_eq!(result.inliers, vec![0, 1, 2]);
//! ```
//!
//! For reusable models, implement [`Estimator`](core::Estimator) directly, as
//! the bundled [`LineEstimator`](estimators::LineEstimator) and
//! [`PlaneEstimator`](estimators::PlaneEstimator) do.
//!
//! ## Modules
//!
//! - **[`api`](api)**: Line and plane fitting functions
//! - **[`core`](core)**: Core traits and the `RobustEstimator`
//! - **[`estimators`](estimators)**: Built-in estimators for geometric models
//! - **[`samplers`](samplers)**: Uniform and PROSAC sampling strategies
//! - **[`termination`](termination)**: Iteration-bound math
//! - **[`models`](models)**: Geometric model types
//! - **[`settings`](settings)**: Configuration types

pub mod api;
pub mod core;
pub mod error;
pub mod estimators;
pub mod models;
pub mod samplers;
pub mod settings;
pub mod termination;
pub mod utils;

pub use api::{fit_line_prosac, fit_line_ransac, fit_plane_prosac, fit_plane_ransac};

pub use core::{
    BestState, Consensus, EstimationResult, Estimator, FnEstimator, ModelValidity,
    RobustEstimator, Sampler,
};

pub use error::EstimationError;
pub use models::{Line2, Plane3};
pub use settings::{ConsensusSettings, FitSettings, IterationLimit};
pub use termination::iteration_bound;
