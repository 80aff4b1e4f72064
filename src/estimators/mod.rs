//! Estimators for geometric models.
//!
//! - [`LineEstimator`]: 2D lines from two points.
//! - [`PlaneEstimator`]: 3D planes from three points.

pub mod line;
pub mod plane;

pub use line::LineEstimator;
pub use plane::PlaneEstimator;
