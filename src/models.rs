//! Geometric models fitted by the bundled estimators.
//!
//! Both models use the Hessian normal form `n · p = d` with a unit normal.
//! The normal's sign is fixed so that its largest-magnitude component is
//! positive, which makes fits comparable regardless of point order.

use nalgebra::{DMatrix, Matrix2, Point2, Point3, Vector2, Vector3};

use crate::core::ModelValidity;

/// Relative length below which a sample is treated as degenerate.
const DEGENERATE_EPS: f64 = 1e-10;

/// `true` when a squared length is negligible next to a squared reference
/// length, independent of the data's scale.
fn is_negligible(length_sq: f64, reference_sq: f64) -> bool {
    !(length_sq > DEGENERATE_EPS * DEGENERATE_EPS * reference_sq)
}

fn is_usable_normal(norm_sq: f64) -> bool {
    norm_sq > 0.0 && norm_sq.is_finite()
}

/// 2D line `normal · p = distance`.
#[derive(Clone, Debug, PartialEq)]
pub struct Line2 {
    pub normal: Vector2<f64>,
    pub distance: f64,
}

impl Line2 {
    /// Line from a (not necessarily unit) normal and a point on the line.
    ///
    /// A vanishing normal yields the degenerate line.
    pub fn from_normal_and_point(normal: Vector2<f64>, point: &Point2<f64>) -> Self {
        let norm_sq = normal.norm_squared();
        if !is_usable_normal(norm_sq) {
            return Self::degenerate();
        }
        let mut normal = normal / norm_sq.sqrt();
        if normal[normal.iamax()] < 0.0 {
            normal = -normal;
        }
        Self {
            distance: normal.dot(&point.coords),
            normal,
        }
    }

    /// Line through two points; degenerate when they (nearly) coincide
    /// relative to their distance from the origin.
    pub fn through(a: &Point2<f64>, b: &Point2<f64>) -> Self {
        let dir = b - a;
        let scale_sq = a.coords.norm_squared().max(b.coords.norm_squared());
        if is_negligible(dir.norm_squared(), scale_sq) {
            return Self::degenerate();
        }
        Self::from_normal_and_point(Vector2::new(-dir.y, dir.x), a)
    }

    /// Placeholder for a sample that does not define a line.
    pub fn degenerate() -> Self {
        Self {
            normal: Vector2::zeros(),
            distance: 0.0,
        }
    }

    /// Signed distance of `p` from the line.
    pub fn signed_distance(&self, p: &Point2<f64>) -> f64 {
        self.normal.dot(&p.coords) - self.distance
    }

    /// Perpendicular distance of `p` from the line.
    pub fn distance_to(&self, p: &Point2<f64>) -> f64 {
        self.signed_distance(p).abs()
    }

    /// Total least-squares line through `points`.
    ///
    /// The normal is the eigenvector of the scatter matrix with the smallest
    /// eigenvalue. Returns `None` for fewer than two distinct points.
    pub fn fit_least_squares(points: &[Point2<f64>]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }

        let centroid = points.iter().fold(Vector2::zeros(), |acc, p| acc + p.coords)
            / points.len() as f64;
        let scatter = points.iter().fold(Matrix2::zeros(), |acc, p| {
            let d = p.coords - centroid;
            acc + d * d.transpose()
        });

        let scale_sq: f64 = points.iter().map(|p| p.coords.norm_squared()).sum();
        let eig = scatter.symmetric_eigen();
        if is_negligible(eig.eigenvalues.max(), scale_sq) {
            return None;
        }
        let normal = eig.eigenvectors.column(eig.eigenvalues.imin()).into_owned();
        let line = Self::from_normal_and_point(normal, &Point2::from(centroid));
        line.is_valid().then_some(line)
    }
}

impl ModelValidity for Line2 {
    fn is_valid(&self) -> bool {
        (self.normal.norm_squared() - 1.0).abs() < 1e-6 && self.distance.is_finite()
    }
}

/// 3D plane `normal · p = distance`.
#[derive(Clone, Debug, PartialEq)]
pub struct Plane3 {
    pub normal: Vector3<f64>,
    pub distance: f64,
}

impl Plane3 {
    /// Plane from a (not necessarily unit) normal and a point on the plane.
    pub fn from_normal_and_point(normal: Vector3<f64>, point: &Point3<f64>) -> Self {
        let norm_sq = normal.norm_squared();
        if !is_usable_normal(norm_sq) {
            return Self::degenerate();
        }
        let mut normal = normal / norm_sq.sqrt();
        if normal[normal.iamax()] < 0.0 {
            normal = -normal;
        }
        Self {
            distance: normal.dot(&point.coords),
            normal,
        }
    }

    /// Plane through three points; degenerate for (nearly) collinear points.
    ///
    /// Collinearity is judged by the angle between the two edges, so the
    /// spacing of the points does not matter.
    pub fn through(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Self {
        let (ab, ac) = (b - a, c - a);
        let normal = ab.cross(&ac);
        if is_negligible(normal.norm_squared(), ab.norm_squared() * ac.norm_squared()) {
            return Self::degenerate();
        }
        Self::from_normal_and_point(normal, a)
    }

    pub fn degenerate() -> Self {
        Self {
            normal: Vector3::zeros(),
            distance: 0.0,
        }
    }

    pub fn signed_distance(&self, p: &Point3<f64>) -> f64 {
        self.normal.dot(&p.coords) - self.distance
    }

    pub fn distance_to(&self, p: &Point3<f64>) -> f64 {
        self.signed_distance(p).abs()
    }

    /// Least-squares plane through `points` via SVD of the centered points.
    ///
    /// Returns `None` for fewer than three points or when the points do not
    /// span a plane.
    pub fn fit_least_squares(points: &[Point3<f64>]) -> Option<Self> {
        if points.len() < 3 {
            return None;
        }

        let centroid = points.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords)
            / points.len() as f64;
        let centered = DMatrix::from_fn(points.len(), 3, |r, c| points[r][c] - centroid[c]);

        let svd = centered.svd(false, true);
        let v_t = svd.v_t?;
        let singular = &svd.singular_values;

        let smallest = singular.imin();
        let mut sorted: Vec<f64> = singular.iter().copied().collect();
        sorted.sort_by(f64::total_cmp);
        // The two largest directions must both carry spread.
        if is_negligible(sorted[1] * sorted[1], sorted[2] * sorted[2]) {
            return None;
        }

        let normal = Vector3::new(
            v_t[(smallest, 0)],
            v_t[(smallest, 1)],
            v_t[(smallest, 2)],
        );
        let plane = Self::from_normal_and_point(normal, &Point3::from(centroid));
        plane.is_valid().then_some(plane)
    }
}

impl ModelValidity for Plane3 {
    fn is_valid(&self) -> bool {
        (self.normal.norm_squared() - 1.0).abs() < 1e-6 && self.distance.is_finite()
    }
}
