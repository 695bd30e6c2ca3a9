/// Vector aliases and the small bits of geometry the pipeline is built from
use nalgebra::{Vector2, Vector3};

/// Screen-space coordinate
pub type Vec2 = Vector2<f64>;
/// World-space coordinate
pub type Vec3 = Vector3<f64>;

/// World "up", used to derive the screen plane's horizontal axis
pub const WORLD_UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// A plane as `normal . p = offset`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub offset: f64,
}

impl Plane {
    /// Best-fit plane of a closed loop.
    ///
    /// The normal is the loop's vector area (Newell's method), so every vertex
    /// contributes and collinear leading vertices don't matter. It is not normalized:
    /// signed distances are scaled by twice the area, and only their sign and ratios
    /// matter to the callers. A degenerate loop gets a zero normal and every signed
    /// distance is zero.
    pub fn from_loop(points: &[Vec3]) -> Self {
        let normal = vector_area(points) * 2.0;
        Self {
            normal,
            offset: normal.dot(&centroid(points)),
        }
    }

    pub fn signed_distance(&self, point: &Vec3) -> f64 {
        self.normal.dot(point) - self.offset
    }

    /// Parameter `t` where `origin + direction * t` meets the plane.
    ///
    /// Infinite or NaN when the ray runs parallel to the plane.
    pub fn ray_param(&self, origin: &Vec3, direction: &Vec3) -> f64 {
        (self.offset - self.normal.dot(origin)) / self.normal.dot(direction)
    }
}

/// Locate the foot of `point` along the segment `a`-`b`.
///
/// Uses the law of cosines on the three side lengths. The result is measured from
/// `b`: 0 at `b`, 1 at `a`. Returns the parameter and whether it lies on the segment
/// (bounds inclusive).
pub fn segment_param<const D: usize>(
    a: &nalgebra::SVector<f64, D>,
    b: &nalgebra::SVector<f64, D>,
    point: &nalgebra::SVector<f64, D>,
) -> (f64, bool) {
    let a_sq = (a - point).norm_squared();
    let b_sq = (b - point).norm_squared();
    let c_sq = (a - b).norm_squared();

    let t = (b_sq - a_sq + c_sq) / (2.0 * c_sq);
    (t, (0.0..=1.0).contains(&t))
}

pub fn is_finite(v: &Vec2) -> bool {
    v.iter().all(|c| c.is_finite())
}

/// Arithmetic mean of a set of points
pub fn centroid(points: &[Vec3]) -> Vec3 {
    let sum = points.iter().fold(Vec3::zeros(), |acc, p| acc + p);
    sum / points.len() as f64
}

/// Half the sum of edge cross products: normal to a planar loop, with the loop's area
/// as its length
pub fn vector_area(points: &[Vec3]) -> Vec3 {
    let n = points.len();
    let twice_area = (0..n).fold(Vec3::zeros(), |acc, i| {
        acc + points[i].cross(&points[(i + 1) % n])
    });
    twice_area / 2.0
}

/// Area of a planar polygon loop
pub fn polygon_area(points: &[Vec3]) -> f64 {
    vector_area(points).norm()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_param_bounds_are_inclusive() {
        let a = Vec3::new(1.0, 0.0, 0.5);
        let b = Vec3::new(1.0, 0.0, -0.5);

        let (t, on_segment) = segment_param(&a, &b, &a);
        assert_eq!(t, 1.0);
        assert!(on_segment);

        let (t, on_segment) = segment_param(&a, &b, &b);
        assert_eq!(t, 0.0);
        assert!(on_segment);

        let (t, on_segment) = segment_param(&a, &b, &Vec3::new(1.0, 0.0, 0.75));
        assert!(t > 1.0);
        assert!(!on_segment);
    }

    #[test]
    fn test_segment_param_projects_off_line_points() {
        let a = Vec2::new(2.0, 0.0);
        let b = Vec2::new(0.0, 0.0);
        let (t, on_segment) = segment_param(&a, &b, &Vec2::new(0.5, 3.0));
        assert!((t - 0.25).abs() < 1e-12);
        assert!(on_segment);
    }

    #[test]
    fn test_plane_signed_distance() {
        let plane = Plane::from_loop(&[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ]);
        let above = plane.signed_distance(&Vec3::new(0.3, 0.3, 2.0));
        let below = plane.signed_distance(&Vec3::new(0.3, 0.3, -2.0));
        assert!(above > 0.0);
        assert!(below < 0.0);
        assert_eq!(plane.signed_distance(&Vec3::new(5.0, -4.0, 0.0)), 0.0);
    }

    #[test]
    fn test_plane_ignores_collinear_leading_vertices() {
        // First three vertices lie on one line
        let plane = Plane::from_loop(&[
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(2.0, 0.0, 1.0),
            Vec3::new(2.0, 2.0, 1.0),
            Vec3::new(0.0, 2.0, 1.0),
        ]);
        assert!((plane.normal.normalize() - Vec3::z()).norm() < 1e-12);
        assert!(plane.signed_distance(&Vec3::new(7.0, -3.0, 1.0)).abs() < 1e-12);
        assert!(plane.signed_distance(&Vec3::new(1.0, 1.0, 3.0)) > 0.0);
    }

    #[test]
    fn test_degenerate_loop_has_zero_normal() {
        let plane = Plane::from_loop(&[Vec3::zeros(), Vec3::x(), Vec3::x() * 2.0]);
        assert_eq!(plane.normal, Vec3::zeros());
        assert_eq!(plane.signed_distance(&Vec3::new(1.0, 5.0, 5.0)), 0.0);
    }

    #[test]
    fn test_ray_param_parallel_is_not_finite() {
        let plane = Plane::from_loop(&[
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
        ]);
        let t = plane.ray_param(&Vec3::zeros(), &Vec3::new(0.0, 0.0, 2.0));
        assert!((t - 0.5).abs() < 1e-12);
        assert!(!plane
            .ray_param(&Vec3::zeros(), &Vec3::new(1.0, 0.0, 0.0))
            .is_finite());
    }

    #[test]
    fn test_polygon_area() {
        let square = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(2.0, 2.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
        ];
        assert!((polygon_area(&square) - 4.0).abs() < 1e-12);
        assert!((centroid(&square) - Vec3::new(1.0, 1.0, 0.0)).norm() < 1e-12);
    }
}
