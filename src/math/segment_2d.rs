use super::intersect_2d::{line_line_intersect_2d, segments_cross_properly, segments_intersect};
use super::{z_cross, Point2, Vector2};

/// A directed segment from `first` to `second`.
///
/// Polygon edges are segments oriented along the vertex ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment2 {
    pub first: Point2,
    pub second: Point2,
}

impl Segment2 {
    /// Creates a new segment.
    #[must_use]
    pub fn new(first: Point2, second: Point2) -> Self {
        Self { first, second }
    }

    /// Returns the vector from `first` to `second`.
    #[must_use]
    pub fn to_vector(&self) -> Vector2 {
        self.second - self.first
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.to_vector().norm()
    }

    /// Returns `true` if the segment is shorter than `eps`.
    #[must_use]
    pub fn is_degenerate(&self, eps: f64) -> bool {
        self.length() <= eps
    }

    /// Returns `true` if both segments have the same slope within `eps`.
    ///
    /// Compares unit directions through their cross product, which stays
    /// well-behaved for vertical segments. Degenerate segments have no slope
    /// and are never parallel to anything.
    #[must_use]
    pub fn is_parallel_to(&self, other: &Segment2, eps: f64) -> bool {
        if self.is_degenerate(eps) || other.is_degenerate(eps) {
            return false;
        }
        let a = self.to_vector().normalize();
        let b = other.to_vector().normalize();
        z_cross(&a, &b).abs() <= eps
    }

    /// Unit normal obtained by rotating the segment direction 90° counter-clockwise.
    ///
    /// Returns `None` for degenerate segments.
    #[must_use]
    pub fn left_normal(&self, eps: f64) -> Option<Vector2> {
        let v = self.to_vector();
        Vector2::new(-v.y, v.x).try_normalize(eps)
    }

    /// Returns `true` if the closed segments share at least one point.
    #[must_use]
    pub fn intersects(&self, other: &Segment2, eps: f64) -> bool {
        segments_intersect(&self.first, &self.second, &other.first, &other.second, eps)
    }

    /// Returns `true` if the segments cross at a point interior to both.
    #[must_use]
    pub fn crosses(&self, other: &Segment2, eps: f64) -> bool {
        segments_cross_properly(&self.first, &self.second, &other.first, &other.second, eps)
    }

    /// Intersection point of the infinite lines through both segments, or
    /// `None` if they are parallel within `eps`.
    #[must_use]
    pub fn line_intersection(&self, other: &Segment2, eps: f64) -> Option<Point2> {
        let d = self.to_vector();
        let (t, _) =
            line_line_intersect_2d(&self.first, &d, &other.first, &other.to_vector(), eps)?;
        Some(self.first + d * t)
    }
}
