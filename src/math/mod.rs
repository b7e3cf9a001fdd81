pub mod distance_2d;
pub mod intersect_2d;
pub mod segment_2d;

pub use segment_2d::Segment2;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Default geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Z component of the 3D cross product of two planar vectors.
///
/// Positive when `b` is counter-clockwise from `a`.
#[must_use]
pub fn z_cross(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}
