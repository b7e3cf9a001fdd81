use super::distance_2d::{point_to_segment_dist, signed_line_dist};
use super::{z_cross, Point2, Vector2};

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` unless the
/// cross product of the directions is within `eps` of zero.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point2,
    d1: &Vector2,
    p2: &Point2,
    d2: &Vector2,
    eps: f64,
) -> Option<(f64, f64)> {
    let cross = z_cross(d1, d2);
    if cross.abs() < eps {
        return None;
    }
    let dp = p2 - p1;
    let t = z_cross(&dp, d2) / cross;
    let u = z_cross(&dp, d1) / cross;
    Some((t, u))
}

/// Returns `true` if the closed segments `a0a1` and `b0b1` share at least one
/// point, endpoints and collinear overlaps included.
#[must_use]
pub fn segments_intersect(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2, eps: f64) -> bool {
    let o1 = side(signed_line_dist(b0, a0, a1), eps);
    let o2 = side(signed_line_dist(b1, a0, a1), eps);
    let o3 = side(signed_line_dist(a0, b0, b1), eps);
    let o4 = side(signed_line_dist(a1, b0, b1), eps);

    if o1 * o2 < 0 && o3 * o4 < 0 {
        return true;
    }
    // Touching or collinear configurations.
    point_to_segment_dist(b0, a0, a1) <= eps
        || point_to_segment_dist(b1, a0, a1) <= eps
        || point_to_segment_dist(a0, b0, b1) <= eps
        || point_to_segment_dist(a1, b0, b1) <= eps
}

/// Returns `true` if the segments cross at a single point interior to both.
///
/// Touching at an endpoint and collinear overlap do not count.
#[must_use]
pub fn segments_cross_properly(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
    eps: f64,
) -> bool {
    if (a1 - a0).norm() <= eps || (b1 - b0).norm() <= eps {
        return false;
    }
    let o1 = side(signed_line_dist(b0, a0, a1), eps);
    let o2 = side(signed_line_dist(b1, a0, a1), eps);
    let o3 = side(signed_line_dist(a0, b0, b1), eps);
    let o4 = side(signed_line_dist(a1, b0, b1), eps);
    o1 * o2 < 0 && o3 * o4 < 0
}

fn side(dist: f64, eps: f64) -> i8 {
    if dist > eps {
        1
    } else if dist < -eps {
        -1
    } else {
        0
    }
}
