use super::Point2;

/// Returns the minimum distance from `p` to the segment from `a` to `b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let d = b - a;
    let len_sq = d.norm_squared();

    if len_sq < 1e-20 {
        // Degenerate segment (zero length).
        return (p - a).norm();
    }

    // Project point onto the infinite line, clamp to [0, 1].
    let t = ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    (p - (a + d * t)).norm()
}

/// Signed distance of `p` from the line through `a` and `b`.
///
/// Positive when `p` lies to the left of `a → b`. Returns the plain distance
/// to `a` (always non-negative) when `a` and `b` coincide.
#[must_use]
pub fn signed_line_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let d = b - a;
    let len = d.norm();
    if len < 1e-20 {
        return (p - a).norm();
    }
    super::z_cross(&d, &(p - a)) / len
}
