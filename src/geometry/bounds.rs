use crate::math::{Point2, Segment2};

/// Axis-aligned area a grown region must stay within, boundary included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingRect {
    pub origin: Point2,
    pub width: f64,
    pub height: f64,
}

impl BoundingRect {
    #[must_use]
    pub fn new(origin: Point2, width: f64, height: f64) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    #[must_use]
    pub fn contains_point(&self, p: &Point2) -> bool {
        p.x >= self.origin.x
            && p.y >= self.origin.y
            && p.x <= self.origin.x + self.width
            && p.y <= self.origin.y + self.height
    }

    /// Returns `true` if both endpoints of `segment` are inside.
    #[must_use]
    pub fn contains_segment(&self, segment: &Segment2) -> bool {
        self.contains_point(&segment.first) && self.contains_point(&segment.second)
    }
}
