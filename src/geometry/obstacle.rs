use crate::error::{GeometryError, Result};
use crate::math::distance_2d::point_to_segment_dist;
use crate::math::{Point2, Segment2, TOLERANCE};

/// A static 2D shape that grown regions must not overlap.
///
/// The growth engine only needs the boundary ring and strict point
/// containment; segment queries are derived from the ring.
pub trait Obstacle {
    /// Boundary vertices in ring order.
    fn vertices(&self) -> &[Point2];

    /// Returns `true` if `point` lies strictly inside the obstacle.
    ///
    /// Points within `eps` of the boundary are outside.
    fn contains(&self, point: &Point2, eps: f64) -> bool;

    /// Boundary edges, edge `i` running from vertex `i` to vertex `i + 1`.
    fn edges(&self) -> Vec<Segment2> {
        let v = self.vertices();
        (0..v.len())
            .map(|i| Segment2::new(v[i], v[(i + 1) % v.len()]))
            .collect()
    }

    /// Boundary edges sharing at least one point with `segment`.
    fn edges_crossing(&self, segment: &Segment2, eps: f64) -> Vec<Segment2> {
        self.edges()
            .into_iter()
            .filter(|e| e.intersects(segment, eps))
            .collect()
    }
}

impl<T: Obstacle + ?Sized> Obstacle for &T {
    fn vertices(&self) -> &[Point2] {
        (**self).vertices()
    }

    fn contains(&self, point: &Point2, eps: f64) -> bool {
        (**self).contains(point, eps)
    }
}

impl<T: Obstacle + ?Sized> Obstacle for Box<T> {
    fn vertices(&self) -> &[Point2] {
        (**self).vertices()
    }

    fn contains(&self, point: &Point2, eps: f64) -> bool {
        (**self).contains(point, eps)
    }
}

/// An obstacle bounded by a simple polygon, convex or not.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonObstacle {
    vertices: Vec<Point2>,
}

impl PolygonObstacle {
    /// Creates an obstacle from a simple polygon ring.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for fewer than 3 vertices or a ring
    /// enclosing no area.
    pub fn new(vertices: Vec<Point2>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(GeometryError::Degenerate(format!(
                "obstacle ring needs at least 3 vertices, got {}",
                vertices.len()
            ))
            .into());
        }
        let n = vertices.len();
        let twice_area: f64 = (0..n)
            .map(|i| {
                let a = vertices[i];
                let b = vertices[(i + 1) % n];
                a.x * b.y - b.x * a.y
            })
            .sum();
        if twice_area.abs() < TOLERANCE {
            return Err(GeometryError::Degenerate("obstacle ring has zero area".to_owned()).into());
        }
        Ok(Self { vertices })
    }
}

impl Obstacle for PolygonObstacle {
    fn vertices(&self) -> &[Point2] {
        &self.vertices
    }

    fn contains(&self, point: &Point2, eps: f64) -> bool {
        let n = self.vertices.len();
        let on_boundary = (0..n).any(|i| {
            point_to_segment_dist(point, &self.vertices[i], &self.vertices[(i + 1) % n]) <= eps
        });
        if on_boundary {
            return false;
        }
        // Even-odd ray casting towards +x.
        let mut inside = false;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            if (a.y > point.y) != (b.y > point.y) {
                let x = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if point.x < x {
                    inside = !inside;
                }
            }
        }
        inside
    }
}

/// An axis-aligned rectangular obstacle.
#[derive(Debug, Clone, PartialEq)]
pub struct RectObstacle {
    corners: [Point2; 4],
}

impl RectObstacle {
    /// Creates a rectangle spanning `origin` to `origin + (width, height)`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if either side is not positive.
    pub fn new(origin: Point2, width: f64, height: f64) -> Result<Self> {
        if !(width > 0.0 && height > 0.0) {
            return Err(GeometryError::Degenerate(format!(
                "rectangle sides must be positive, got {width} x {height}"
            ))
            .into());
        }
        Ok(Self {
            corners: [
                origin,
                Point2::new(origin.x + width, origin.y),
                Point2::new(origin.x + width, origin.y + height),
                Point2::new(origin.x, origin.y + height),
            ],
        })
    }

    #[must_use]
    pub fn min(&self) -> Point2 {
        self.corners[0]
    }

    #[must_use]
    pub fn max(&self) -> Point2 {
        self.corners[2]
    }
}

impl Obstacle for RectObstacle {
    fn vertices(&self) -> &[Point2] {
        &self.corners
    }

    fn contains(&self, point: &Point2, eps: f64) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x > min.x + eps
            && point.x < max.x - eps
            && point.y > min.y + eps
            && point.y < max.y - eps
    }
}
