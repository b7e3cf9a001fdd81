use std::f64::consts::TAU;

use crate::error::{GeometryError, Result};
use crate::math::distance_2d::signed_line_dist;
use crate::math::{z_cross, Point2, Segment2, Vector2, TOLERANCE};

use super::Obstacle;

/// A mutable convex polygon stored as a cyclic vertex ring.
///
/// Edge `i` runs from vertex `i` to vertex `(i + 1) % n`. Every mutator checks
/// convexity and leaves the polygon untouched when the edit would break it.
/// Zero-length edges (coincident consecutive vertices) are permitted and
/// ignored by the convexity test. Either winding order is accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexPolygon {
    vertices: Vec<Point2>,
    epsilon: f64,
}

impl ConvexPolygon {
    /// Creates a polygon using the default [`TOLERANCE`].
    ///
    /// # Errors
    ///
    /// See [`ConvexPolygon::with_epsilon`].
    pub fn new(vertices: Vec<Point2>) -> Result<Self> {
        Self::with_epsilon(vertices, TOLERANCE)
    }

    /// Creates a polygon whose fuzzy comparisons use `epsilon`.
    ///
    /// # Errors
    ///
    /// - `GeometryError::TooFewVertices` for fewer than 3 vertices
    /// - `GeometryError::NotConvex` if the ring is not convex
    pub fn with_epsilon(vertices: Vec<Point2>, epsilon: f64) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(GeometryError::TooFewVertices {
                count: vertices.len(),
            }
            .into());
        }
        if !is_convex_ring(&vertices, epsilon) {
            return Err(GeometryError::NotConvex.into());
        }
        Ok(Self { vertices, epsilon })
    }

    #[must_use]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn vertices(&self) -> &[Point2] {
        &self.vertices
    }

    #[must_use]
    pub fn into_vertices(self) -> Vec<Point2> {
        self.vertices
    }

    /// Returns vertex `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= vertex_count()`.
    #[must_use]
    pub fn vertex(&self, index: usize) -> Point2 {
        self.vertices[index]
    }

    /// Returns edge `index`, from vertex `index` to its circular successor.
    ///
    /// # Panics
    ///
    /// Panics if `index >= vertex_count()`.
    #[must_use]
    pub fn edge(&self, index: usize) -> Segment2 {
        Segment2::new(
            self.vertices[index],
            self.vertices[self.circular_next(index)],
        )
    }

    /// Iterates over all edges in ring order.
    pub fn edges(&self) -> impl Iterator<Item = Segment2> + '_ {
        (0..self.vertices.len()).map(|i| self.edge(i))
    }

    #[must_use]
    pub fn circular_next(&self, index: usize) -> usize {
        (index + 1) % self.vertices.len()
    }

    #[must_use]
    pub fn circular_previous(&self, index: usize) -> usize {
        let n = self.vertices.len();
        (index + n - 1) % n
    }

    /// Inserts a vertex at `index` (`0..=vertex_count()`), shifting later ones.
    ///
    /// Returns `false` and leaves the polygon unchanged if the index is out
    /// of range or the result would not be convex.
    pub fn add_vertex(&mut self, index: usize, point: Point2) -> bool {
        if index > self.vertices.len() {
            return false;
        }
        self.vertices.insert(index, point);
        if is_convex_ring(&self.vertices, self.epsilon) {
            return true;
        }
        self.vertices.remove(index);
        false
    }

    /// Removes vertex `index`.
    ///
    /// Returns `false` if the index is out of range, fewer than 3 vertices
    /// would remain, or the result would not be convex.
    pub fn remove_vertex(&mut self, index: usize) -> bool {
        if index >= self.vertices.len() || self.vertices.len() <= 3 {
            return false;
        }
        let removed = self.vertices.remove(index);
        if is_convex_ring(&self.vertices, self.epsilon) {
            return true;
        }
        self.vertices.insert(index, removed);
        false
    }

    /// Moves vertex `index` to `point`.
    pub fn move_vertex(&mut self, index: usize, point: Point2) -> bool {
        if index >= self.vertices.len() {
            return false;
        }
        let old = std::mem::replace(&mut self.vertices[index], point);
        if is_convex_ring(&self.vertices, self.epsilon) {
            return true;
        }
        self.vertices[index] = old;
        false
    }

    /// Replaces edge `index` with `edge`, moving both of its vertices.
    pub fn move_edge(&mut self, index: usize, edge: Segment2) -> bool {
        if index >= self.vertices.len() {
            return false;
        }
        let next = self.circular_next(index);
        let old = (self.vertices[index], self.vertices[next]);
        self.vertices[index] = edge.first;
        self.vertices[next] = edge.second;
        if is_convex_ring(&self.vertices, self.epsilon) {
            return true;
        }
        self.vertices[index] = old.0;
        self.vertices[next] = old.1;
        false
    }

    /// Replaces this polygon's shape with `other`'s, keeping this epsilon.
    pub fn mutate_to(&mut self, other: &ConvexPolygon) {
        self.vertices.clone_from(&other.vertices);
    }

    /// Signed area (shoelace formula). Positive for counter-clockwise rings.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        ring_signed_area(&self.vertices)
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    #[must_use]
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Re-runs the convexity test on the current ring.
    #[must_use]
    pub fn is_convex(&self) -> bool {
        is_convex_ring(&self.vertices, self.epsilon)
    }

    /// Returns `true` if `point` lies strictly inside the polygon.
    #[must_use]
    pub fn contains(&self, point: &Point2) -> bool {
        self.inner_distances(point).all(|d| d > self.epsilon)
    }

    /// Returns `true` if `point` lies inside the polygon or on its boundary.
    #[must_use]
    pub fn contains_boundary_included(&self, point: &Point2) -> bool {
        self.inner_distances(point).all(|d| d >= -self.epsilon)
    }

    /// Returns `true` if the interiors of this polygon and `obstacle` overlap.
    ///
    /// Shapes that only touch along their boundaries do not overlap. Vertex
    /// and crossing checks run first; shapes whose vertices all sit on each
    /// other's boundaries fall through to [`ConvexPolygon::clipped_area`].
    pub fn overlaps<O: Obstacle + ?Sized>(&self, obstacle: &O) -> bool {
        if self
            .vertices
            .iter()
            .any(|v| obstacle.contains(v, self.epsilon))
        {
            return true;
        }
        if obstacle.vertices().iter().any(|v| self.contains(v)) {
            return true;
        }
        let obstacle_edges = obstacle.edges();
        let crossing = self.edges().any(|edge| {
            obstacle_edges
                .iter()
                .any(|other| edge.crosses(other, self.epsilon))
        });
        crossing || self.clipped_area(obstacle.vertices()) > self.epsilon
    }

    /// Area of the part of `ring` lying inside this polygon.
    ///
    /// Sutherland-Hodgman clipping against each non-degenerate edge line.
    /// `ring` may be concave.
    #[must_use]
    pub fn clipped_area(&self, ring: &[Point2]) -> f64 {
        let orientation = if self.is_ccw() { 1.0 } else { -1.0 };
        let mut clipped = ring.to_vec();
        for edge in self.edges().filter(|e| !e.is_degenerate(self.epsilon)) {
            if clipped.len() < 3 {
                return 0.0;
            }
            let inner = |q: &Point2| orientation * signed_line_dist(q, &edge.first, &edge.second);
            let mut next = Vec::with_capacity(clipped.len() + 2);
            let mut previous = clipped[clipped.len() - 1];
            let mut d_previous = inner(&previous);
            for &current in &clipped {
                let d_current = inner(&current);
                if (d_current >= 0.0) != (d_previous >= 0.0) {
                    let t = d_previous / (d_previous - d_current);
                    next.push(previous + (current - previous) * t);
                }
                if d_current >= 0.0 {
                    next.push(current);
                }
                previous = current;
                d_previous = d_current;
            }
            clipped = next;
        }
        ring_signed_area(&clipped).abs()
    }

    /// Distances of `point` from every non-degenerate edge line, positive
    /// towards the interior.
    fn inner_distances<'a>(&'a self, point: &'a Point2) -> impl Iterator<Item = f64> + 'a {
        let orientation = if self.is_ccw() { 1.0 } else { -1.0 };
        self.edges()
            .filter(|e| !e.is_degenerate(self.epsilon))
            .map(move |e| orientation * signed_line_dist(point, &e.first, &e.second))
    }
}

/// Shoelace area of a closed ring. Positive for counter-clockwise rings.
fn ring_signed_area(ring: &[Point2]) -> f64 {
    let n = ring.len();
    let mut sum = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum * 0.5
}

/// Convexity test tolerant of zero-length edges and collinear runs.
///
/// Consecutive non-degenerate edge directions must all turn the same way
/// (collinear continuations allowed, reversals rejected), and the total
/// turning must be one full revolution so that star-shaped self-intersecting
/// rings are rejected.
#[allow(clippy::float_cmp)]
fn is_convex_ring(vertices: &[Point2], eps: f64) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    let directions: Vec<Vector2> = (0..n)
        .filter_map(|i| (vertices[(i + 1) % n] - vertices[i]).try_normalize(eps))
        .collect();
    let m = directions.len();
    if m < 3 {
        return false;
    }

    let mut sign = 0.0;
    let mut turning = 0.0;
    for i in 0..m {
        let a = directions[i];
        let b = directions[(i + 1) % m];
        let cross = z_cross(&a, &b);
        let dot = a.dot(&b);
        if cross.abs() <= eps {
            if dot < 0.0 {
                return false;
            }
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
        turning += cross.atan2(dot);
    }
    sign != 0.0 && (turning.abs() - TAU).abs() < 1e-6
}
