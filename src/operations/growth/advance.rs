use tracing::trace;

use crate::error::{GeometryError, GrowthError, Result};
use crate::math::{z_cross, Segment2, Vector2};

use super::ExtendablePolygon;

impl ExtendablePolygon {
    /// Pushes edge `index` outward by `step` along its normal.
    ///
    /// Each vertex moves along its own growth direction, resized so that its
    /// displacement projected on the edge normal equals `step`. The advanced
    /// edge is therefore parallel to the old one even when the two vertices
    /// follow different directions. A negative `step` undoes a previous
    /// advance.
    ///
    /// Returns `Ok(false)` for an out-of-range index, a degenerate edge or
    /// when the polygon refuses the move, and `Ok(true)` without touching
    /// anything when `step` is 0.
    ///
    /// # Errors
    ///
    /// - `GrowthError::InvalidStep` if `step` is not finite
    /// - `GeometryError::InvalidGrowthDirection` if a growth direction is
    ///   (nearly) perpendicular to the normal
    pub fn advance_edge(&mut self, index: usize, step: f64) -> Result<bool> {
        if !step.is_finite() {
            return Err(GrowthError::InvalidStep { step }.into());
        }
        if index >= self.polygon.vertex_count() {
            return Ok(false);
        }
        if step == 0.0 {
            return Ok(true);
        }
        let eps = self.config.epsilon;
        let edge = self.polygon.edge(index);
        if edge.is_degenerate(eps) {
            return Ok(false);
        }

        let normal = match self.caches[index].normal {
            Some(n) => n,
            None => match self.compute_normal(index) {
                Some(n) => {
                    self.caches[index].normal = Some(n);
                    n
                }
                None => return Ok(false),
            },
        };
        let (d1, d2) = self.caches[index].growth_direction.fill_unset(normal);
        let (d1, d2) = (d1.normalize(), d2.normalize());
        let l1 = find_length(&d1, &normal, step);
        let l2 = find_length(&d2, &normal, step);
        if !(l1.is_finite() && l2.is_finite()) {
            return Err(GeometryError::InvalidGrowthDirection { index }.into());
        }

        let previous = self.polygon.circular_previous(index);
        let next = self.polygon.circular_next(index);
        let neighbours = self.snapshot_edges([previous, next]);
        let moved = Segment2::new(edge.first + d1 * l1, edge.second + d2 * l2);
        // Straight to the base polygon: the edge keeps its slope, so its own
        // cache must survive, and disabled neighbours must stay disabled.
        if !self.polygon.move_edge(index, moved) {
            trace!(edge = index, step, "advance rejected by polygon");
            return Ok(false);
        }
        for (i, old) in neighbours {
            let new = self.polygon.edge(i);
            self.caches.refresh_normal_at(i, &old, &new, eps);
        }
        trace!(edge = index, step, "edge advanced");
        Ok(true)
    }

    /// Outward unit normal of edge `index`, `None` if the edge is degenerate.
    ///
    /// Of the two unit normals, picks the one on the same side of the edge as
    /// the turn from the previous edge, which is the exterior for either
    /// winding.
    pub(super) fn compute_normal(&self, index: usize) -> Option<Vector2> {
        let edge = self.polygon.edge(index);
        let n = edge.left_normal(self.config.epsilon)?;
        let curr = edge.to_vector();
        let turn = self.previous_turn(index, &curr);
        if (z_cross(&curr, &n) > 0.0) != (turn > 0.0) {
            return Some(-n);
        }
        Some(n)
    }

    /// `cross(curr, prev)` for the nearest preceding edge that is neither
    /// degenerate nor collinear with `curr`.
    fn previous_turn(&self, index: usize, curr: &Vector2) -> f64 {
        let eps = self.config.epsilon;
        let unit = curr.normalize();
        let mut j = index;
        for _ in 1..self.polygon.vertex_count() {
            j = self.polygon.circular_previous(j);
            if let Some(prev) = self.polygon.edge(j).to_vector().try_normalize(eps) {
                let turn = z_cross(&unit, &prev);
                if turn.abs() > eps {
                    return turn;
                }
            }
        }
        // Unreachable for a convex ring; fall back on the winding.
        if self.polygon.is_ccw() {
            -1.0
        } else {
            1.0
        }
    }
}

/// Length `a` must be resized to so that its scalar projection on the unit
/// vector `b_unit` equals `q`. `a` must be a unit vector.
pub(super) fn find_length(a: &Vector2, b_unit: &Vector2, q: f64) -> f64 {
    q / a.dot(b_unit)
}
