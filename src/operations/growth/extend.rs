use tracing::{debug, warn};

use crate::error::{GeometryError, GrowthError, PolygrowError, Result};
use crate::geometry::{BoundingRect, Obstacle};
use crate::math::{Segment2, Vector2};

use super::advance::find_length;
use super::{Endpoint, ExtendablePolygon};

/// Outcome of [`ExtendablePolygon::grow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthReport {
    /// Number of `extend` calls made.
    pub iterations: usize,
    /// `true` if the last call extended nothing.
    pub reached_fixpoint: bool,
}

/// Vertex split computed for one intruded obstacle.
#[derive(Debug, Clone, Copy)]
struct SplitPlan {
    /// Index of the vertex inside the obstacle.
    vertex: usize,
    /// New direction of the vertex as the start of the edge leaving it.
    leaving: Vector2,
    /// New direction of the vertex as the end of the edge entering it.
    entering: Vector2,
}

impl ExtendablePolygon {
    /// Runs one growth iteration over every edge still allowed to advance.
    ///
    /// The set of edges is fixed when the call starts. Each edge is advanced
    /// by `step`; the move stands if the edge stays within `bounds` and
    /// either overlaps no obstacle or is in the advanced case: at most two
    /// obstacles are overlapped and each is entered by exactly one polygon
    /// vertex through a side not parallel to the edge, with none of its own
    /// vertices inside the polygon. In the advanced case the intruding vertex
    /// is split so that the two halves slide along that side on later
    /// iterations. Any other outcome reverts the move and disables the edge
    /// for good.
    ///
    /// Returns `true` if at least one edge extended. Call repeatedly until it
    /// returns `false` to reach the maximal region (see [`Self::grow`]).
    ///
    /// # Errors
    ///
    /// Returns a [`GrowthError`] on contract violations: non-finite `step`,
    /// an intruding vertex whose path crosses zero or several obstacle sides,
    /// or a revert the polygon refuses. Invalid growth directions only
    /// disable the affected edge.
    pub fn extend<O: Obstacle>(
        &mut self,
        step: f64,
        obstacles: &[O],
        bounds: &BoundingRect,
    ) -> Result<bool> {
        if !step.is_finite() {
            return Err(GrowthError::InvalidStep { step }.into());
        }
        let mut extended = false;
        for i in self.caches.enabled_indices() {
            let advanced = match self.advance_edge(i, step) {
                Ok(advanced) => advanced,
                Err(PolygrowError::Geometry(GeometryError::InvalidGrowthDirection { index })) => {
                    warn!(edge = index, "invalid growth direction, disabling edge");
                    false
                }
                Err(e) => return Err(e),
            };
            let intersected: Vec<&O> = if advanced {
                obstacles
                    .iter()
                    .filter(|o| self.polygon.overlaps(*o))
                    .collect()
            } else {
                Vec::new()
            };
            if advanced
                && bounds.contains_segment(&self.polygon.edge(i))
                && self.is_advanced_case(i, step, &intersected)?
            {
                if !intersected.is_empty() {
                    self.adjust_growth(i, step, &intersected)?;
                }
                extended = true;
            } else {
                if advanced && !self.advance_edge(i, -step)? {
                    return Err(GrowthError::RevertFailed { index: i }.into());
                }
                self.caches[i].can_advance = false;
                debug!(edge = i, "edge disabled");
            }
        }
        Ok(extended)
    }

    /// Calls [`Self::extend`] until nothing extends or the configured
    /// iteration budget runs out.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Self::extend`].
    pub fn grow<O: Obstacle>(
        &mut self,
        step: f64,
        obstacles: &[O],
        bounds: &BoundingRect,
    ) -> Result<GrowthReport> {
        let budget = self.config.max_iterations;
        for iteration in 1..=budget {
            if !self.extend(step, obstacles, bounds)? {
                debug!(
                    iterations = iteration,
                    vertices = self.polygon.vertex_count(),
                    "growth reached fixpoint"
                );
                return Ok(GrowthReport {
                    iterations: iteration,
                    reached_fixpoint: true,
                });
            }
        }
        warn!(budget, "growth stopped before reaching a fixpoint");
        Ok(GrowthReport {
            iterations: budget,
            reached_fixpoint: false,
        })
    }

    fn is_advanced_case<O: Obstacle>(
        &self,
        index: usize,
        step: f64,
        intersected: &[&O],
    ) -> Result<bool> {
        if intersected.len() > 2 {
            return Ok(false);
        }
        for obstacle in intersected {
            if !self.is_advanced_case_for(*obstacle, index, step)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn is_advanced_case_for<O: Obstacle + ?Sized>(
        &self,
        obstacle: &O,
        index: usize,
        step: f64,
    ) -> Result<bool> {
        if obstacle
            .vertices()
            .iter()
            .any(|v| self.polygon.contains_boundary_included(v))
        {
            return Ok(false);
        }
        let intruders = self
            .polygon
            .vertices()
            .iter()
            .filter(|v| obstacle.contains(v, self.config.epsilon))
            .count();
        if intruders != 1 {
            return Ok(false);
        }
        let intruded = self.find_intruded_edge(obstacle, index, step)?;
        Ok(!intruded.is_parallel_to(&self.polygon.edge(index), self.config.epsilon))
    }

    /// The obstacle side crossed by the intruding vertex of edge `index`
    /// during its last move of `step`.
    fn find_intruded_edge<O: Obstacle + ?Sized>(
        &self,
        obstacle: &O,
        index: usize,
        step: f64,
    ) -> Result<Segment2> {
        let edge = self.polygon.edge(index);
        let cache = &self.caches[index];
        let (vertex, direction) = if obstacle.contains(&edge.first, self.config.epsilon) {
            (edge.first, cache.growth_direction.get(Endpoint::First))
        } else {
            (edge.second, cache.growth_direction.get(Endpoint::Second))
        };
        let direction = direction
            .ok_or(GrowthError::MissingGrowthDirection { index })?
            .normalize();
        let normal = cache
            .normal
            .ok_or(GrowthError::MissingGrowthDirection { index })?;
        let length = find_length(&direction, &normal, step);
        let movement = Segment2::new(vertex, vertex - direction * length);

        let crossed = obstacle.edges_crossing(&movement, self.config.epsilon);
        match crossed.as_slice() {
            [intruded] => Ok(*intruded),
            _ => Err(GrowthError::IntrudedEdgeNotUnique {
                found: crossed.len(),
            }
            .into()),
        }
    }

    /// Splits the vertices that entered `intersected` obstacles while edge
    /// `index` advanced by `step`, then takes the advance back.
    ///
    /// The split vertex keeps its position twice; the zero-length edge
    /// between the copies is disabled and lengthens as its neighbours grow
    /// along the intruded obstacle side in opposite senses.
    fn adjust_growth<O: Obstacle>(
        &mut self,
        index: usize,
        step: f64,
        intersected: &[&O],
    ) -> Result<()> {
        let mut plans = Vec::with_capacity(intersected.len());
        for obstacle in intersected {
            plans.push(self.plan_split(*obstacle, index, step)?);
        }
        if !self.advance_edge(index, -step)? {
            return Err(GrowthError::RevertFailed { index }.into());
        }
        // Highest index first so insertions don't shift pending plans.
        plans.sort_by(|a, b| b.vertex.cmp(&a.vertex));
        plans.dedup_by_key(|plan| plan.vertex);
        for plan in plans {
            self.apply_split(plan)?;
        }
        Ok(())
    }

    fn plan_split<O: Obstacle + ?Sized>(
        &self,
        obstacle: &O,
        index: usize,
        step: f64,
    ) -> Result<SplitPlan> {
        let eps = self.config.epsilon;
        let vertex = self
            .polygon
            .vertices()
            .iter()
            .position(|v| obstacle.contains(v, eps))
            .ok_or(GrowthError::IntrudedEdgeNotUnique { found: 0 })?;
        if vertex != index && vertex != self.polygon.circular_next(index) {
            return Err(GrowthError::IntruderNotOnEdge {
                vertex,
                edge: index,
            }
            .into());
        }

        let leaving_edge = self.polygon.edge(vertex);
        let entering_edge = self.polygon.edge(self.polygon.circular_previous(vertex));
        let side = self.find_intruded_edge(obstacle, index, step)?;
        let p1 = leaving_edge
            .line_intersection(&side, eps)
            .ok_or(GrowthError::IntersectionNotFound)?;
        let p2 = entering_edge
            .line_intersection(&side, eps)
            .ok_or(GrowthError::IntersectionNotFound)?;

        // The two copies run towards opposite ends of the side, each towards
        // the end nearer to where its edge meets the side.
        let (leaving_target, entering_target) =
            if (p1 - side.first).norm() < (p2 - side.first).norm() {
                (side.first, side.second)
            } else {
                (side.second, side.first)
            };
        let leaving = (leaving_target - p1).try_normalize(eps).ok_or_else(|| {
            GeometryError::Degenerate("split direction has zero length".to_owned())
        })?;
        let entering = (entering_target - p2).try_normalize(eps).ok_or_else(|| {
            GeometryError::Degenerate("split direction has zero length".to_owned())
        })?;
        Ok(SplitPlan {
            vertex,
            leaving,
            entering,
        })
    }

    fn apply_split(&mut self, plan: SplitPlan) -> Result<()> {
        let SplitPlan {
            vertex,
            leaving,
            entering,
        } = plan;
        let position = self.polygon.vertex(vertex);
        self.caches[vertex]
            .growth_direction
            .set(Endpoint::First, leaving);
        if !self.add_vertex(vertex, position) {
            return Err(GrowthError::InsertionRejected { vertex }.into());
        }
        // `vertex` now indexes the zero-length edge between the two copies.
        self.caches[vertex].can_advance = false;
        let previous = self.polygon.circular_previous(vertex);
        self.caches[previous]
            .growth_direction
            .set(Endpoint::Second, entering);
        debug!(vertex, "split vertex along obstacle side");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::tests::{p, unit_square};
    use super::super::GrowthConfig;
    use super::*;
    use crate::geometry::{PolygonObstacle, RectObstacle};
    use approx::assert_abs_diff_eq;

    const STEP: f64 = 0.1;

    fn bounds() -> BoundingRect {
        BoundingRect::new(p(-10.0, -10.0), 20.0, 20.0)
    }

    fn no_obstacles() -> Vec<RectObstacle> {
        Vec::new()
    }

    fn ceiling() -> Vec<RectObstacle> {
        vec![RectObstacle::new(p(-1.0, 1.05), 3.0, 2.0).unwrap()]
    }

    fn oblique() -> Vec<PolygonObstacle> {
        vec![PolygonObstacle::new(vec![p(0.85, 1.3), p(1.5, 1.3), p(1.5, 0.65)]).unwrap()]
    }

    /// Bounds hugging the unit square's sides and bottom, so that only the
    /// top edge can move.
    fn column() -> BoundingRect {
        BoundingRect::new(p(0.0, 0.0), 1.0, 10.0)
    }

    /// Triangles whose hypotenuses clip the top corners of the unit square
    /// once the top edge reaches y = 1.1.
    fn right_wedge() -> PolygonObstacle {
        PolygonObstacle::new(vec![p(0.75, 1.3), p(1.5, 1.3), p(1.5, 0.55)]).unwrap()
    }

    fn left_wedge() -> PolygonObstacle {
        PolygonObstacle::new(vec![p(0.25, 1.3), p(-0.5, 1.3), p(-0.5, 0.55)]).unwrap()
    }

    /// Same slope as `right_wedge`, also holding the top right corner.
    fn wider_right_wedge() -> PolygonObstacle {
        PolygonObstacle::new(vec![p(0.73, 1.35), p(1.6, 1.35), p(1.6, 0.48)]).unwrap()
    }

    fn disabled(poly: &ExtendablePolygon) -> Vec<usize> {
        (0..poly.edge_count())
            .filter(|&i| !poly.can_advance(i))
            .collect()
    }

    #[test]
    fn free_square_grows_on_every_side() {
        let mut poly = unit_square();
        assert!(poly.extend(STEP, &no_obstacles(), &bounds()).unwrap());
        let expected = [p(-0.1, -0.1), p(1.1, -0.1), p(1.1, 1.1), p(-0.1, 1.1)];
        for (v, e) in poly.vertices().iter().zip(expected) {
            assert_abs_diff_eq!(*v, e, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(poly.polygon().area(), 1.44, epsilon = 1e-12);
        assert!(disabled(&poly).is_empty());
    }

    #[test]
    fn blocked_edge_is_reverted_and_disabled() {
        let mut poly = unit_square();
        let obstacles = ceiling();
        assert!(poly.extend(STEP, &obstacles, &bounds()).unwrap());
        assert_eq!(disabled(&poly), vec![2]);
        assert_abs_diff_eq!(poly.edge(2).first.y, 1.0, epsilon = 1e-12);
        assert!(!poly.polygon().overlaps(&obstacles[0]));

        assert!(poly.extend(STEP, &obstacles, &bounds()).unwrap());
        assert_eq!(disabled(&poly), vec![2]);
        assert_abs_diff_eq!(poly.edge(0).first.y, -0.2, epsilon = 1e-12);
    }

    #[test]
    fn intruding_vertex_is_split_along_oblique_side() {
        let mut poly = unit_square();
        let obstacles = oblique();
        assert!(poly.extend(STEP, &obstacles, &bounds()).unwrap());
        assert_eq!(poly.vertices().len(), 5);
        assert_eq!(poly.edge_count(), 5);
        assert!(!poly.can_advance(2));

        let down = Vector2::new(1.0, -1.0).normalize();
        let up = Vector2::new(-1.0, 1.0).normalize();
        assert_abs_diff_eq!(poly.growth_direction(1).unwrap().second.unwrap(), down, epsilon = 1e-12);
        assert_abs_diff_eq!(poly.growth_direction(3).unwrap().first.unwrap(), up, epsilon = 1e-12);
        assert!(poly.polygon().is_convex());
        assert!(!poly.polygon().overlaps(&obstacles[0]));
    }

    #[test]
    fn split_vertices_slide_apart_along_the_side() {
        let mut poly = unit_square();
        let obstacles = oblique();
        poly.extend(STEP, &obstacles, &bounds()).unwrap();
        poly.extend(STEP, &obstacles, &bounds()).unwrap();
        let chamfer = poly.edge(2);
        assert!(chamfer.length() > 0.1);
        // Both ends stay on the line the split vertex started from.
        assert_abs_diff_eq!(chamfer.first.x + chamfer.first.y, 2.1, epsilon = 1e-9);
        assert_abs_diff_eq!(chamfer.second.x + chamfer.second.y, 2.1, epsilon = 1e-9);
        assert!(!poly.polygon().overlaps(&obstacles[0]));
    }

    #[test]
    fn edges_leaving_bounds_are_disabled() {
        let mut poly = unit_square();
        let tight = BoundingRect::new(p(-0.05, -0.05), 1.1, 1.1);
        let before = poly.vertices().to_vec();
        assert!(!poly.extend(STEP, &no_obstacles(), &tight).unwrap());
        assert_eq!(disabled(&poly), vec![0, 1, 2, 3]);
        for (v, b) in poly.vertices().iter().zip(&before) {
            assert_abs_diff_eq!(*v, *b, epsilon = 1e-12);
        }
    }

    #[test]
    fn disabled_edges_never_come_back() {
        let mut poly = unit_square();
        let obstacles = ceiling();
        let mut previous = Vec::new();
        while poly.extend(STEP, &obstacles, &bounds()).unwrap() {
            let current = disabled(&poly);
            assert!(previous.iter().all(|i| current.contains(i)));
            previous = current;
        }
        assert_eq!(disabled(&poly).len(), 4);
    }

    #[test]
    fn grow_reaches_a_stable_fixpoint() {
        let mut poly = unit_square();
        let obstacles = oblique();
        let report = poly.grow(STEP, &obstacles, &bounds()).unwrap();
        assert!(report.reached_fixpoint);
        assert!(report.iterations > 1);
        assert!(poly.polygon().is_convex());
        assert!(!poly.polygon().overlaps(&obstacles[0]));
        for v in poly.vertices() {
            assert!(bounds().contains_point(v));
        }

        let settled = poly.vertices().to_vec();
        assert!(!poly.extend(STEP, &obstacles, &bounds()).unwrap());
        assert_eq!(poly.vertices(), settled.as_slice());
    }

    #[test]
    fn grow_stops_at_iteration_budget() {
        let mut poly = ExtendablePolygon::new(
            unit_square().vertices().to_vec(),
            GrowthConfig::default().with_max_iterations(3),
        )
        .unwrap();
        let report = poly.grow(STEP, &no_obstacles(), &bounds()).unwrap();
        assert_eq!(
            report,
            GrowthReport {
                iterations: 3,
                reached_fixpoint: false
            }
        );
        assert_abs_diff_eq!(poly.polygon().area(), 1.6 * 1.6, epsilon = 1e-9);
    }

    #[test]
    fn flush_obstacle_in_corridor_blocks_the_edge() {
        let mut poly = unit_square();
        let corridor = BoundingRect::new(p(0.0, -10.0), 1.0, 20.0);
        // Same width as the square: no vertex of either shape ends up
        // strictly inside the other and no edges cross properly.
        let obstacles = vec![RectObstacle::new(p(0.0, 1.05), 1.0, 1.0).unwrap()];
        assert!(poly.extend(STEP, &obstacles, &corridor).unwrap());
        assert!(!poly.can_advance(2));
        assert_abs_diff_eq!(poly.edge(2).first.y, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(poly.edge(2).second.y, 1.0, epsilon = 1e-12);
        assert!(!poly.polygon().overlaps(&obstacles[0]));
    }

    #[test]
    fn two_obstacles_split_both_ends_of_the_edge() {
        let mut poly = unit_square();
        let obstacles = vec![right_wedge(), left_wedge()];
        assert!(poly.extend(STEP, &obstacles, &column()).unwrap());
        assert_eq!(poly.vertices().len(), 6);
        assert_eq!(poly.edge_count(), 6);
        // Both zero-length edges between the copies are frozen.
        assert!(!poly.can_advance(2));
        assert!(!poly.can_advance(4));

        let gd = |i: usize| poly.growth_direction(i).unwrap();
        let (h, v) = (
            Vector2::new(1.0, 1.0).normalize(),
            Vector2::new(1.0, -1.0).normalize(),
        );
        assert_abs_diff_eq!(gd(1).second.unwrap(), v, epsilon = 1e-12);
        assert_abs_diff_eq!(gd(3).first.unwrap(), -v, epsilon = 1e-12);
        assert_abs_diff_eq!(gd(3).second.unwrap(), h, epsilon = 1e-12);
        assert_abs_diff_eq!(gd(5).first.unwrap(), -h, epsilon = 1e-12);

        // The top edge shifted to index 3 and advanced again along the
        // wedges' sides in the same call.
        assert_abs_diff_eq!(poly.vertices()[3], p(0.9, 1.1), epsilon = 1e-12);
        assert_abs_diff_eq!(poly.vertices()[4], p(0.1, 1.1), epsilon = 1e-12);
        assert!(poly.polygon().is_convex());
        for obstacle in &obstacles {
            assert!(!poly.polygon().overlaps(obstacle));
        }
    }

    #[test]
    fn shared_intruder_is_split_once() {
        let mut poly = unit_square();
        let obstacles = vec![right_wedge(), wider_right_wedge()];
        assert!(poly.extend(STEP, &obstacles, &column()).unwrap());
        assert_eq!(poly.vertices().len(), 5);
        assert_eq!(poly.edge_count(), 5);
        assert!(!poly.can_advance(2));
        assert!(poly.polygon().is_convex());
        for obstacle in &obstacles {
            assert!(!poly.polygon().overlaps(obstacle));
        }
    }

    #[test]
    fn three_obstacles_block_the_edge() {
        let mut poly = unit_square();
        let obstacles = vec![right_wedge(), left_wedge(), wider_right_wedge()];
        assert!(!poly.extend(STEP, &obstacles, &column()).unwrap());
        assert_eq!(poly.vertices().len(), 4);
        assert!(!poly.can_advance(2));
        assert_abs_diff_eq!(poly.edge(2).first.y, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(poly.edge(2).second.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn obstacle_vertex_inside_blocks_the_edge() {
        let mut poly = unit_square();
        let obstacles = vec![RectObstacle::new(p(0.3, 1.05), 0.4, 1.0).unwrap()];
        assert!(poly.extend(STEP, &obstacles, &bounds()).unwrap());
        assert_eq!(disabled(&poly), vec![2]);
        assert_eq!(poly.vertices().len(), 4);
        assert_abs_diff_eq!(poly.edge(2).first.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn side_parallel_to_the_edge_blocks_it() {
        let mut poly = unit_square();
        // Only the top right corner gets in, through the flat bottom side.
        let obstacles = vec![PolygonObstacle::new(vec![
            p(-0.5, 1.03),
            p(2.0, 1.03),
            p(2.0, 1.18),
            p(-0.5, 1.055),
        ])
        .unwrap()];
        assert!(poly.extend(STEP, &obstacles, &bounds()).unwrap());
        assert_eq!(disabled(&poly), vec![2]);
        assert_eq!(poly.vertices().len(), 4);
        assert_abs_diff_eq!(poly.edge(2).first.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn intruder_path_crossing_no_side_is_an_error() {
        let mut poly = unit_square();
        // Already holds the bottom left corner before anything moves.
        let obstacles =
            vec![PolygonObstacle::new(vec![p(-0.3, 0.4), p(0.4, -0.3), p(-0.3, -0.3)]).unwrap()];
        let err = poly.extend(STEP, &obstacles, &column()).unwrap_err();
        assert!(matches!(
            err,
            PolygrowError::Growth(GrowthError::IntrudedEdgeNotUnique { found: 0 })
        ));
    }

    #[test]
    fn intruder_off_the_edge_is_an_error() {
        let mut poly = unit_square();
        // Holds the bottom left corner; its long side is crossed by the top
        // left corner moving back down.
        let obstacles = vec![PolygonObstacle::new(vec![
            p(-0.5, -0.5),
            p(0.2, -0.5),
            p(-0.5, 4.925),
        ])
        .unwrap()];
        let err = poly.extend(STEP, &obstacles, &column()).unwrap_err();
        assert!(matches!(
            err,
            PolygrowError::Growth(GrowthError::IntruderNotOnEdge { vertex: 0, edge: 2 })
        ));
    }

    #[test]
    fn side_parallel_to_the_neighbour_has_no_split_point() {
        let mut poly = unit_square();
        poly.caches[2]
            .growth_direction
            .set(Endpoint::First, Vector2::new(1.0, 1.0).normalize());
        assert!(poly.advance_edge(2, STEP).unwrap());
        // The right edge now runs along (0.1, 1.1), like the side from
        // (1.09, 1.49) to (0.9, -0.6).
        let obstacle =
            PolygonObstacle::new(vec![p(0.9, -0.6), p(1.2, 1.49), p(1.09, 1.49)]).unwrap();
        let err = poly.plan_split(&obstacle, 2, STEP).unwrap_err();
        assert!(matches!(
            err,
            PolygrowError::Growth(GrowthError::IntersectionNotFound)
        ));
    }

    #[test]
    fn non_finite_step_is_rejected() {
        let mut poly = unit_square();
        assert!(matches!(
            poly.extend(f64::INFINITY, &no_obstacles(), &bounds()),
            Err(PolygrowError::Growth(GrowthError::InvalidStep { .. }))
        ));
    }
}
