//! Obstacle-aware growth of convex regions.
//!
//! An [`ExtendablePolygon`] starts from a small convex seed and pushes each of
//! its edges outward in fixed steps, keeping every edge parallel to itself,
//! until the edge would leave the bounding area or overlap an obstacle.
//! When a single vertex pokes into an obstacle through an oblique side, the
//! vertex is split in two and the new pair slides along that side instead of
//! stopping (see [`ExtendablePolygon::extend`]).
//!
//! # Edge caches
//!
//! Every edge carries an [`EdgeCache`]: whether it may still advance, the
//! growth directions of its two vertices and its outward normal. Caches are
//! index-aligned with the edges, and every topology edit made through
//! [`ExtendablePolygon`] updates them in the same call.

mod advance;
mod batch;
mod config;
mod edge_cache;
mod extend;

pub use batch::grow_seeds;
pub use config::GrowthConfig;
pub use edge_cache::{EdgeCache, Endpoint, GrowthDirection};
pub use extend::GrowthReport;

use edge_cache::EdgeCacheTable;

use crate::error::Result;
use crate::geometry::ConvexPolygon;
use crate::math::{Point2, Segment2, Vector2};

/// A convex polygon that grows among obstacles.
#[derive(Debug, Clone)]
pub struct ExtendablePolygon {
    polygon: ConvexPolygon,
    caches: EdgeCacheTable,
    config: GrowthConfig,
}

impl ExtendablePolygon {
    /// Creates an extendable polygon from a seed vertex ring.
    ///
    /// # Errors
    ///
    /// Returns an error if the ring has fewer than 3 vertices or is not convex.
    pub fn new(vertices: Vec<Point2>, config: GrowthConfig) -> Result<Self> {
        let polygon = ConvexPolygon::with_epsilon(vertices, config.epsilon)?;
        let caches = EdgeCacheTable::with_len(polygon.vertex_count());
        Ok(Self {
            polygon,
            caches,
            config,
        })
    }

    /// Takes the shape of an existing polygon; all edges start with fresh
    /// caches and the polygon is rechecked under `config.epsilon`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NotConvex` if the ring is not convex under the
    /// configured epsilon.
    pub fn from_polygon(polygon: ConvexPolygon, config: GrowthConfig) -> Result<Self> {
        Self::new(polygon.into_vertices(), config)
    }

    #[must_use]
    pub fn polygon(&self) -> &ConvexPolygon {
        &self.polygon
    }

    #[must_use]
    pub fn into_polygon(self) -> ConvexPolygon {
        self.polygon
    }

    #[must_use]
    pub fn vertices(&self) -> &[Point2] {
        self.polygon.vertices()
    }

    #[must_use]
    pub fn config(&self) -> &GrowthConfig {
        &self.config
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.caches.len()
    }

    #[must_use]
    pub fn edge(&self, index: usize) -> Segment2 {
        self.polygon.edge(index)
    }

    #[must_use]
    pub fn cache(&self, index: usize) -> Option<&EdgeCache> {
        self.caches.get(index)
    }

    /// Returns `false` for disabled edges and out-of-range indices.
    #[must_use]
    pub fn can_advance(&self, index: usize) -> bool {
        self.caches.get(index).is_some_and(|c| c.can_advance)
    }

    #[must_use]
    pub fn growth_direction(&self, index: usize) -> Option<GrowthDirection> {
        self.caches.get(index).map(|c| c.growth_direction)
    }

    #[must_use]
    pub fn normal(&self, index: usize) -> Option<Vector2> {
        self.caches.get(index).and_then(|c| c.normal)
    }

    /// Inserts a vertex at `index` and a fresh cache entry for the new edge.
    pub fn add_vertex(&mut self, index: usize, point: Point2) -> bool {
        if index > self.polygon.vertex_count() {
            return false;
        }
        let old = self.polygon.edge(self.polygon.circular_previous(index));
        if !self.polygon.add_vertex(index, point) {
            return false;
        }
        self.caches.add_cache_at(index);
        let previous = self.polygon.circular_previous(index);
        self.void_cache_at(previous, &old);
        true
    }

    /// Removes vertex `index` together with the cache entry of its edge.
    pub fn remove_vertex(&mut self, index: usize) -> bool {
        if index >= self.polygon.vertex_count() {
            return false;
        }
        let old = self.polygon.edge(self.polygon.circular_previous(index));
        if !self.polygon.remove_vertex(index) {
            return false;
        }
        self.caches.remove_cache_at(index);
        let previous = self.polygon.circular_previous(index % self.polygon.vertex_count());
        self.void_cache_at(previous, &old);
        true
    }

    /// Moves vertex `index`, voiding the caches of both edges meeting there.
    pub fn move_vertex(&mut self, index: usize, point: Point2) -> bool {
        if index >= self.polygon.vertex_count() {
            return false;
        }
        let touched = self.snapshot_edges([self.polygon.circular_previous(index), index]);
        if !self.polygon.move_vertex(index, point) {
            return false;
        }
        for (i, old) in touched {
            self.void_cache_at(i, &old);
        }
        true
    }

    /// Moves edge `index`, voiding its cache and its neighbours'.
    pub fn move_edge(&mut self, index: usize, edge: Segment2) -> bool {
        if index >= self.polygon.vertex_count() {
            return false;
        }
        let touched = self.snapshot_edges([
            self.polygon.circular_previous(index),
            index,
            self.polygon.circular_next(index),
        ]);
        if !self.polygon.move_edge(index, edge) {
            return false;
        }
        for (i, old) in touched {
            self.void_cache_at(i, &old);
        }
        true
    }

    /// Replaces the whole shape and resets every cache entry.
    pub fn mutate_to(&mut self, other: &ConvexPolygon) {
        self.polygon.mutate_to(other);
        self.caches.reset(self.polygon.vertex_count());
    }

    fn snapshot_edges<const N: usize>(&self, indices: [usize; N]) -> [(usize, Segment2); N] {
        indices.map(|i| (i, self.polygon.edge(i)))
    }

    fn void_cache_at(&mut self, index: usize, old: &Segment2) {
        let new = self.polygon.edge(index);
        self.caches
            .void_cache_at(index, old, &new, self.config.epsilon);
    }
}
