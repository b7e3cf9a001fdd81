use std::ops::{Index, IndexMut};

use crate::math::{Segment2, Vector2};

/// Selects one of the two vertices of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// The vertex the edge starts from.
    First,
    /// The vertex the edge ends at.
    Second,
}

/// Preferred growth directions of an edge's two vertices.
///
/// Both slots start unset and are filled with the edge normal on first use.
/// They only differ after a vertex split sends one of them along an
/// obstacle boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GrowthDirection {
    pub first: Option<Vector2>,
    pub second: Option<Vector2>,
}

impl GrowthDirection {
    #[must_use]
    pub fn get(&self, endpoint: Endpoint) -> Option<Vector2> {
        match endpoint {
            Endpoint::First => self.first,
            Endpoint::Second => self.second,
        }
    }

    pub fn set(&mut self, endpoint: Endpoint, direction: Vector2) {
        match endpoint {
            Endpoint::First => self.first = Some(direction),
            Endpoint::Second => self.second = Some(direction),
        }
    }

    /// Fills unset slots with `normal`, keeping directions already assigned,
    /// and returns both directions.
    pub fn fill_unset(&mut self, normal: Vector2) -> (Vector2, Vector2) {
        let first = *self.first.get_or_insert(normal);
        let second = *self.second.get_or_insert(normal);
        (first, second)
    }
}

/// Derived per-edge state, index-aligned with the polygon's edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeCache {
    /// Whether `extend` may still try to grow this edge.
    pub can_advance: bool,
    pub growth_direction: GrowthDirection,
    /// Outward unit normal, computed lazily.
    pub normal: Option<Vector2>,
}

impl Default for EdgeCache {
    fn default() -> Self {
        Self {
            can_advance: true,
            growth_direction: GrowthDirection::default(),
            normal: None,
        }
    }
}

/// Returns `true` if the edge turned: both versions have a direction and the
/// directions differ beyond `eps`.
fn slope_changed(old: &Segment2, new: &Segment2, eps: f64) -> bool {
    !old.is_degenerate(eps) && !new.is_degenerate(eps) && !old.is_parallel_to(new, eps)
}

/// One [`EdgeCache`] per polygon edge.
#[derive(Debug, Clone, Default)]
pub(crate) struct EdgeCacheTable {
    entries: Vec<EdgeCache>,
}

impl EdgeCacheTable {
    pub(crate) fn with_len(len: usize) -> Self {
        Self {
            entries: vec![EdgeCache::default(); len],
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&EdgeCache> {
        self.entries.get(index)
    }

    /// Indices of edges that may still advance, in ascending order.
    pub(crate) fn enabled_indices(&self) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, c)| c.can_advance)
            .map(|(i, _)| i)
            .collect()
    }

    /// Inserts a default entry for a vertex inserted at `index`.
    pub(crate) fn add_cache_at(&mut self, index: usize) {
        self.entries.insert(index, EdgeCache::default());
    }

    /// Drops the entry of a vertex removed from `index`.
    pub(crate) fn remove_cache_at(&mut self, index: usize) {
        self.entries.remove(index);
    }

    /// Voids the entry of an edge modified from `old` into `new`.
    ///
    /// The edge is always re-enabled; its direction-dependent caches are only
    /// cleared when the slope changed.
    pub(crate) fn void_cache_at(&mut self, index: usize, old: &Segment2, new: &Segment2, eps: f64) {
        let entry = &mut self.entries[index];
        entry.can_advance = true;
        if slope_changed(old, new, eps) {
            entry.growth_direction = GrowthDirection::default();
            entry.normal = None;
        }
    }

    /// Clears only the cached normal of an edge that turned as a side effect
    /// of a neighbour's advance.
    pub(crate) fn refresh_normal_at(
        &mut self,
        index: usize,
        old: &Segment2,
        new: &Segment2,
        eps: f64,
    ) {
        if slope_changed(old, new, eps) {
            self.entries[index].normal = None;
        }
    }

    pub(crate) fn reset(&mut self, len: usize) {
        self.entries.clear();
        self.entries.resize(len, EdgeCache::default());
    }
}

impl Index<usize> for EdgeCacheTable {
    type Output = EdgeCache;

    fn index(&self, index: usize) -> &EdgeCache {
        &self.entries[index]
    }
}

impl IndexMut<usize> for EdgeCacheTable {
    fn index_mut(&mut self, index: usize) -> &mut EdgeCache {
        &mut self.entries[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Point2, TOLERANCE};

    fn seg(x0: f64, y0: f64, x1: f64, y1: f64) -> Segment2 {
        Segment2::new(Point2::new(x0, y0), Point2::new(x1, y1))
    }

    fn populated() -> EdgeCache {
        EdgeCache {
            can_advance: false,
            growth_direction: GrowthDirection {
                first: Some(Vector2::new(0.0, 1.0)),
                second: Some(Vector2::new(0.0, 1.0)),
            },
            normal: Some(Vector2::new(0.0, 1.0)),
        }
    }

    #[test]
    fn fill_unset_keeps_assigned_directions() {
        let diagonal = Vector2::new(1.0, 1.0).normalize();
        let normal = Vector2::new(0.0, 1.0);
        let mut d = GrowthDirection {
            first: Some(diagonal),
            second: None,
        };
        let (first, second) = d.fill_unset(normal);
        assert_eq!(first, diagonal);
        assert_eq!(second, normal);
        assert_eq!(d.get(Endpoint::Second), Some(normal));
    }

    #[test]
    fn add_and_remove_shift_entries() {
        let mut table = EdgeCacheTable::with_len(3);
        table[1] = populated();
        table.add_cache_at(1);
        assert_eq!(table.len(), 4);
        assert_eq!(table[1], EdgeCache::default());
        assert_eq!(table[2], populated());

        table.remove_cache_at(0);
        assert_eq!(table.len(), 3);
        assert_eq!(table[1], populated());
    }

    #[test]
    fn void_keeps_direction_caches_for_parallel_move() {
        let mut table = EdgeCacheTable::with_len(1);
        table[0] = populated();
        table.void_cache_at(0, &seg(0.0, 0.0, 1.0, 0.0), &seg(0.0, 1.0, 3.0, 1.0), TOLERANCE);
        assert!(table[0].can_advance);
        assert!(table[0].normal.is_some());
        assert!(table[0].growth_direction.first.is_some());
    }

    #[test]
    fn void_clears_direction_caches_on_slope_change() {
        let mut table = EdgeCacheTable::with_len(1);
        table[0] = populated();
        table.void_cache_at(0, &seg(0.0, 0.0, 1.0, 0.0), &seg(0.0, 0.0, 1.0, 1.0), TOLERANCE);
        assert_eq!(table[0], EdgeCache::default());
    }

    #[test]
    fn void_ignores_degenerate_edges() {
        let mut table = EdgeCacheTable::with_len(1);
        table[0] = populated();
        table.void_cache_at(0, &seg(1.0, 1.0, 1.0, 1.0), &seg(0.0, 0.0, 1.0, 1.0), TOLERANCE);
        assert!(table[0].can_advance);
        assert!(table[0].normal.is_some());
    }

    #[test]
    fn refresh_only_touches_normal() {
        let mut table = EdgeCacheTable::with_len(1);
        table[0] = populated();
        table.refresh_normal_at(0, &seg(0.0, 0.0, 1.0, 0.0), &seg(0.0, 0.0, 1.0, 0.5), TOLERANCE);
        assert!(!table[0].can_advance);
        assert!(table[0].normal.is_none());
        assert!(table[0].growth_direction.second.is_some());
    }

    #[test]
    fn enabled_indices_and_reset() {
        let mut table = EdgeCacheTable::with_len(4);
        table[2].can_advance = false;
        assert_eq!(table.enabled_indices(), vec![0, 1, 3]);
        table.reset(5);
        assert_eq!(table.len(), 5);
        assert_eq!(table.enabled_indices(), vec![0, 1, 2, 3, 4]);
        assert!(table.get(5).is_none());
    }
}
