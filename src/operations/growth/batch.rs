use rayon::prelude::*;
use tracing::debug;

use crate::error::Result;
use crate::geometry::{BoundingRect, ConvexPolygon, Obstacle};

use super::{ExtendablePolygon, GrowthConfig};

/// Grows every seed independently to its fixpoint, in parallel.
///
/// Seeds do not see each other: each one only avoids `obstacles` and stays
/// within `bounds`. Results come back in seed order.
///
/// # Errors
///
/// Returns the first error raised by any seed's [`ExtendablePolygon::from_polygon`]
/// or [`ExtendablePolygon::grow`].
pub fn grow_seeds<O: Obstacle + Sync>(
    seeds: Vec<ConvexPolygon>,
    step: f64,
    obstacles: &[O],
    bounds: &BoundingRect,
    config: &GrowthConfig,
) -> Result<Vec<ConvexPolygon>> {
    debug!(seeds = seeds.len(), obstacles = obstacles.len(), "growing seeds");
    seeds
        .into_par_iter()
        .map(|seed| {
            let mut region = ExtendablePolygon::from_polygon(seed, *config)?;
            region.grow(step, obstacles, bounds)?;
            Ok(region.into_polygon())
        })
        .collect()
}
