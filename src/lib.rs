//! Obstacle-aware growth of convex regions in the plane.
//!
//! A convex seed polygon is grown edge by edge until it is maximal with
//! respect to a set of obstacles and a bounding rectangle. See
//! [`operations::growth`] for the algorithm.

pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;

pub use error::{GeometryError, GrowthError, PolygrowError, Result};
pub use geometry::{BoundingRect, ConvexPolygon, Obstacle, PolygonObstacle, RectObstacle};
pub use operations::growth::{grow_seeds, ExtendablePolygon, GrowthConfig, GrowthReport};
