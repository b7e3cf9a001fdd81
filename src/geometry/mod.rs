pub mod bounds;
pub mod convex_polygon;
pub mod obstacle;

pub use bounds::BoundingRect;
pub use convex_polygon::ConvexPolygon;
pub use obstacle::{Obstacle, PolygonObstacle, RectObstacle};
