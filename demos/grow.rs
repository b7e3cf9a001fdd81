//! Grows a square seed in a room with a pillar and a slanted corner.
//!
//! ```text
//! cargo run --example grow
//! RUST_LOG=polygrow=debug cargo run --example grow
//! ```

use polygrow::math::Point2;
use polygrow::{
    BoundingRect, ConvexPolygon, ExtendablePolygon, GrowthConfig, Obstacle, PolygonObstacle,
    RectObstacle,
};

fn main() -> polygrow::Result<()> {
    // Default: WARN for everything, INFO for polygrow.
    // Override with RUST_LOG env var (e.g. RUST_LOG=polygrow=trace).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("grow=info".parse().unwrap_or_default())
        .add_directive("polygrow=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let bounds = BoundingRect::new(Point2::new(0.0, 0.0), 10.0, 8.0);
    let obstacles: Vec<Box<dyn Obstacle>> = vec![
        Box::new(RectObstacle::new(Point2::new(6.0, 2.0), 1.0, 1.0)?),
        Box::new(PolygonObstacle::new(vec![
            Point2::new(6.5, 8.0),
            Point2::new(10.0, 4.5),
            Point2::new(10.0, 8.0),
        ])?),
    ];

    let seed = ConvexPolygon::new(vec![
        Point2::new(4.0, 4.0),
        Point2::new(4.5, 4.0),
        Point2::new(4.5, 4.5),
        Point2::new(4.0, 4.5),
    ])?;
    let mut region = ExtendablePolygon::from_polygon(seed, GrowthConfig::default())?;
    let report = region.grow(0.1, &obstacles, &bounds)?;

    tracing::info!(
        iterations = report.iterations,
        fixpoint = report.reached_fixpoint,
        area = region.polygon().area(),
        "growth finished"
    );
    for (i, v) in region.vertices().iter().enumerate() {
        println!("{i}: ({:.3}, {:.3})", v.x, v.y);
    }
    Ok(())
}
