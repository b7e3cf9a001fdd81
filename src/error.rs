use thiserror::Error;

/// Top-level error type for polygon growth.
#[derive(Debug, Error)]
pub enum PolygrowError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Growth(#[from] GrowthError),
}

/// Errors related to geometric validity.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("a polygon needs at least 3 vertices, got {count}")]
    TooFewVertices { count: usize },

    #[error("vertex ring is not convex")]
    NotConvex,

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("invalid growth direction for edge {index}")]
    InvalidGrowthDirection { index: usize },
}

/// Contract violations detected while growing a polygon.
///
/// These point at an upstream invariant breach (a seed overlapping an
/// obstacle, a malformed obstacle ring, a desynchronized cache) and end the
/// growth run.
#[derive(Debug, Error)]
pub enum GrowthError {
    #[error("expected exactly one intruded obstacle edge, found {found}")]
    IntrudedEdgeNotUnique { found: usize },

    #[error("intruding vertex {vertex} is not an endpoint of advancing edge {edge}")]
    IntruderNotOnEdge { vertex: usize, edge: usize },

    #[error("intruded obstacle edge is parallel to a polygon edge around the intruder")]
    IntersectionNotFound,

    #[error("failed to revert the advance of edge {index}")]
    RevertFailed { index: usize },

    #[error("edge {index} has no growth direction for its intruding vertex")]
    MissingGrowthDirection { index: usize },

    #[error("splitting vertex {vertex} was rejected by the polygon")]
    InsertionRejected { vertex: usize },

    #[error("step must be finite, got {step}")]
    InvalidStep { step: f64 },
}

/// Convenience type alias for results using [`PolygrowError`].
pub type Result<T> = std::result::Result<T, PolygrowError>;
