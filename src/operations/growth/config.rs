use crate::math::TOLERANCE;

/// Parameters of a growth run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthConfig {
    /// Tolerance for slope comparisons, degeneracy and containment tests.
    pub epsilon: f64,
    /// Upper bound on `extend` calls made by [`super::ExtendablePolygon::grow`].
    pub max_iterations: usize,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            epsilon: TOLERANCE,
            max_iterations: 10_000,
        }
    }
}

impl GrowthConfig {
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}
