use crate::math::vec2::Vec2;

/// A point mass integrated with the Verlet scheme.
///
/// Velocity is not stored: the offset between `position` and
/// `old_position` is the displacement covered during the last step, and
/// the integrator advances the vertex by replaying it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Current world position.
    pub position: Vec2,
    /// Position at the previous integration step.
    pub old_position: Vec2,
}

impl Vertex {
    /// Creates a vertex at rest (both positions coincide, so the implied
    /// velocity is zero).
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            old_position: position,
        }
    }

    /// Displacement covered during the last step.
    pub fn displacement(self) -> Vec2 {
        self.position - self.old_position
    }
}
