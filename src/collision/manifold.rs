use crate::math::vec2::Vec2;

/// Stores information about a collision between two bodies.
///
/// Penetration is always expressed as one vertex of the vertex body
/// pushed through one structural edge of the edge body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionManifold {
    /// Index of the body contributing the penetrating vertex.
    pub vertex_body_idx: usize,
    /// Index of the body contributing the contact edge.
    pub edge_body_idx: usize,
    /// Collision normal, pointing from the edge body towards the vertex
    /// body.
    pub normal: Vec2,
    /// Penetration depth along `normal`.
    pub depth: f64,
    /// Index of the contact edge within the edge body.
    pub edge_idx: usize,
    /// Index of the penetrating vertex within the vertex body.
    pub vertex_idx: usize,
}
