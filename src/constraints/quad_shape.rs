use crate::math::vec2::Vec2;
use crate::objects::vertex::Vertex;

/// Fraction of the previous-frame 2-3 edge blended into the step-three
/// reference direction. The blend lets the pass resist racking
/// (parallelogram deformation), which plain edge-length relaxation cannot.
const SHEAR_BIAS: f64 = 0.4;

/// Reference directions with a squared length below this are degenerate
/// (the two anchor vertices coincide); the projection step is skipped for
/// the tick instead of dividing by zero.
const MIN_REFERENCE_LENGTH_SQ: f64 = 1e-12;

/// Shape-preservation pass for a four-vertex quad body (vertices 0..4 in
/// perimeter order).
///
/// Three point-to-line projections run in fixed order, each correction
/// feeding the next:
///
/// 1. vertex 0 is re-seated on the line through vertex 1's previous
///    position along the previous-frame 0-1 edge,
/// 2. the same correction shifted one index: vertex 1 against vertex 2,
/// 3. vertex 2 is projected onto the line through vertex 3's *current*
///    position, along vertex 2's previous offset from that anchor minus
///    `SHEAR_BIAS` times the previous-frame 2-3 edge.
///
/// Only `position` is written; `old_position` stays untouched so the
/// corrections feed back into the implied velocity.
///
/// Hardcoded to the index quadruple 0..4; bodies with fewer than four
/// vertices are left unchanged.
pub fn relax_quad(vertices: &mut [Vertex]) {
    if vertices.len() < 4 {
        return;
    }

    // Step 1: vertex 0 against vertex 1's previous position.
    let reference = vertices[0].old_position - vertices[1].old_position;
    let offset = vertices[0].position - vertices[1].old_position;
    if let Some(t) = projection_factor(reference, offset) {
        vertices[0].position = vertices[1].old_position + reference * t;
    }

    // Step 2: identical, one vertex further along the perimeter.
    let reference = vertices[1].old_position - vertices[2].old_position;
    let offset = vertices[1].position - vertices[2].old_position;
    if let Some(t) = projection_factor(reference, offset) {
        vertices[1].position = vertices[2].old_position + reference * t;
    }

    // Step 3: vertex 2 anchors against vertex 3's current position, with
    // the shear term mixed into the reference direction.
    let previous_edge = vertices[2].old_position - vertices[3].old_position;
    let anchor_direction = vertices[2].old_position - vertices[3].position;
    let reference = anchor_direction - previous_edge * SHEAR_BIAS;
    let offset = vertices[2].position - vertices[3].position;
    if let Some(t) = projection_factor(reference, offset) {
        vertices[2].position = vertices[3].position + reference * t;
    }
}

/// Scalar parameter placing `offset`'s projection along `reference`, or
/// `None` when the reference direction is too short to divide by.
fn projection_factor(reference: Vec2, offset: Vec2) -> Option<f64> {
    let length_sq = reference.magnitude_squared();
    if length_sq < MIN_REFERENCE_LENGTH_SQ {
        log::debug!("degenerate reference direction, skipping quad projection step");
        return None;
    }
    Some(reference.dot(offset) / length_sq)
}
