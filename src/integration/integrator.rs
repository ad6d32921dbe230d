use crate::math::vec2::Vec2;
use crate::objects::PhysicsBody;

/// Advances every vertex of a body one step with position Verlet.
///
/// The displacement covered during the previous step carries the implied
/// velocity; `acceleration` (typically gravity) enters scaled by dt².
/// Constraint passes that later adjust `position` therefore feed directly
/// back into the velocity of the following step.
pub fn integrate(body: &mut PhysicsBody, acceleration: Vec2, dt: f64) {
    let step = acceleration * (dt * dt);
    for vertex in body.vertices_mut() {
        let current = vertex.position;
        vertex.position += vertex.displacement() + step;
        vertex.old_position = current;
    }
}
