use crate::math::vec2::Vec2;
use crate::objects::PhysicsBody;
use super::manifold::CollisionManifold;

/// Collision edges with a squared length below this yield no usable axis
/// and are skipped.
const MIN_AXIS_LENGTH_SQ: f64 = 1e-12;

/// SAT narrow phase between two convex bodies.
///
/// The candidate axes are the perpendiculars of both bodies' structural
/// edges. Returns `None` as soon as an axis with a positive interval
/// distance is found (the bodies are separated on it); otherwise reports
/// the axis of least penetration together with the contact edge and the
/// deepest vertex of the opposing body.
///
/// Both bodies must have at least one vertex and fresh centers
/// (`calculate_center` after the vertices last moved); the centers orient
/// the collision normal.
pub fn detect_collision(
    body_a: &PhysicsBody,
    a_idx: usize,
    body_b: &PhysicsBody,
    b_idx: usize,
) -> Option<CollisionManifold> {
    let mut depth = f64::INFINITY;
    let mut best_normal = Vec2::ZERO;
    let mut best_edge = 0usize;
    let mut edge_owner_is_b = false;

    for (owner, owner_is_b) in [(body_a, false), (body_b, true)] {
        for (edge_idx, edge) in owner.edges().iter().enumerate() {
            if !edge.is_structural {
                continue;
            }

            let span =
                owner.vertices()[edge.v2].position - owner.vertices()[edge.v1].position;
            if span.magnitude_squared() < MIN_AXIS_LENGTH_SQ {
                log::debug!("zero-length collision edge, skipping axis");
                continue;
            }
            let axis = span.perpendicular().normalize();

            let proj_a = body_a.project_to_axis(axis);
            let proj_b = body_b.project_to_axis(axis);
            let distance = proj_a.interval_distance(&proj_b);

            // A single separating axis proves the bodies are disjoint
            if distance > 0.0 {
                return None;
            }

            if distance.abs() < depth {
                depth = distance.abs();
                best_normal = axis;
                best_edge = edge_idx;
                edge_owner_is_b = owner_is_b;
            }
        }
    }

    // Neither body contributed a usable axis
    if !depth.is_finite() {
        return None;
    }

    // The owner of the least-penetration edge provides the contact edge;
    // the other body provides the penetrating vertex.
    let (vertex_body, vertex_body_idx, edge_body, edge_body_idx) = if edge_owner_is_b {
        (body_a, a_idx, body_b, b_idx)
    } else {
        (body_b, b_idx, body_a, a_idx)
    };

    // Orient the normal from the edge body towards the vertex body
    let mut normal = best_normal;
    if normal.dot(vertex_body.center - edge_body.center) < 0.0 {
        normal = -normal;
    }

    // The penetrating vertex is the vertex-body vertex lying deepest
    // against the normal, measured from the edge body's center.
    let mut smallest = f64::INFINITY;
    let mut vertex_idx = 0usize;
    for (i, vertex) in vertex_body.vertices().iter().enumerate() {
        let distance = normal.dot(vertex.position - edge_body.center);
        if distance < smallest {
            smallest = distance;
            vertex_idx = i;
        }
    }

    Some(CollisionManifold {
        vertex_body_idx,
        edge_body_idx,
        normal,
        depth,
        edge_idx: best_edge,
        vertex_idx,
    })
}

/// Positional response for a detected contact.
///
/// The penetrating vertex and the contact edge are pushed apart along the
/// normal by half the depth each. The edge half is split between the two
/// endpoints according to where the vertex sits along the edge, so an
/// off-center hit rotates the edge instead of translating it.
pub fn resolve_collision(
    vertex_body: &mut PhysicsBody,
    edge_body: &mut PhysicsBody,
    manifold: &CollisionManifold,
) {
    let push = manifold.normal * manifold.depth;

    let edge = edge_body.edges()[manifold.edge_idx];
    let e1 = edge_body.vertices()[edge.v1].position;
    let e2 = edge_body.vertices()[edge.v2].position;
    let v = vertex_body.vertices()[manifold.vertex_idx].position;

    // Parameter of the corrected vertex along the contact edge, taken on
    // the dominant axis so the divisor cannot vanish for a non-degenerate
    // edge.
    let t = if (e1.x - e2.x).abs() > (e1.y - e2.y).abs() {
        (v.x - push.x - e1.x) / (e2.x - e1.x)
    } else {
        (v.y - push.y - e1.y) / (e2.y - e1.y)
    };
    if !t.is_finite() {
        log::debug!("degenerate contact edge, skipping collision response");
        return;
    }

    // 1/(t² + (1-t)²) rescales the endpoint shares so the edge point at
    // parameter t moves exactly half the penetration.
    let lambda = 1.0 / (t * t + (1.0 - t) * (1.0 - t));

    {
        let vertices = edge_body.vertices_mut();
        vertices[edge.v1].position -= push * ((1.0 - t) * 0.5 * lambda);
        vertices[edge.v2].position -= push * (t * 0.5 * lambda);
    }
    vertex_body.vertices_mut()[manifold.vertex_idx].position += push * 0.5;
}
