use crate::{
    collision::{self, CollisionManifold},
    integration::integrator,
    math::vec2::Vec2,
    objects::{BodyError, PhysicsBody},
};

/// Owns all bodies and drives the simulation: Verlet integration followed
/// by iterated constraint relaxation and collision resolution.
pub struct PhysicsWorld {
    bodies: Vec<PhysicsBody>,
    /// Acceleration applied to every vertex each step.
    pub gravity: Vec2,
    /// Relaxation/collision iterations per step. More iterations make
    /// bodies stiffer at proportional cost.
    pub iterations: usize,
}

impl PhysicsWorld {
    const DEFAULT_ITERATIONS: usize = 10;

    /// Creates a new, empty world with default settings (y-down gravity).
    pub fn new() -> Self {
        Self {
            bodies: Vec::new(),
            gravity: Vec2::new(0.0, 981.0),
            iterations: Self::DEFAULT_ITERATIONS,
        }
    }

    /// Registers a body and returns its index.
    ///
    /// A body with no vertices is rejected: projection and the center
    /// recompute both require at least one vertex. Registration computes
    /// the body's derived state so `center` and `aabb` are valid from the
    /// start.
    pub fn add_body(&mut self, mut body: PhysicsBody) -> Result<usize, BodyError> {
        if body.vertex_count() == 0 {
            return Err(BodyError::EmptyBody);
        }
        body.calculate_center();
        let index = self.bodies.len();
        self.bodies.push(body);
        Ok(index)
    }

    pub fn bodies(&self) -> &[PhysicsBody] {
        &self.bodies
    }

    pub fn body(&self, index: usize) -> &PhysicsBody {
        &self.bodies[index]
    }

    pub fn body_mut(&mut self, index: usize) -> &mut PhysicsBody {
        &mut self.bodies[index]
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Advances the simulation by one time step `dt`.
    pub fn step(&mut self, dt: f64) {
        if dt <= 0.0 {
            return;
        }

        // 1. Integrate every vertex; gravity enters as an acceleration
        for body in self.bodies.iter_mut() {
            integrator::integrate(body, self.gravity, dt);
        }

        // 2. Relax constraints and resolve contacts, several times, so
        //    corrections can propagate through the vertex network
        for _ in 0..self.iterations {
            for body in self.bodies.iter_mut() {
                body.relax_edges();
                body.apply_constraints();
                body.calculate_center();
            }
            self.resolve_contacts();
        }
    }

    /// One detection/response sweep over all body pairs whose bounding
    /// boxes overlap.
    fn resolve_contacts(&mut self) {
        for i in 0..self.bodies.len() {
            for j in (i + 1)..self.bodies.len() {
                if !self.bodies[i].aabb.overlaps(&self.bodies[j].aabb) {
                    continue;
                }

                let manifold =
                    collision::detect_collision(&self.bodies[i], i, &self.bodies[j], j);
                if let Some(manifold) = manifold {
                    self.apply_response(&manifold);
                }
            }
        }
    }

    /// Pushes the two bodies named by `manifold` apart and refreshes
    /// their derived state for the rest of the sweep.
    fn apply_response(&mut self, manifold: &CollisionManifold) {
        let (vertex_body, edge_body) = body_pair_mut(
            &mut self.bodies,
            manifold.vertex_body_idx,
            manifold.edge_body_idx,
        );
        collision::resolve_collision(vertex_body, edge_body, manifold);
        vertex_body.calculate_center();
        edge_body.calculate_center();
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper to safely get mutable references to two distinct bodies in a
/// slice. Panics if the indices are equal or out of bounds; manifolds
/// always name two different bodies.
pub(crate) fn body_pair_mut(
    bodies: &mut [PhysicsBody],
    idx_a: usize,
    idx_b: usize,
) -> (&mut PhysicsBody, &mut PhysicsBody) {
    if idx_a == idx_b {
        panic!("A collision cannot involve a body twice");
    }
    if idx_a >= bodies.len() || idx_b >= bodies.len() {
        panic!("Body index out of bounds");
    }

    // Ensure a < b for split_at_mut
    if idx_a < idx_b {
        let (slice_a, slice_b) = bodies.split_at_mut(idx_b);
        (&mut slice_a[idx_a], &mut slice_b[0])
    } else {
        let (slice_b, slice_a) = bodies.split_at_mut(idx_a);
        (&mut slice_a[0], &mut slice_b[idx_b])
    }
}
