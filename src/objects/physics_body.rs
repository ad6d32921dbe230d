use crate::collision::AABB;
use crate::constraints::{edge_length, quad_shape};
use crate::math::vec2::Vec2;
use super::edge::Edge;
use super::vertex::Vertex;

/// Projection interval of a body's vertices onto an axis.
///
/// Built fresh per `project_to_axis` call; carries no identity beyond the
/// two scalars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMax {
    pub min: f64,
    pub max: f64,
}

impl MinMax {
    /// Signed gap between two intervals: positive when they are disjoint,
    /// negative when they overlap (magnitude = overlap length).
    pub fn interval_distance(&self, other: &MinMax) -> f64 {
        if self.min < other.min {
            other.min - self.max
        } else {
            self.min - other.max
        }
    }
}

/// Fatal configuration errors raised while assembling a body. None of
/// these are recoverable at runtime; they indicate a broken setup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BodyError {
    #[error("body already holds the maximum of {max} vertices")]
    TooManyVertices { max: usize },

    #[error("body already holds the maximum of {max} edges")]
    TooManyEdges { max: usize },

    #[error("edge endpoint {index} does not name one of the body's {count} vertices")]
    InvalidVertexIndex { index: usize, count: usize },

    #[error("an edge cannot join vertex {index} to itself")]
    SelfEdge { index: usize },

    #[error("a body must hold at least one vertex before it is registered")]
    EmptyBody,
}

/// A deformable body: Verlet vertices tied together by distance-constraint
/// edges.
///
/// `center` and `aabb` are derived state. They go stale the moment a
/// vertex moves and stay stale until `calculate_center` runs; readers
/// (broad-phase culling, collision orientation) must recompute first.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsBody {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    /// Total mass of the body.
    pub mass: f64,
    /// Centroid of the vertex positions, as of the last `calculate_center`.
    pub center: Vec2,
    /// Bounding box of the vertex positions, as of the last `calculate_center`.
    pub aabb: AABB,
    shape_constrained: bool,
}

impl PhysicsBody {
    /// Upper bound on the vertices a single body may hold.
    pub const MAX_VERTICES: usize = 10;
    /// Upper bound on the edges a single body may hold.
    pub const MAX_EDGES: usize = 20;

    /// Creates an empty body with the given mass. Vertices and edges are
    /// added afterwards; the body becomes usable once it is registered
    /// with a world.
    pub fn new(mass: f64) -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
            mass,
            center: Vec2::ZERO,
            aabb: AABB::new(Vec2::ZERO, Vec2::ZERO),
            shape_constrained: false,
        }
    }

    /// Appends a vertex at rest and returns its index within this body.
    pub fn add_vertex(&mut self, position: Vec2) -> Result<usize, BodyError> {
        if self.vertices.len() == Self::MAX_VERTICES {
            return Err(BodyError::TooManyVertices {
                max: Self::MAX_VERTICES,
            });
        }
        self.vertices.push(Vertex::new(position));
        Ok(self.vertices.len() - 1)
    }

    /// Appends an edge between two existing vertices and returns its
    /// index. The current distance between the endpoints is captured as
    /// the rest length.
    pub fn add_edge(
        &mut self,
        v1: usize,
        v2: usize,
        is_structural: bool,
    ) -> Result<usize, BodyError> {
        if self.edges.len() == Self::MAX_EDGES {
            return Err(BodyError::TooManyEdges {
                max: Self::MAX_EDGES,
            });
        }
        let count = self.vertices.len();
        for index in [v1, v2] {
            if index >= count {
                return Err(BodyError::InvalidVertexIndex { index, count });
            }
        }
        if v1 == v2 {
            return Err(BodyError::SelfEdge { index: v1 });
        }
        let rest_length = self.vertices[v1]
            .position
            .distance(self.vertices[v2].position);
        self.edges.push(Edge::new(v1, v2, rest_length, is_structural));
        Ok(self.edges.len() - 1)
    }

    /// Builds an axis-aligned box anchored at `(x, y)`: four corner
    /// vertices in perimeter order, four structural perimeter edges, and
    /// two shear diagonals.
    pub fn create_box(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), BodyError> {
        let v1 = self.add_vertex(Vec2::new(x, y))?;
        let v2 = self.add_vertex(Vec2::new(x + width, y))?;
        let v3 = self.add_vertex(Vec2::new(x + width, y + height))?;
        let v4 = self.add_vertex(Vec2::new(x, y + height))?;

        self.add_edge(v1, v2, true)?;
        self.add_edge(v2, v3, true)?;
        self.add_edge(v3, v4, true)?;
        self.add_edge(v4, v1, true)?;

        self.add_edge(v1, v3, false)?;
        self.add_edge(v2, v4, false)?;

        Ok(())
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Mutable access to the vertex sequence, for the integrator and for
    /// drivers that reposition vertices directly. The sequence itself is
    /// append-only; only `add_vertex` can grow it.
    pub fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Projects every vertex onto `axis` and returns the covered interval.
    ///
    /// Pure read of the current positions; the body must hold at least
    /// one vertex (registered bodies always do).
    pub fn project_to_axis(&self, axis: Vec2) -> MinMax {
        debug_assert!(
            !self.vertices.is_empty(),
            "projecting a body with no vertices"
        );
        let mut dot = axis.dot(self.vertices[0].position);
        let mut data = MinMax { min: dot, max: dot };

        for vertex in &self.vertices[1..] {
            dot = axis.dot(vertex.position);
            data.min = data.min.min(dot);
            data.max = data.max.max(dot);
        }

        data
    }

    /// Recomputes the centroid and the bounding box in a single pass over
    /// the vertices. Call after the vertices moved and before `center` or
    /// `aabb` are read.
    pub fn calculate_center(&mut self) {
        if self.vertices.is_empty() {
            return;
        }

        let mut sum = Vec2::ZERO;
        let mut min = self.vertices[0].position;
        let mut max = self.vertices[0].position;

        for vertex in &self.vertices {
            let p = vertex.position;
            sum += p;
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }

        self.center = sum / self.vertices.len() as f64;
        self.aabb = AABB::new(min, max);
    }

    /// One relaxation pass restoring every structural edge to its rest
    /// length.
    pub fn relax_edges(&mut self) {
        edge_length::relax_edges(&mut self.vertices, &self.edges);
    }

    /// Enables the four-vertex shape-preservation pass. Idempotent; the
    /// flag is never cleared.
    pub fn add_constraints(&mut self) {
        self.shape_constrained = true;
    }

    pub fn is_shape_constrained(&self) -> bool {
        self.shape_constrained
    }

    /// Runs the quad shape pass when enabled. A no-op for bodies that
    /// never called `add_constraints`.
    pub fn apply_constraints(&mut self) {
        if !self.shape_constrained {
            return;
        }
        quad_shape::relax_quad(&mut self.vertices);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-10;

    fn box_body() -> PhysicsBody {
        let mut body = PhysicsBody::new(1.0);
        body.create_box(0.0, 0.0, 10.0, 10.0).unwrap();
        body
    }

    #[test]
    fn test_add_vertex_returns_sequential_indices() {
        let mut body = PhysicsBody::new(1.0);
        assert_eq!(body.add_vertex(Vec2::ZERO), Ok(0));
        assert_eq!(body.add_vertex(Vec2::new(1.0, 0.0)), Ok(1));
        assert_eq!(body.vertex_count(), 2);
    }

    #[test]
    fn test_add_vertex_capacity_overflow() {
        let mut body = PhysicsBody::new(1.0);
        for i in 0..PhysicsBody::MAX_VERTICES {
            body.add_vertex(Vec2::new(i as f64, 0.0)).unwrap();
        }
        assert_eq!(
            body.add_vertex(Vec2::ZERO),
            Err(BodyError::TooManyVertices {
                max: PhysicsBody::MAX_VERTICES
            })
        );
        // Nothing was silently appended
        assert_eq!(body.vertex_count(), PhysicsBody::MAX_VERTICES);
    }

    #[test]
    fn test_add_edge_captures_rest_length() {
        let mut body = PhysicsBody::new(1.0);
        body.add_vertex(Vec2::new(0.0, 0.0)).unwrap();
        body.add_vertex(Vec2::new(3.0, 4.0)).unwrap();
        let idx = body.add_edge(0, 1, true).unwrap();
        assert_eq!(idx, 0);
        // 3-4-5 triangle
        assert!((body.edges()[0].rest_length - 5.0).abs() < EPSILON);
    }

    #[test]
    fn test_add_edge_rejects_bad_endpoints() {
        let mut body = PhysicsBody::new(1.0);
        body.add_vertex(Vec2::ZERO).unwrap();
        assert_eq!(
            body.add_edge(0, 5, true),
            Err(BodyError::InvalidVertexIndex { index: 5, count: 1 })
        );
        assert_eq!(body.add_edge(0, 0, true), Err(BodyError::SelfEdge { index: 0 }));
        assert_eq!(body.edge_count(), 0);
    }

    #[test]
    fn test_add_edge_capacity_overflow() {
        let mut body = PhysicsBody::new(1.0);
        body.add_vertex(Vec2::new(0.0, 0.0)).unwrap();
        body.add_vertex(Vec2::new(1.0, 0.0)).unwrap();
        for _ in 0..PhysicsBody::MAX_EDGES {
            body.add_edge(0, 1, false).unwrap();
        }
        assert_eq!(
            body.add_edge(0, 1, false),
            Err(BodyError::TooManyEdges {
                max: PhysicsBody::MAX_EDGES
            })
        );
    }

    #[test]
    fn test_create_box_layout() {
        let body = box_body();

        assert_eq!(body.vertex_count(), 4);
        assert_eq!(body.vertices()[0].position, Vec2::new(0.0, 0.0));
        assert_eq!(body.vertices()[1].position, Vec2::new(10.0, 0.0));
        assert_eq!(body.vertices()[2].position, Vec2::new(10.0, 10.0));
        assert_eq!(body.vertices()[3].position, Vec2::new(0.0, 10.0));

        assert_eq!(body.edge_count(), 6);
        // Perimeter edges first, in order
        let perimeter = [(0, 1), (1, 2), (2, 3), (3, 0)];
        for (i, &(a, b)) in perimeter.iter().enumerate() {
            let edge = body.edges()[i];
            assert!(edge.is_structural);
            assert_eq!((edge.v1, edge.v2), (a, b));
            assert!((edge.rest_length - 10.0).abs() < EPSILON);
        }
        // Then the two shear diagonals
        let d1 = body.edges()[4];
        let d2 = body.edges()[5];
        assert!(!d1.is_structural);
        assert!(!d2.is_structural);
        assert_eq!((d1.v1, d1.v2), (0, 2));
        assert_eq!((d2.v1, d2.v2), (1, 3));
        assert!((d1.rest_length - 200.0f64.sqrt()).abs() < EPSILON);
    }

    #[test]
    fn test_project_to_axis_box() {
        let body = box_body();

        let x_axis = body.project_to_axis(Vec2::new(1.0, 0.0));
        assert!((x_axis.min - 0.0).abs() < EPSILON);
        assert!((x_axis.max - 10.0).abs() < EPSILON);

        let y_axis = body.project_to_axis(Vec2::new(0.0, 1.0));
        assert!((y_axis.min - 0.0).abs() < EPSILON);
        assert!((y_axis.max - 10.0).abs() < EPSILON);
    }

    #[test]
    fn test_project_to_axis_extremes_are_attained() {
        let body = box_body();
        let axis = Vec2::new(0.6, 0.8);
        let interval = body.project_to_axis(axis);

        assert!(interval.min <= interval.max);
        let projections: Vec<f64> = body
            .vertices()
            .iter()
            .map(|v| axis.dot(v.position))
            .collect();
        assert!(projections.iter().any(|p| (p - interval.min).abs() < EPSILON));
        assert!(projections.iter().any(|p| (p - interval.max).abs() < EPSILON));
    }

    #[test]
    fn test_minmax_interval_distance() {
        let a = MinMax { min: 0.0, max: 4.0 };
        let b = MinMax { min: 6.0, max: 9.0 };
        // Disjoint: positive gap of 2 either way around
        assert!((a.interval_distance(&b) - 2.0).abs() < EPSILON);
        assert!((b.interval_distance(&a) - 2.0).abs() < EPSILON);

        let c = MinMax { min: 3.0, max: 7.0 };
        // Overlapping by 1
        assert!((a.interval_distance(&c) - -1.0).abs() < EPSILON);
    }

    #[test]
    fn test_calculate_center_mean_and_bounds() {
        let mut body = PhysicsBody::new(2.0);
        body.add_vertex(Vec2::new(0.0, 0.0)).unwrap();
        body.add_vertex(Vec2::new(4.0, 0.0)).unwrap();
        body.add_vertex(Vec2::new(4.0, 2.0)).unwrap();
        body.add_vertex(Vec2::new(0.0, 2.0)).unwrap();

        body.calculate_center();

        assert!((body.center.x - 2.0).abs() < EPSILON);
        assert!((body.center.y - 1.0).abs() < EPSILON);
        for vertex in body.vertices() {
            assert!(body.aabb.contains(vertex.position));
        }
    }

    #[test]
    fn test_calculate_center_idempotent() {
        let mut body = box_body();
        body.calculate_center();
        let center = body.center;
        let aabb = body.aabb;

        body.calculate_center();
        assert_eq!(body.center, center);
        assert_eq!(body.aabb, aabb);
    }

    #[test]
    fn test_bounding_box_tracks_vertical_extent() {
        // The y extremes differ from the x extremes, so a bounding box
        // whose max.y was fed from the x pass would come out wrong here.
        let mut body = PhysicsBody::new(1.0);
        body.add_vertex(Vec2::new(-2.0, 30.0)).unwrap();
        body.add_vertex(Vec2::new(5.0, -7.0)).unwrap();
        body.add_vertex(Vec2::new(1.0, 12.0)).unwrap();

        body.calculate_center();

        assert!((body.aabb.min.x - -2.0).abs() < EPSILON);
        assert!((body.aabb.max.x - 5.0).abs() < EPSILON);
        assert!((body.aabb.min.y - -7.0).abs() < EPSILON);
        assert!((body.aabb.max.y - 30.0).abs() < EPSILON);
    }

    #[test]
    fn test_apply_constraints_noop_when_unconstrained() {
        let mut body = box_body();
        body.vertices_mut()[0].position = Vec2::new(3.0, 4.0);
        let before: Vec<Vertex> = body.vertices().to_vec();

        body.apply_constraints();

        assert_eq!(body.vertices(), &before[..]);
        assert!(!body.is_shape_constrained());
    }

    #[test]
    fn test_add_constraints_is_idempotent() {
        let mut body = box_body();
        body.add_constraints();
        body.add_constraints();
        assert!(body.is_shape_constrained());
    }

    #[test]
    fn test_apply_constraints_deterministic() {
        let mut a = box_body();
        a.add_constraints();
        a.vertices_mut()[0].position = Vec2::new(1.0, 2.5);
        a.vertices_mut()[2].position = Vec2::new(11.0, 9.0);
        let mut b = a.clone();

        a.apply_constraints();
        b.apply_constraints();

        assert_eq!(a.vertices(), b.vertices());
    }

    #[test]
    fn test_apply_constraints_skips_small_bodies() {
        let mut body = PhysicsBody::new(1.0);
        body.add_vertex(Vec2::new(0.0, 0.0)).unwrap();
        body.add_vertex(Vec2::new(1.0, 0.0)).unwrap();
        body.add_constraints();
        let before: Vec<Vertex> = body.vertices().to_vec();

        body.apply_constraints();

        assert_eq!(body.vertices(), &before[..]);
    }
}
