pub mod aabb;
pub mod manifold;
pub mod sat;

// Re-export key types
pub use aabb::AABB;
pub use manifold::CollisionManifold;
pub use sat::{detect_collision, resolve_collision};
