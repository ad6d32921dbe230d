pub mod math;
pub mod objects;
pub mod constraints;
pub mod integration;
pub mod collision;
pub mod world;

// Re-export key types for easier use
pub use math::vec2::Vec2;
pub use objects::{BodyError, Edge, MinMax, PhysicsBody, Vertex};
pub use collision::{CollisionManifold, AABB};
pub use world::PhysicsWorld;
