pub mod vec2;

// Re-export the vector type
pub use vec2::Vec2;
