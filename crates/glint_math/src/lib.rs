// Re-export glam for convenience
pub use glam::*;

// Glint math types
mod ray;
pub use ray::Ray;

/// Tolerance used to reject self-intersections and near-parallel geometry.
pub const EPSILON: f32 = 1e-4;
