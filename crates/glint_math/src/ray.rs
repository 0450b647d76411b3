//! Ray type for intersection queries.
//!
//! A ray is an origin point plus a direction vector. Intersection
//! routines compare hit parameters as distances, so callers are
//! expected to hand in a unit-length direction.

use glam::Vec3;

/// A ray with origin and direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Origin point of the ray
    origin: Vec3,
    /// Direction vector (callers normalize before tracing)
    direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Create a ray aimed from `origin` toward `destination`.
    ///
    /// The direction is normalized, which is what the tracer wants when
    /// it is handed frustum corner points rather than directions.
    #[inline]
    pub fn toward(origin: Vec3, destination: Vec3) -> Self {
        Self {
            origin,
            direction: (destination - origin).normalize(),
        }
    }

    /// Get the ray's origin point.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the ray's direction vector.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Compute a point along the ray at parameter t.
    /// P(t) = origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::Z,
        }
    }
}
