//! Scene: the immutable world a render pass reads.
//!
//! A scene owns its shapes and point lights and is assembled once
//! before the first trace. The tracer only ever borrows it, so pixels
//! (and recursion within a pixel) share one scene with no locking.

use glint_math::{Ray, Vec3};

use crate::shape::{Hit, Shape};

/// The renderable world: shapes, point lights, and the recursion cap.
///
/// Lights are bare positions with no color or intensity; direct
/// illumination averages equally over all of them.
pub struct Scene {
    shapes: Vec<Shape>,
    lights: Vec<Vec3>,
    max_depth: u32,
}

impl Scene {
    /// Create an empty scene with the given maximum recursion depth.
    pub fn new(max_depth: u32) -> Self {
        Self {
            shapes: Vec::new(),
            lights: Vec::new(),
            max_depth,
        }
    }

    /// Add a shape (accepts any primitive via `Into<Shape>`).
    pub fn push_shape(&mut self, shape: impl Into<Shape>) {
        self.shapes.push(shape.into());
    }

    /// Add a point light at a position.
    pub fn push_light(&mut self, position: Vec3) {
        self.lights.push(position);
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn lights(&self) -> &[Vec3] {
        &self.lights
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Nearest intersection over all shapes: a full linear scan keeping
    /// the smallest positive distance, no early exit.
    pub fn nearest_hit(&self, ray: &Ray) -> Option<Hit> {
        let mut nearest: Option<Hit> = None;

        for shape in &self.shapes {
            if let Some(hit) = shape.intersect(ray) {
                if nearest.as_ref().map_or(true, |best| hit.t < best.t) {
                    nearest = Some(hit);
                }
            }
        }

        nearest
    }
}
