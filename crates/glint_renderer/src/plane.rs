//! Infinite plane primitive.

use std::sync::Arc;

use glint_core::Material;
use glint_math::{Ray, Vec3, EPSILON};

use crate::shape::Hit;

/// An infinite plane defined by an anchor point and a coefficient
/// vector. The coefficient need not be unit length; it is normalized at
/// construction to serve as the plane normal.
pub struct Plane {
    origin: Vec3,
    normal: Vec3,
    material: Arc<Material>,
}

impl Plane {
    /// Create a plane through `origin` with the given (possibly
    /// non-unit) coefficient vector.
    pub fn new(origin: Vec3, coefficient: Vec3, material: Arc<Material>) -> Self {
        Self {
            origin,
            normal: coefficient.normalize(),
            material,
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Ray-plane intersection.
    ///
    /// A denominator within `EPSILON` of zero means the ray runs
    /// parallel to the plane and misses.
    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        let denominator = ray.direction().dot(self.normal);
        if denominator.abs() < EPSILON {
            return None;
        }

        let t = (self.origin - ray.origin()).dot(self.normal) / denominator;
        if t < EPSILON {
            return None;
        }

        Some(Hit {
            t,
            point: ray.at(t),
            normal: self.normal,
            material: Arc::clone(&self.material),
            uv: None,
            texture: None,
        })
    }
}
