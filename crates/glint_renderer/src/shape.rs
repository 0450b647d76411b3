//! The closed set of shape variants and the hit record they produce.

use std::sync::Arc;

use glint_core::{Material, Texture};
use glint_math::{Ray, Vec3};

use crate::{MeshObject, Plane, Sphere, Triangle};

/// Result of a successful ray-shape intersection.
///
/// Every intersection call returns its own record by value; nothing is
/// cached on the shape between calls, so recursive traces and parallel
/// pixels can intersect the same shape freely. For meshes the record
/// carries the struck sub-triangle's material and UV, which is how
/// per-triangle materials reach the shading stage.
#[derive(Clone)]
pub struct Hit {
    /// Ray parameter of the hit (a distance, since directions are unit)
    pub t: f32,
    /// World-space intersection point
    pub point: Vec3,
    /// Unit surface normal at the hit
    pub normal: Vec3,
    /// Material to shade with (shared, never copied per shape)
    pub material: Arc<Material>,
    /// Texture coordinates, when the shape maps a texture
    pub uv: Option<(f32, f32)>,
    /// Texture attached to the shape, sampled into the diffuse term
    pub texture: Option<Arc<Texture>>,
}

impl Hit {
    /// Diffuse color for this hit: the sampled texture color when a
    /// texture and UV are present, otherwise the material's diffuse
    /// channel. The texture overrides the channel outright, which is
    /// also what makes a textured shape shadeable without a `Kd` entry.
    pub fn effective_diffuse(&self) -> Option<Vec3> {
        match (&self.texture, self.uv) {
            (Some(texture), Some((u, v))) => Some(texture.sample(u, v)),
            _ => self.material.diffuse(),
        }
    }
}

/// A renderable shape.
///
/// A closed enum rather than a trait object: the set of primitives is
/// fixed and small, and every variant shares only the intersection
/// contract. Dispatch happens in one place, [`Shape::intersect`].
pub enum Shape {
    Plane(Plane),
    Sphere(Sphere),
    Triangle(Triangle),
    Mesh(MeshObject),
}

impl Shape {
    /// Intersect a ray with this shape.
    ///
    /// Returns `None` for misses, near-parallel geometry, and hits with
    /// `t < EPSILON` (self-intersection guard). Degenerate input never
    /// escalates past "no intersection".
    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        match self {
            Shape::Plane(plane) => plane.intersect(ray),
            Shape::Sphere(sphere) => sphere.intersect(ray),
            Shape::Triangle(triangle) => triangle.intersect(ray),
            Shape::Mesh(mesh) => mesh.intersect(ray),
        }
    }
}

impl From<Plane> for Shape {
    fn from(plane: Plane) -> Self {
        Shape::Plane(plane)
    }
}

impl From<Sphere> for Shape {
    fn from(sphere: Sphere) -> Self {
        Shape::Sphere(sphere)
    }
}

impl From<Triangle> for Shape {
    fn from(triangle: Triangle) -> Self {
        Shape::Triangle(triangle)
    }
}

impl From<MeshObject> for Shape {
    fn from(mesh: MeshObject) -> Self {
        Shape::Mesh(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_diffuse_prefers_texture() {
        let material = Arc::new(
            Material::named("base").with_diffuse(Vec3::new(0.1, 0.1, 0.1)),
        );
        let texture = Arc::new(Texture::solid(Vec3::new(0.9, 0.0, 0.0)));

        let hit = Hit {
            t: 1.0,
            point: Vec3::ZERO,
            normal: Vec3::Y,
            material: material.clone(),
            uv: Some((0.5, 0.5)),
            texture: Some(texture),
        };
        assert_eq!(hit.effective_diffuse(), Some(Vec3::new(0.9, 0.0, 0.0)));

        // Without a texture the material channel wins.
        let plain = Hit {
            texture: None,
            ..hit.clone()
        };
        assert_eq!(plain.effective_diffuse(), Some(Vec3::new(0.1, 0.1, 0.1)));
    }

    #[test]
    fn test_effective_diffuse_absent_channel() {
        let hit = Hit {
            t: 1.0,
            point: Vec3::ZERO,
            normal: Vec3::Y,
            material: Arc::new(Material::named("mirror").with_specular(Vec3::ONE)),
            uv: None,
            texture: None,
        };
        assert_eq!(hit.effective_diffuse(), None);
    }
}
