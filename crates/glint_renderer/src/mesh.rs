//! Mesh shape: a world-anchored triangle mesh.
//!
//! Intersection scans every face and keeps the nearest valid hit. The
//! struck face's material and UV travel back inside the returned hit
//! record, so shading sees the per-triangle material without any state
//! left behind on the mesh.

use std::sync::Arc;

use glint_core::{Mesh, Texture};
use glint_math::{Ray, Vec3};

use crate::shape::Hit;
use crate::triangle::intersect_triangle;

/// A mesh placed in the scene at a world-space anchor.
pub struct MeshObject {
    origin: Vec3,
    mesh: Arc<Mesh>,
    texture: Option<Arc<Texture>>,
}

impl MeshObject {
    /// Place `mesh` with its vertices offset by `origin`.
    pub fn new(mesh: Arc<Mesh>, origin: Vec3) -> Self {
        Self {
            origin,
            mesh,
            texture: None,
        }
    }

    /// Attach a texture shared by all textured faces.
    pub fn with_texture(mut self, texture: Arc<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Intersect against every face, keeping the nearest hit.
    ///
    /// No early exit and no acceleration structure: the reference
    /// behavior is an exhaustive linear scan.
    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        let mut nearest: Option<(f32, usize, f32, f32)> = None;

        for (face_index, face) in self.mesh.faces.iter().enumerate() {
            let [i0, i1, i2] = face.vertices.map(|i| i as usize);
            let (Some(&p0), Some(&p1), Some(&p2)) = (
                self.mesh.positions.get(i0),
                self.mesh.positions.get(i1),
                self.mesh.positions.get(i2),
            ) else {
                continue;
            };

            let v0 = p0 + self.origin;
            let v1 = p1 + self.origin;
            let v2 = p2 + self.origin;

            if let Some((t, a, b)) = intersect_triangle(ray, v0, v1, v2) {
                if nearest.map_or(true, |(best, _, _, _)| t < best) {
                    nearest = Some((t, face_index, a, b));
                }
            }
        }

        let (t, face_index, a, b) = nearest?;
        let face = &self.mesh.faces[face_index];
        let [i0, i1, i2] = face.vertices.map(|i| i as usize);

        let normal = self
            .interpolated_normal(i0, i1, i2, a, b)
            .unwrap_or_else(|| {
                // Mesh without vertex normals: fall back to the face plane.
                let v0 = self.mesh.positions[i0];
                (self.mesh.positions[i1] - v0)
                    .cross(self.mesh.positions[i2] - v0)
                    .normalize_or_zero()
            });

        let uv = match (&self.texture, self.mesh.face_texcoords(face)) {
            (Some(_), Some(texcoords)) => Some(Texture::barycentric_uv(a, b, texcoords)),
            _ => None,
        };

        Some(Hit {
            t,
            point: ray.at(t),
            normal,
            material: Arc::clone(self.mesh.material_for(face_index)),
            uv,
            texture: self.texture.clone(),
        })
    }

    /// Barycentric interpolation of the three vertex normals,
    /// re-normalized. `None` when the mesh carries no normals.
    fn interpolated_normal(
        &self,
        i0: usize,
        i1: usize,
        i2: usize,
        a: f32,
        b: f32,
    ) -> Option<Vec3> {
        let n0 = self.mesh.normals.get(i0)?;
        let n1 = self.mesh.normals.get(i1)?;
        let n2 = self.mesh.normals.get(i2)?;

        let normal = ((1.0 - a - b) * *n0 + a * *n1 + b * *n2).normalize_or_zero();
        (normal != Vec3::ZERO).then_some(normal)
    }
}
