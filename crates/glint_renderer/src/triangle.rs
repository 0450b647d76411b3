//! Standalone triangle primitive and the shared ray-triangle routine.
//!
//! Intersection goes through the triangle's supporting plane and then a
//! barycentric inside test: the hit point is expressed in the two edge
//! vectors by solving the least-squares 2x2 system from their dot
//! products. The mesh shape reuses the same routine per face.

use std::sync::Arc;

use glint_core::{Material, Texture};
use glint_math::{Ray, Vec3, EPSILON};

use crate::shape::Hit;

/// Ray-triangle intersection against vertices `v0, v1, v2`.
///
/// Returns the ray parameter and the barycentric coordinates `(a, b)`
/// of the hit (weights of `v1` and `v2`; `v0` carries `1-a-b`).
/// Rejects near-parallel rays, `t < EPSILON`, and points outside the
/// barycentric acceptance region `a >= -EPSILON, b >= -EPSILON,
/// a + b <= 1`.
pub(crate) fn intersect_triangle(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<(f32, f32, f32)> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let plane_normal = edge1.cross(edge2);
    let denominator = ray.direction().dot(plane_normal);
    if denominator.abs() < EPSILON {
        return None;
    }

    let t = (v0 - ray.origin()).dot(plane_normal) / denominator;
    if t < EPSILON {
        return None;
    }

    let point = ray.at(t);
    let (a, b) = barycentric(point, v0, edge1, edge2);
    if a < -EPSILON || b < -EPSILON || a + b > 1.0 {
        return None;
    }

    Some((t, a, b))
}

/// Barycentric coordinates of `point` relative to the triangle spanned
/// by `edge1 = v1 - v0` and `edge2 = v2 - v0`.
fn barycentric(point: Vec3, v0: Vec3, edge1: Vec3, edge2: Vec3) -> (f32, f32) {
    let to_point = point - v0;

    let d00 = edge1.dot(edge1);
    let d01 = edge1.dot(edge2);
    let d11 = edge2.dot(edge2);
    let d20 = to_point.dot(edge1);
    let d21 = to_point.dot(edge2);

    let denominator = d00 * d11 - d01 * d01;
    if denominator.abs() < f32::MIN_POSITIVE {
        // Degenerate (zero-area) triangle: report a point far outside
        // the acceptance region instead of dividing by zero.
        return (-1.0, -1.0);
    }

    let a = (d11 * d20 - d01 * d21) / denominator;
    let b = (d00 * d21 - d01 * d20) / denominator;
    (a, b)
}

/// A single triangle with per-vertex normals and optional texcoords.
pub struct Triangle {
    vertices: [Vec3; 3],
    normals: [Vec3; 3],
    texcoords: Option<[[f32; 2]; 3]>,
    material: Arc<Material>,
    texture: Option<Arc<Texture>>,
}

impl Triangle {
    /// Create a flat-shaded triangle: all three vertex normals are the
    /// face normal.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Arc<Material>) -> Self {
        let face_normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
        Self {
            vertices: [v0, v1, v2],
            normals: [face_normal; 3],
            texcoords: None,
            material,
            texture: None,
        }
    }

    /// Supply per-vertex normals for smooth shading.
    pub fn with_normals(mut self, n0: Vec3, n1: Vec3, n2: Vec3) -> Self {
        self.normals = [n0, n1, n2];
        self
    }

    /// Supply per-vertex texture coordinates.
    pub fn with_texcoords(mut self, texcoords: [[f32; 2]; 3]) -> Self {
        self.texcoords = Some(texcoords);
        self
    }

    /// Attach a texture, sampled at the barycentric UV blend.
    pub fn with_texture(mut self, texture: Arc<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        let [v0, v1, v2] = self.vertices;
        let (t, a, b) = intersect_triangle(ray, v0, v1, v2)?;

        // Interpolate the vertex normals at the hit and re-normalize.
        let normal = ((1.0 - a - b) * self.normals[0]
            + a * self.normals[1]
            + b * self.normals[2])
            .normalize();

        let uv = self
            .texcoords
            .map(|texcoords| Texture::barycentric_uv(a, b, texcoords));

        Some(Hit {
            t,
            point: ray.at(t),
            normal,
            material: Arc::clone(&self.material),
            uv,
            texture: self.texture.clone(),
        })
    }
}
