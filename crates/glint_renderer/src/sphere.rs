//! Sphere primitive.

use std::f32::consts::PI;
use std::sync::Arc;

use glint_core::{Material, Texture};
use glint_math::{Ray, Vec3, EPSILON};

use crate::shape::Hit;

/// A sphere with center, radius, material, and an optional texture
/// mapped by spherical projection.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<Material>,
    texture: Option<Arc<Texture>>,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: Arc<Material>) -> Self {
        Self {
            center,
            radius,
            material,
            texture: None,
        }
    }

    /// Attach a texture, sampled by spherical UV at shading time.
    pub fn with_texture(mut self, texture: Arc<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Spherical UV projection of the unit direction from the sphere
    /// center to the hit point. Both coordinates clamp to non-negative.
    fn spherical_uv(direction: Vec3) -> (f32, f32) {
        let u = 0.5 + direction.z.atan2(direction.x) / (2.0 * PI);
        let v = 0.5 - direction.y.asin() / PI;
        (u.max(0.0), v.max(0.0))
    }

    /// Ray-sphere intersection by the classic quadratic, solved with
    /// the numerically stable root selection (`q` picks the sign that
    /// avoids catastrophic cancellation).
    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        let oc = ray.origin() - self.center;
        let a = ray.direction().dot(ray.direction());
        let b = 2.0 * oc.dot(ray.direction());
        let c = oc.dot(oc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let q = if b > 0.0 {
            -0.5 * (b + discriminant.sqrt())
        } else {
            -0.5 * (b - discriminant.sqrt())
        };
        let mut t0 = q / a;
        let mut t1 = c / q;
        if t0 < t1 {
            std::mem::swap(&mut t0, &mut t1);
        }

        // t0 is now the far root. If even that is behind the epsilon
        // margin there is nothing to hit.
        if t0 < EPSILON {
            return None;
        }
        let t = if t1 >= 0.0 { t1 } else { t0 };

        let point = ray.at(t);
        let normal = (point - self.center).normalize();
        let uv = self.texture.as_ref().map(|_| Self::spherical_uv(normal));

        Some(Hit {
            t,
            point,
            normal,
            material: Arc::clone(&self.material),
            uv,
            texture: self.texture.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_sphere() -> Sphere {
        Sphere::new(
            Vec3::ZERO,
            1.0,
            Arc::new(Material::named("ball").with_diffuse(Vec3::splat(0.5))),
        )
    }

    #[test]
    fn test_through_center_returns_near_root() {
        // From 5 units out, straight at the center: near surface at 4.
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = unit_sphere().intersect(&ray).unwrap();

        assert!((hit.t - 4.0).abs() < 1e-4);
        assert!((hit.point - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-4);
        assert!((hit.normal - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-4);
    }

    #[test]
    fn test_miss() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 1.0, 0.0));
        assert!(unit_sphere().intersect(&ray).is_none());
    }

    #[test]
    fn test_from_inside_picks_far_root() {
        // Origin inside the sphere: the near root is negative, so the
        // exit point is returned.
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));
        let hit = unit_sphere().intersect(&ray).unwrap();

        assert!((hit.t - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_sphere_fully_behind_ray() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(unit_sphere().intersect(&ray).is_none());
    }

    #[test]
    fn test_uv_only_with_texture() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(unit_sphere().intersect(&ray).unwrap().uv.is_none());

        let textured = unit_sphere().with_texture(Arc::new(Texture::solid(Vec3::ONE)));
        let hit = textured.intersect(&ray).unwrap();
        let (u, v) = hit.uv.unwrap();

        // Hit direction (0,0,1): u = 0.5 + atan2(1,0)/2pi = 0.75,
        // v = 0.5 on the equator.
        assert!((u - 0.75).abs() < 1e-5);
        assert!((v - 0.5).abs() < 1e-5);
    }
}
