//! The recursive Whitted tracer.
//!
//! `trace` maps (ray, depth) to a color: nearest-hit search, direct
//! Phong illumination with transparency-aware shadows, then recursion
//! for specular reflection and Fresnel-weighted refraction. Recursion
//! depth is the only state; the scene is read-only throughout.

use std::sync::Arc;

use glint_core::Material;
use glint_math::{Ray, Vec3, EPSILON};

use crate::scene::Scene;
use crate::shading::shade;
use crate::shape::Hit;

/// Trace a ray through the scene at the given recursion depth.
///
/// Reaching the scene's maximum depth is an absorbing boundary: the
/// result is exactly black, as is a ray that hits nothing.
pub fn trace(scene: &Scene, ray: &Ray, depth: u32) -> Vec3 {
    if depth >= scene.max_depth() {
        return Vec3::ZERO;
    }

    let Some(hit) = scene.nearest_hit(ray) else {
        return Vec3::ZERO;
    };

    let material = Arc::clone(&hit.material);
    let diffuse = hit.effective_diffuse();

    let mut color = direct_illumination(scene, ray.origin(), &hit, diffuse);

    // Negative when entering a surface from outside, positive when the
    // ray leaves a medium it is inside of.
    let cos_incident = ray.direction().dot(hit.normal);

    let fresnel_kr = material.refractive_index().map(|index| {
        let (n1, n2) = if cos_incident < 0.0 {
            (1.0, index)
        } else {
            (index, 1.0)
        };
        schlick(cos_incident, n1, n2)
    });

    // Specular reflection. When refraction is modeled too, the Fresnel
    // reflectance splits the energy; a mirror without a refractive
    // index keeps the legacy full weight of 1.
    if let Some(specular) = material.specular() {
        let reflected = Ray::new(hit.point, reflect(ray.direction(), hit.normal));
        let reflectance = fresnel_kr.unwrap_or(1.0);
        color += specular * reflectance * trace(scene, &reflected, depth + 1);
    }

    // Refraction through the surface.
    if let Some(kr) = fresnel_kr {
        color += refracted_contribution(scene, ray, &hit, &material, kr, depth);
    }

    color
}

/// Entry point taking an origin and a destination point: normalizes the
/// direction and starts the recursion at depth 0.
pub fn trace_toward(scene: &Scene, origin: Vec3, destination: Vec3) -> Vec3 {
    if (destination - origin).length_squared() <= EPSILON * EPSILON {
        return Vec3::ZERO;
    }
    trace(scene, &Ray::toward(origin, destination), 0)
}

/// Mirror `direction` about `normal`.
fn reflect(direction: Vec3, normal: Vec3) -> Vec3 {
    direction - 2.0 * direction.dot(normal) * normal
}

/// Schlick's approximation of the Fresnel reflectance at a boundary
/// between media with indices `n1` (incident side) and `n2`.
fn schlick(cos_incident: f32, n1: f32, n2: f32) -> f32 {
    let r0 = ((n1 - n2) / (n1 + n2)).powi(2);
    let cos_x = cos_incident.abs().min(1.0);
    r0 + (1.0 - r0) * (1.0 - cos_x).powi(5)
}

/// Direct illumination at a hit: per light, a shadow ray decides how
/// much of the Phong contribution survives; the total is the equal
/// weight average over all lights.
fn direct_illumination(scene: &Scene, camera_pos: Vec3, hit: &Hit, diffuse: Option<Vec3>) -> Vec3 {
    let lights = scene.lights();
    if lights.is_empty() {
        return Vec3::ZERO;
    }

    let mut total = Vec3::ZERO;

    for &light in lights {
        let to_light = light - hit.point;
        let distance = to_light.length();
        if distance <= EPSILON {
            // Light sits on the surface; nothing can be in between.
            total += shade(&hit.material, camera_pos, hit.point, light, hit.normal, diffuse);
            continue;
        }

        let shadow_ray = Ray::new(hit.point, to_light / distance);
        if let Some((attenuation, tint)) = shadow_transmission(scene, &shadow_ray, distance) {
            let local = shade(&hit.material, camera_pos, hit.point, light, hit.normal, diffuse);
            total += local * attenuation * tint;
        }
    }

    total / lights.len() as f32
}

/// How much light survives along a shadow ray, or `None` if the light
/// is fully blocked.
///
/// Blockers are walked nearest-first; each transparent blocker scales
/// the surviving fraction by `(1 - Tr)` and applies its ambient tint
/// exactly once, so stacked glass darkens and colors the shadow
/// deterministically. An opaque blocker ends the scan.
fn shadow_transmission(scene: &Scene, shadow_ray: &Ray, light_distance: f32) -> Option<(f32, Vec3)> {
    let mut blockers: Vec<(f32, Arc<Material>)> = Vec::new();
    for shape in scene.shapes() {
        if let Some(blocker) = shape.intersect(shadow_ray) {
            if blocker.t < light_distance {
                blockers.push((blocker.t, blocker.material));
            }
        }
    }
    blockers.sort_by(|lhs, rhs| lhs.0.total_cmp(&rhs.0));

    let mut attenuation = 1.0;
    let mut tint = Vec3::ONE;

    for (_, blocker) in &blockers {
        if blocker.is_opaque() {
            return None;
        }
        // Not opaque, so the transparency channel is present and < 1.
        let transparency = blocker.transparency().unwrap_or(1.0);
        attenuation *= 1.0 - transparency;
        if let Some(ambient) = blocker.ambient() {
            tint *= ambient;
        }
    }

    (attenuation > 0.0).then_some((attenuation, tint))
}

/// Refraction by Snell's law with the Schlick split.
///
/// The surface normal is flipped when the ray exits the medium so it
/// always opposes the incoming direction. A negative discriminant is
/// total internal reflection: the mirror direction substitutes for the
/// refracted one. The child ray's origin steps `EPSILON` along its
/// direction so it cannot re-hit the surface it just left.
fn refracted_contribution(
    scene: &Scene,
    ray: &Ray,
    hit: &Hit,
    material: &Material,
    kr: f32,
    depth: u32,
) -> Vec3 {
    // refractive_index is present on this path.
    let index = material.refractive_index().unwrap_or(1.0);

    let entering = ray.direction().dot(hit.normal) < 0.0;
    let normal = if entering { hit.normal } else { -hit.normal };
    let eta = if entering { 1.0 / index } else { index };

    let cos_in = -ray.direction().dot(normal);
    let discriminant = 1.0 - eta * eta * (1.0 - cos_in * cos_in);

    let direction = if discriminant < 0.0 {
        reflect(ray.direction(), normal)
    } else {
        (eta * ray.direction() + (eta * cos_in - discriminant.sqrt()) * normal).normalize_or_zero()
    };
    if direction == Vec3::ZERO {
        return Vec3::ZERO;
    }

    let refracted = Ray::new(hit.point + direction * EPSILON, direction);

    // Joint Fresnel split only when reflection is active on the same
    // material; a purely refractive surface keeps the legacy full
    // transmission weight.
    let transmission = if material.specular().is_some() {
        1.0 - kr
    } else {
        1.0
    };
    let weight = transmission * (1.0 - material.transparency().unwrap_or(0.0));
    if weight <= 0.0 {
        return Vec3::ZERO;
    }

    let mut contribution = trace(scene, &refracted, depth + 1) * weight;
    if let Some(filter) = material.transmission_filter() {
        contribution *= filter;
    }
    contribution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Plane, Sphere};

    fn diffuse_material(name: &str, color: Vec3) -> Arc<Material> {
        Arc::new(Material::named(name).with_diffuse(color))
    }

    #[test]
    fn test_max_depth_is_black() {
        let mut scene = Scene::new(3);
        scene.push_shape(Sphere::new(
            Vec3::new(0.0, 0.0, -5.0),
            1.0,
            diffuse_material("ball", Vec3::ONE),
        ));
        scene.push_light(Vec3::new(0.0, 5.0, 0.0));

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(trace(&scene, &ray, 3), Vec3::ZERO);
        // And anything past it, defensively exercised.
        assert_eq!(trace(&scene, &ray, 7), Vec3::ZERO);
    }

    #[test]
    fn test_no_hit_is_black() {
        let mut scene = Scene::new(5);
        scene.push_light(Vec3::new(0.0, 5.0, 0.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        assert_eq!(trace(&scene, &ray, 0), Vec3::ZERO);
    }

    /// Scenario A: plane with normal +Y at the origin, light straight
    /// above, ray straight down. The result is exactly the diffuse
    /// color: |dot| = 1, no shadow, no recursion.
    #[test]
    fn test_plane_directly_lit() {
        let diffuse_color = Vec3::new(0.7, 0.4, 0.2);
        let mut scene = Scene::new(5);
        scene.push_shape(Plane::new(
            Vec3::ZERO,
            Vec3::Y,
            diffuse_material("floor", diffuse_color),
        ));
        scene.push_light(Vec3::new(0.0, 5.0, 0.0));

        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let color = trace(&scene, &ray, 0);

        assert!((color - diffuse_color).length() < 1e-4);
    }

    #[test]
    fn test_opaque_blocker_kills_light() {
        let mut scene = Scene::new(5);
        scene.push_shape(Plane::new(
            Vec3::ZERO,
            Vec3::Y,
            diffuse_material("floor", Vec3::ONE),
        ));
        // Opaque sphere between the floor point and the light.
        scene.push_shape(Sphere::new(
            Vec3::new(0.0, 2.5, 0.0),
            0.5,
            diffuse_material("blocker", Vec3::ONE),
        ));
        scene.push_light(Vec3::new(0.0, 5.0, 0.0));

        // View from the side so the camera ray reaches the shadowed
        // floor point without touching the sphere itself.
        let ray = Ray::toward(Vec3::new(5.0, 1.0, 0.0), Vec3::ZERO);
        let color = trace(&scene, &ray, 0);

        assert_eq!(color, Vec3::ZERO);
    }

    #[test]
    fn test_transparent_blocker_attenuates_and_tints() {
        let floor = diffuse_material("floor", Vec3::ONE);
        let glass = Arc::new(
            Material::named("glass")
                .with_transparency(0.5)
                .with_ambient(Vec3::new(1.0, 0.5, 1.0)),
        );

        let mut scene = Scene::new(5);
        scene.push_shape(Plane::new(Vec3::ZERO, Vec3::Y, floor.clone()));
        scene.push_shape(Sphere::new(Vec3::new(0.0, 2.5, 0.0), 0.5, glass));
        scene.push_light(Vec3::new(0.0, 5.0, 0.0));

        // View from the side so the camera ray reaches the floor point
        // under the sphere unobstructed.
        let ray = Ray::toward(Vec3::new(5.0, 1.0, 0.0), Vec3::ZERO);
        let color = trace(&scene, &ray, 0);

        // Unshadowed reference on a sphere-free floor.
        let mut open = Scene::new(5);
        open.push_shape(Plane::new(Vec3::ZERO, Vec3::Y, floor));
        open.push_light(Vec3::new(0.0, 5.0, 0.0));
        let reference = trace(&open, &ray, 0);

        let expected = reference * 0.5 * Vec3::new(1.0, 0.5, 1.0);
        assert!((color - expected).length() < 1e-4);
    }

    #[test]
    fn test_light_average_not_sum() {
        let mut one = Scene::new(5);
        one.push_shape(Plane::new(
            Vec3::ZERO,
            Vec3::Y,
            diffuse_material("floor", Vec3::ONE),
        ));
        one.push_light(Vec3::new(0.0, 5.0, 0.0));

        let mut two = Scene::new(5);
        two.push_shape(Plane::new(
            Vec3::ZERO,
            Vec3::Y,
            diffuse_material("floor", Vec3::ONE),
        ));
        // Same light twice: the average must equal the single light.
        two.push_light(Vec3::new(0.0, 5.0, 0.0));
        two.push_light(Vec3::new(0.0, 5.0, 0.0));

        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let single = trace(&one, &ray, 0);
        let double = trace(&two, &ray, 0);

        assert!((single - double).length() < 1e-5);
        assert!(single.x > 0.0);
    }

    /// Scenario B: the reflected color is the direct color of whatever
    /// the mirror ray hits, scaled by the specular coefficient, and a
    /// depth cap of 1 allows no grandchild bounce.
    #[test]
    fn test_reflection_composition() {
        let specular = Vec3::new(0.8, 0.8, 0.8);
        let mirror = Arc::new(Material::named("mirror").with_specular(specular));
        let red = diffuse_material("red", Vec3::new(1.0, 0.0, 0.0));

        let build = |max_depth| {
            let mut scene = Scene::new(max_depth);
            scene.push_shape(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, mirror.clone()));
            scene.push_shape(Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0, red.clone()));
            scene.push_light(Vec3::new(0.0, 3.0, 0.0));
            scene
        };

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let scene = build(2);
        let full = trace(&scene, &ray, 0);

        // Recompute the pieces by hand: front of the mirror sphere,
        // normal +Z, mirror ray straight back at the red sphere.
        let hit = scene.nearest_hit(&ray).unwrap();
        let direct = shade(
            &hit.material,
            ray.origin(),
            hit.point,
            Vec3::new(0.0, 3.0, 0.0),
            hit.normal,
            None,
        );
        let mirror_ray = Ray::new(hit.point, Vec3::new(0.0, 0.0, 1.0));
        let child = trace(&scene, &mirror_ray, 1);

        assert!(child.x > 0.0); // the red sphere is actually seen
        assert!((full - (direct + specular * child)).length() < 1e-4);

        // With a depth cap of 1 the reflection child is terminal black:
        // only the direct term remains.
        let shallow = build(1);
        let capped = trace(&shallow, &ray, 0);
        assert!((capped - direct).length() < 1e-4);
    }

    #[test]
    fn test_refraction_straight_through() {
        let glass = Arc::new(
            Material::named("glass")
                .with_refractive_index(1.5)
                .with_transparency(0.5),
        );
        let blue = diffuse_material("wall", Vec3::new(0.0, 0.2, 0.9));

        let mut scene = Scene::new(3);
        scene.push_shape(Sphere::new(Vec3::ZERO, 1.0, glass));
        scene.push_shape(Plane::new(Vec3::new(0.0, 0.0, -10.0), Vec3::Z, blue));
        scene.push_light(Vec3::new(0.0, 0.0, -5.0));

        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let color = trace(&scene, &ray, 0);

        // At normal incidence the ray passes through both interfaces
        // undeviated; each one keeps (1 - Tr) = 0.5 of the energy, and
        // the wall behind shades to exactly its diffuse color.
        let expected = Vec3::new(0.0, 0.2, 0.9) * 0.25;
        assert!((color - expected).length() < 1e-3);
    }

    /// Scenario C: grazing exit beyond the critical angle triggers
    /// total internal reflection, and the result stays finite.
    #[test]
    fn test_total_internal_reflection_no_nan() {
        let glass = Arc::new(
            Material::named("glass")
                .with_refractive_index(1.5)
                .with_transparency(0.5),
        );

        let mut scene = Scene::new(4);
        scene.push_shape(Sphere::new(Vec3::ZERO, 1.0, glass));
        scene.push_light(Vec3::new(0.0, 5.0, 0.0));

        // From inside the sphere, nearly tangential: the exit angle is
        // far beyond the ~41.8 degree critical angle for n = 1.5.
        let ray = Ray::new(Vec3::new(0.0, 0.9, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let color = trace(&scene, &ray, 0);

        assert!(color.x.is_finite() && color.y.is_finite() && color.z.is_finite());
        assert!(color.min_element() >= 0.0);
    }

    #[test]
    fn test_trace_toward_normalizes_and_guards() {
        let mut scene = Scene::new(5);
        scene.push_shape(Plane::new(
            Vec3::ZERO,
            Vec3::Y,
            diffuse_material("floor", Vec3::ONE),
        ));
        scene.push_light(Vec3::new(0.0, 5.0, 0.0));

        let origin = Vec3::new(0.0, 10.0, 0.0);
        let via_points = trace_toward(&scene, origin, Vec3::new(0.0, 2.0, 0.0));
        let via_ray = trace(&scene, &Ray::new(origin, Vec3::new(0.0, -1.0, 0.0)), 0);
        assert!((via_points - via_ray).length() < 1e-5);

        // Degenerate zero-length direction stays black instead of NaN.
        assert_eq!(trace_toward(&scene, origin, origin), Vec3::ZERO);
    }

    #[test]
    fn test_schlick_bounds() {
        // Normal incidence on glass: classic 4 percent.
        assert!((schlick(-1.0, 1.0, 1.5) - 0.04).abs() < 1e-3);
        // Grazing incidence approaches full reflectance.
        assert!(schlick(-0.01, 1.0, 1.5) > 0.9);
        // Always within [0, 1].
        for cos in [-1.0, -0.5, 0.0, 0.5, 1.0] {
            let kr = schlick(cos, 1.5, 1.0);
            assert!((0.0..=1.0).contains(&kr));
        }
    }
}
