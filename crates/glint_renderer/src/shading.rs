//! Phong local illumination.

use glint_core::Material;
use glint_math::Vec3;

/// Phong shading for one light.
///
/// `diffuse` is the resolved diffuse color for the hit (texture sample
/// or material channel); `None` drops the diffuse term entirely. The
/// returned color is unclamped: ambient + diffuse + specular, with the
/// image stage clamping to `[0, 1]` later.
///
/// The diffuse term uses the absolute value of `dot(normal, light)`
/// rather than clamping at zero, so interpolated normals that tip away
/// from the light still shade instead of going black.
pub fn shade(
    material: &Material,
    camera_pos: Vec3,
    point: Vec3,
    light_pos: Vec3,
    normal: Vec3,
    diffuse: Option<Vec3>,
) -> Vec3 {
    let light_vec = (light_pos - point).normalize_or_zero();

    let mut color = Vec3::ZERO;

    if let Some(ambient) = material.ambient() {
        color += ambient;
    }

    if let Some(diffuse) = diffuse {
        color += normal.dot(light_vec).abs() * diffuse;
    }

    if let Some(specular) = material.specular() {
        let reflect = 2.0 * light_vec.dot(normal) * normal - light_vec;
        let view = (camera_pos - point).normalize_or_zero();

        let alignment = view.dot(reflect);
        if alignment >= 0.0 {
            color += alignment.powf(material.shininess_or_default()) * specular;
        }
    }

    color
}
