//! Frame driver: turns pixels into rays and rays into an image.
//!
//! The driver owns the loop, not the tracer. A [`Frustum`] supplies one
//! ray per sub-pixel position by bilinearly interpolating the four
//! corner rays of the view volume; `render` walks every pixel with an
//! `n x n` supersampling grid and averages. Scanlines are independent,
//! so they are distributed across rayon workers, and a cancel flag is
//! checked once per scanline so a long render can be interrupted
//! between rows.

use std::sync::atomic::{AtomicBool, Ordering};

use glint_core::Image;
use glint_math::{Ray, Vec3};
use rayon::prelude::*;

use crate::scene::Scene;
use crate::tracer::trace;

/// Frame driver configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Output width in pixels
    pub width: usize,
    /// Output height in pixels
    pub height: usize,
    /// Supersampling grid size per axis (1 = one centered ray/pixel)
    pub supersamples: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            supersamples: 1,
        }
    }
}

/// The four corner rays of the view volume, as origin/destination
/// pairs. Rays for interior pixels are produced by bilinear
/// interpolation of the corners, the same way the viewport collaborator
/// unprojects them.
#[derive(Debug, Clone, Copy)]
pub struct Frustum {
    origins: [Vec3; 4],
    destinations: [Vec3; 4],
}

impl Frustum {
    /// Build from the corner rays in the order top-left, top-right,
    /// bottom-left, bottom-right.
    pub fn from_corners(origins: [Vec3; 4], destinations: [Vec3; 4]) -> Self {
        Self {
            origins,
            destinations,
        }
    }

    /// Pinhole camera helper: eye position, look-at target, up vector,
    /// vertical field of view in degrees, and aspect ratio.
    pub fn pinhole(eye: Vec3, look_at: Vec3, up: Vec3, vfov_degrees: f32, aspect: f32) -> Self {
        let forward = (look_at - eye).normalize();
        let right = forward.cross(up).normalize();
        let true_up = right.cross(forward);

        let half_height = (vfov_degrees.to_radians() * 0.5).tan();
        let half_width = aspect * half_height;
        let center = eye + forward;

        let destinations = [
            center - half_width * right + half_height * true_up,
            center + half_width * right + half_height * true_up,
            center - half_width * right - half_height * true_up,
            center + half_width * right - half_height * true_up,
        ];

        Self {
            origins: [eye; 4],
            destinations,
        }
    }

    /// Ray for normalized image coordinates `u, v` in `[0, 1]`, with
    /// `(0, 0)` the top-left corner.
    pub fn ray_at(&self, u: f32, v: f32) -> Ray {
        let origin = bilinear(&self.origins, u, v);
        let destination = bilinear(&self.destinations, u, v);
        Ray::toward(origin, destination)
    }
}

fn bilinear(corners: &[Vec3; 4], u: f32, v: f32) -> Vec3 {
    let top = (1.0 - u) * corners[0] + u * corners[1];
    let bottom = (1.0 - u) * corners[2] + u * corners[3];
    (1.0 - v) * top + v * bottom
}

/// Trace one pixel: supersample on an `n x n` grid with `+0.5` centered
/// offsets and average the results.
fn render_pixel(scene: &Scene, frustum: &Frustum, config: &RenderConfig, x: usize, y: usize) -> Vec3 {
    let n = config.supersamples.max(1);
    let x_span = (config.width.max(2) - 1) as f32;
    let y_span = (config.height.max(2) - 1) as f32;

    let mut color = Vec3::ZERO;
    for sx in 0..n {
        for sy in 0..n {
            let px = x as f32 + (sx as f32 + 0.5) / n as f32;
            let py = y as f32 + (sy as f32 + 0.5) / n as f32;
            let ray = frustum.ray_at(px / x_span, py / y_span);
            color += trace(scene, &ray, 0);
        }
    }

    color / (n * n) as f32
}

/// Render the whole frame, one rayon task per scanline.
pub fn render(scene: &Scene, frustum: &Frustum, config: &RenderConfig) -> Image {
    render_interruptible(scene, frustum, config, &AtomicBool::new(false))
}

/// Render with cooperative cancellation.
///
/// The flag is checked once per scanline; rows not yet started when it
/// flips stay black. Traces already in flight run to completion since
/// the recursion itself has no yield points.
pub fn render_interruptible(
    scene: &Scene,
    frustum: &Frustum,
    config: &RenderConfig,
    cancel: &AtomicBool,
) -> Image {
    log::info!(
        "rendering {}x{} at {} sample(s)/axis over {} shape(s), {} light(s)",
        config.width,
        config.height,
        config.supersamples.max(1),
        scene.shapes().len(),
        scene.lights().len()
    );

    let rows: Vec<Vec<Vec3>> = (0..config.height)
        .into_par_iter()
        .map(|y| {
            if cancel.load(Ordering::Relaxed) {
                return vec![Vec3::ZERO; config.width];
            }
            (0..config.width)
                .map(|x| render_pixel(scene, frustum, config, x, y))
                .collect()
        })
        .collect();

    let mut image = Image::new(config.width, config.height);
    for (y, row) in rows.into_iter().enumerate() {
        for (x, color) in row.into_iter().enumerate() {
            image.set_pixel(x, y, color);
        }
    }

    if cancel.load(Ordering::Relaxed) {
        log::warn!("render cancelled before completion");
    } else {
        log::info!("render finished");
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Plane, Sphere};
    use glint_core::Material;
    use std::sync::Arc;

    fn test_scene() -> Scene {
        let mut scene = Scene::new(3);
        scene.push_shape(Plane::new(
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::Y,
            Arc::new(Material::named("floor").with_diffuse(Vec3::splat(0.8))),
        ));
        scene.push_shape(Sphere::new(
            Vec3::new(0.0, 0.0, -4.0),
            1.0,
            Arc::new(Material::named("ball").with_diffuse(Vec3::new(0.9, 0.1, 0.1))),
        ));
        scene.push_light(Vec3::new(2.0, 4.0, 0.0));
        scene
    }

    fn test_frustum() -> Frustum {
        Frustum::pinhole(
            Vec3::new(0.0, 0.5, 2.0),
            Vec3::new(0.0, 0.0, -4.0),
            Vec3::Y,
            50.0,
            1.0,
        )
    }

    #[test]
    fn test_frustum_corner_rays() {
        let frustum = Frustum::from_corners(
            [Vec3::ZERO; 4],
            [
                Vec3::new(-1.0, 1.0, -1.0),
                Vec3::new(1.0, 1.0, -1.0),
                Vec3::new(-1.0, -1.0, -1.0),
                Vec3::new(1.0, -1.0, -1.0),
            ],
        );

        // Center of the image aims straight down the axis.
        let center = frustum.ray_at(0.5, 0.5);
        assert!((center.direction() - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);

        // Top-left corner reproduces the corner destination.
        let corner = frustum.ray_at(0.0, 0.0);
        let expected = Vec3::new(-1.0, 1.0, -1.0).normalize();
        assert!((corner.direction() - expected).length() < 1e-5);
    }

    #[test]
    fn test_pinhole_looks_at_target() {
        let eye = Vec3::new(0.0, 0.0, 5.0);
        let frustum = Frustum::pinhole(eye, Vec3::ZERO, Vec3::Y, 60.0, 1.0);

        let center = frustum.ray_at(0.5, 0.5);
        assert!((center.origin() - eye).length() < 1e-5);
        assert!((center.direction() - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_render_produces_nonblack_image() {
        let config = RenderConfig {
            width: 16,
            height: 16,
            supersamples: 1,
        };
        let image = render(&test_scene(), &test_frustum(), &config);

        assert_eq!(image.width(), 16);
        assert_eq!(image.height(), 16);
        let lit = image.pixels().iter().any(|px| px.max_element() > 0.0);
        assert!(lit);
    }

    #[test]
    fn test_supersampling_matches_on_flat_regions() {
        // On a constant-color region, 1 and 2 samples/axis agree.
        let mut scene = Scene::new(2);
        scene.push_shape(Plane::new(
            Vec3::new(0.0, 0.0, -10.0),
            Vec3::Z,
            Arc::new(Material::named("wall").with_ambient(Vec3::splat(0.25))),
        ));
        scene.push_light(Vec3::new(0.0, 0.0, 0.0));

        let frustum = test_frustum();
        let one = render(
            &scene,
            &frustum,
            &RenderConfig {
                width: 8,
                height: 8,
                supersamples: 1,
            },
        );
        let four = render(
            &scene,
            &frustum,
            &RenderConfig {
                width: 8,
                height: 8,
                supersamples: 2,
            },
        );

        for (a, b) in one.pixels().iter().zip(four.pixels()) {
            assert!((*a - *b).length() < 1e-4);
        }
    }

    #[test]
    fn test_cancelled_render_is_black() {
        let cancel = AtomicBool::new(true);
        let config = RenderConfig {
            width: 8,
            height: 8,
            supersamples: 1,
        };
        let image = render_interruptible(&test_scene(), &test_frustum(), &config, &cancel);

        assert!(image.pixels().iter().all(|px| *px == Vec3::ZERO));
    }
}
