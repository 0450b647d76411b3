//! Demo scene driver.
//!
//! Builds a small scene (floor plane, textured sphere, glass sphere,
//! mirror sphere, two-triangle mesh), renders it with supersampling,
//! and writes the result as binary PPM.

use std::sync::Arc;

use glint_core::{Face, Material, Mesh, Texture};
use glint_renderer::{render, Frustum, MeshObject, Plane, RenderConfig, Scene, Sphere, Vec3};

fn main() {
    env_logger::init();

    let start = std::time::Instant::now();
    let scene = build_scene();
    println!("Scene built in {:?}", start.elapsed());

    let config = RenderConfig {
        width: 800,
        height: 600,
        supersamples: 2,
    };
    let frustum = Frustum::pinhole(
        Vec3::new(0.0, 1.5, 6.0),
        Vec3::new(0.0, 0.5, 0.0),
        Vec3::Y,
        50.0,
        config.width as f32 / config.height as f32,
    );

    println!(
        "Rendering {}x{} @ {} samples/axis...",
        config.width, config.height, config.supersamples
    );

    let start = std::time::Instant::now();
    let image = render(&scene, &frustum, &config);
    println!("Rendered in {:?}", start.elapsed());

    let filename = "result.ppm";
    if let Err(err) = image.write_ppm(filename) {
        eprintln!("Failed to save image: {err}");
        std::process::exit(1);
    }
    println!("Saved to {filename}");
}

fn build_scene() -> Scene {
    let mut scene = Scene::new(5);

    let floor = Arc::new(
        Material::named("floor")
            .with_diffuse(Vec3::splat(0.7))
            .with_ambient(Vec3::splat(0.05)),
    );
    scene.push_shape(Plane::new(Vec3::ZERO, Vec3::Y, floor));

    // Checkered sphere: an 8x8 procedural texture.
    let checker = Arc::new(checker_texture(8, Vec3::new(0.9, 0.2, 0.2), Vec3::splat(0.9)));
    let matte = Arc::new(Material::named("matte").with_diffuse(Vec3::splat(0.5)));
    scene.push_shape(
        Sphere::new(Vec3::new(-1.8, 1.0, 0.0), 1.0, matte).with_texture(checker),
    );

    let glass = Arc::new(
        Material::named("glass")
            .with_specular(Vec3::splat(0.2))
            .with_shininess(80.0)
            .with_refractive_index(1.5)
            .with_transparency(0.2)
            .with_transmission_filter(Vec3::new(0.95, 1.0, 0.95)),
    );
    scene.push_shape(Sphere::new(Vec3::new(0.4, 1.0, 1.2), 1.0, glass));

    let mirror = Arc::new(
        Material::named("mirror")
            .with_specular(Vec3::splat(0.85))
            .with_shininess(200.0),
    );
    scene.push_shape(Sphere::new(Vec3::new(2.4, 1.0, -1.5), 1.0, mirror));

    // A small two-triangle wedge with per-face materials.
    let red = Arc::new(Material::named("red").with_diffuse(Vec3::new(0.9, 0.1, 0.1)));
    let blue = Arc::new(Material::named("blue").with_diffuse(Vec3::new(0.1, 0.1, 0.9)));
    let mut wedge = Mesh::new(
        vec![
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.2, 0.0),
            Vec3::new(0.0, 0.0, -1.0),
        ],
        vec![Face::new(0, 1, 2), Face::new(1, 3, 2)],
        vec![red, blue],
    )
    .with_face_materials(vec![0, 1]);
    wedge.compute_vertex_normals();
    scene.push_shape(MeshObject::new(Arc::new(wedge), Vec3::new(-0.5, 0.0, -2.5)));

    scene.push_light(Vec3::new(4.0, 6.0, 4.0));
    scene.push_light(Vec3::new(-4.0, 5.0, 2.0));

    scene
}

fn checker_texture(cells: usize, a: Vec3, b: Vec3) -> Texture {
    let size = cells * 8;
    let mut pixels = Vec::with_capacity(size * size);
    for y in 0..size {
        for x in 0..size {
            let checker = (x / 8 + y / 8) % 2 == 0;
            pixels.push(if checker { a } else { b });
        }
    }
    Texture::new(size, size, pixels)
}
