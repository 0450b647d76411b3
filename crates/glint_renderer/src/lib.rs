//! Glint Renderer - recursive Whitted-style CPU ray tracing.
//!
//! Given a scene of shapes, materials, and point lights, computes the
//! color seen along a ray: Phong local shading, hard shadows with
//! partial transparency, specular reflection, and refraction with a
//! Fresnel-weighted energy split.
//!
//! The tracer is a pure function of `(ray, depth)` over an immutable
//! [`Scene`], so the frame driver distributes scanlines across rayon
//! workers with no locking.

mod frame;
mod mesh;
mod plane;
mod scene;
mod shading;
mod shape;
mod sphere;
mod tracer;
mod triangle;

pub use frame::{render, render_interruptible, Frustum, RenderConfig};
pub use mesh::MeshObject;
pub use plane::Plane;
pub use scene::Scene;
pub use shading::shade;
pub use shape::{Hit, Shape};
pub use sphere::Sphere;
pub use tracer::{trace, trace_toward};
pub use triangle::Triangle;

/// Re-export the math foundation
pub use glint_math::{Ray, Vec3, EPSILON};
