//! Glint Core - Scene-side data for the Whitted ray tracer.
//!
//! This crate provides:
//!
//! - **Materials**: sparse, optional-channel surface descriptions
//! - **Textures**: float pixel buffers with UV-indexed nearest sampling
//! - **Images**: float RGB framebuffers with binary PPM read/write
//! - **Meshes**: shared vertex/normal/texcoord arrays with
//!   per-triangle materials
//!
//! Everything here is constructed once before rendering and read-only
//! while a trace is in flight, so the renderer can share it freely
//! across worker threads.

pub mod image_io;
pub mod material;
pub mod mesh;
pub mod texture;

// Re-export commonly used types
pub use image_io::{Image, ImageError};
pub use material::{Material, DEFAULT_SHININESS};
pub use mesh::{Face, Mesh};
pub use texture::{Texture, TextureError};
