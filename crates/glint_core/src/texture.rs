//! Texture buffers with UV-indexed nearest-neighbor sampling.
//!
//! Textures are immutable float pixel buffers. PPM files are decoded by
//! the crate's own reader; other formats go through the `image` crate.
//! A failed load is reported to the caller as an error so the owning
//! shape can fall back to untextured shading; it never aborts a render.

use std::path::Path;

use glint_math::Vec3;
use thiserror::Error;

use crate::image_io::{Image, ImageError};

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("PPM error: {0}")]
    Ppm(#[from] ImageError),

    #[error("image decoding error: {0}")]
    Decode(#[from] image::ImageError),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// An immutable texture: `width x height` RGB floats in `[0, 1]`.
#[derive(Clone, Debug)]
pub struct Texture {
    width: usize,
    height: usize,
    pixels: Vec<Vec3>,
}

impl Texture {
    /// Create a texture from raw pixel data, row-major.
    pub fn new(width: usize, height: usize, pixels: Vec<Vec3>) -> Self {
        debug_assert_eq!(pixels.len(), width * height);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a 1x1 solid color texture.
    pub fn solid(color: Vec3) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![color],
        }
    }

    /// Wrap an already-decoded image as a texture.
    pub fn from_image(image: &Image) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            pixels: image.pixels().to_vec(),
        }
    }

    /// Load a texture from disk.
    ///
    /// `.ppm` files use the built-in reader; anything else is handed to
    /// the `image` crate and converted to float RGB.
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let is_ppm = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("ppm"))
            .unwrap_or(false);

        if is_ppm {
            let image = Image::read_ppm(path)?;
            log::info!("loaded PPM texture {}", path.display());
            return Ok(Self::from_image(&image));
        }

        let decoded = image::open(path)?.to_rgb8();
        let (width, height) = decoded.dimensions();
        let pixels = decoded
            .pixels()
            .map(|px| Vec3::new(px[0] as f32, px[1] as f32, px[2] as f32) / 255.0)
            .collect();
        log::info!("loaded texture {}", path.display());

        Ok(Self {
            width: width as usize,
            height: height as usize,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Nearest-neighbor sample at UV coordinates.
    ///
    /// Negative UV clamps to zero before indexing, and the derived
    /// index `(u * width) - 1` clamps into the valid pixel range on
    /// both sides, so edge rounding can never read out of bounds.
    pub fn sample(&self, u: f32, v: f32) -> Vec3 {
        // An empty texture has no pixel to sample.
        if self.pixels.is_empty() {
            return Vec3::ZERO;
        }

        let u = u.max(0.0);
        let v = v.max(0.0);

        let x = (((u * self.width as f32) as isize - 1).max(0) as usize).min(self.width - 1);
        let y = (((v * self.height as f32) as isize - 1).max(0) as usize).min(self.height - 1);

        self.pixels[y * self.width + x]
    }

    /// Blend three per-vertex texture coordinates with barycentric
    /// weights `(1-a-b, a, b)`, yielding the UV for a triangle hit.
    pub fn barycentric_uv(a: f32, b: f32, texcoords: [[f32; 2]; 3]) -> (f32, f32) {
        let c = 1.0 - a - b;
        let u = c * texcoords[0][0] + a * texcoords[1][0] + b * texcoords[2][0];
        let v = c * texcoords[0][1] + a * texcoords[1][1] + b * texcoords[2][1];
        (u, v)
    }
}
