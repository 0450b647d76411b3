//! Float RGB image buffer with binary PPM (`P6`) read and write.
//!
//! The tracer produces unclamped float colors; the buffer clamps each
//! channel to `[0, 1]` on write so the PPM stage only ever sees valid
//! byte values. Reading goes the other way: raw bytes are normalized
//! by `/255` into the same float representation, which is what texture
//! loading wants.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use glint_math::Vec3;
use thiserror::Error;

/// Errors that can occur while reading or writing PPM files.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a binary PPM (P6) file, magic was {0:?}")]
    BadMagic(String),

    #[error("malformed PPM header")]
    BadHeader,

    #[error("degenerate image dimensions {0}x{1}")]
    BadDimensions(usize, usize),

    #[error("unsupported PPM max value {0} (only 255 is supported)")]
    UnsupportedMaxval(u32),

    #[error("unexpected end of pixel data")]
    Truncated,
}

pub type ImageResult<T> = Result<T, ImageError>;

/// A `width x height` RGB float image, row-major, channels in `[0, 1]`.
#[derive(Clone, Debug)]
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<Vec3>,
}

impl Image {
    /// Create a black image.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Vec3::ZERO; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the pixel at (x, y).
    pub fn pixel(&self, x: usize, y: usize) -> Vec3 {
        self.pixels[y * self.width + x]
    }

    /// Set the pixel at (x, y), clamping each channel to `[0, 1]`.
    ///
    /// The tracer composites colors unclamped; clamping happens here at
    /// the image boundary.
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Vec3) {
        self.pixels[y * self.width + x] = color.clamp(Vec3::ZERO, Vec3::ONE);
    }

    /// Raw pixel storage, row-major.
    pub fn pixels(&self) -> &[Vec3] {
        &self.pixels
    }

    /// Write the image as binary PPM: `P6\n<w> <h>\n255\n` followed by
    /// interleaved RGB bytes, each channel scaled by 255 and truncated.
    pub fn write_ppm(&self, path: impl AsRef<Path>) -> ImageResult<()> {
        let path = path.as_ref();
        let mut out = BufWriter::new(File::create(path)?);

        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;

        let mut bytes = Vec::with_capacity(self.width * self.height * 3);
        for color in &self.pixels {
            bytes.push((color.x * 255.0) as u8);
            bytes.push((color.y * 255.0) as u8);
            bytes.push((color.z * 255.0) as u8);
        }
        out.write_all(&bytes)?;
        out.flush()?;

        log::info!("wrote {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }

    /// Read a binary PPM file back into a float image, normalizing each
    /// byte by `/255`.
    pub fn read_ppm(path: impl AsRef<Path>) -> ImageResult<Self> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);

        let magic = next_token(&mut reader)?;
        if magic != "P6" {
            return Err(ImageError::BadMagic(magic));
        }

        let width = parse_dimension(&mut reader)?;
        let height = parse_dimension(&mut reader)?;
        if width == 0 || height == 0 {
            return Err(ImageError::BadDimensions(width, height));
        }
        let maxval = parse_dimension(&mut reader)? as u32;
        if maxval != 255 {
            return Err(ImageError::UnsupportedMaxval(maxval));
        }

        let mut raw = vec![0u8; width * height * 3];
        reader
            .read_exact(&mut raw)
            .map_err(|_| ImageError::Truncated)?;

        let pixels = raw
            .chunks_exact(3)
            .map(|px| Vec3::new(px[0] as f32, px[1] as f32, px[2] as f32) / 255.0)
            .collect();

        log::debug!("read {}x{} PPM from {}", width, height, path.display());
        Ok(Self {
            width,
            height,
            pixels,
        })
    }
}

fn parse_dimension(reader: &mut impl BufRead) -> ImageResult<usize> {
    next_token(reader)?
        .parse::<usize>()
        .map_err(|_| ImageError::BadHeader)
}

/// Read the next whitespace-delimited header token, skipping `#`
/// comments through to end of line.
fn next_token(reader: &mut impl BufRead) -> ImageResult<String> {
    let mut token = String::new();
    let mut byte = [0u8; 1];

    loop {
        if reader.read(&mut byte)? == 0 {
            if token.is_empty() {
                return Err(ImageError::BadHeader);
            }
            return Ok(token);
        }
        match byte[0] {
            b'#' if token.is_empty() => {
                // Comment: consume through end of line.
                let mut skipped = Vec::new();
                reader.read_until(b'\n', &mut skipped)?;
            }
            c if c.is_ascii_whitespace() => {
                if !token.is_empty() {
                    return Ok(token);
                }
            }
            c => token.push(c as char),
        }
    }
}
