//! Sparse material description for Phong shading.
//!
//! A material is a bag of optional channels in the spirit of an MTL
//! entry: ambient (`Ka`), diffuse (`Kd`), specular (`Ks`), shininess
//! (`Ns`), refractive index (`Ni`), transparency (`Tr`), transmission
//! filter (`Tf`), and texture / normal-map references. An absent
//! channel contributes nothing to shading; there are no zero-valued
//! placeholder defaults that could mimic presence.

use glint_math::Vec3;

/// Shininess exponent used when a material has a specular color but no
/// explicit `Ns` channel.
pub const DEFAULT_SHININESS: f32 = 20.0;

/// A surface material with optional channels.
///
/// Materials are shared by reference: many shapes (and many mesh
/// triangles) may point at the same material, so the renderer passes
/// them around as `Arc<Material>` and never mutates them during a
/// render pass.
#[derive(Clone, Debug, Default)]
pub struct Material {
    name: String,
    ambient: Option<Vec3>,
    diffuse: Option<Vec3>,
    specular: Option<Vec3>,
    shininess: Option<f32>,
    refractive_index: Option<f32>,
    transparency: Option<f32>,
    transmission_filter: Option<Vec3>,
    texture: Option<String>,
    normal_map: Option<String>,
}

impl Material {
    /// Create an empty (invalid) material with a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Material name (for diagnostics).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// A material is only usable for shading once at least one channel
    /// that shading consults has been set.
    pub fn is_valid(&self) -> bool {
        self.texture.is_some()
            || self.diffuse.is_some()
            || self.ambient.is_some()
            || self.specular.is_some()
            || self.transparency.is_some()
    }

    // Builder-style setters. These consume and return `self` so scene
    // assembly reads as a chain, matching how cameras and render
    // configs are built elsewhere in the workspace.

    /// Set the ambient color channel (`Ka`).
    pub fn with_ambient(mut self, color: Vec3) -> Self {
        self.ambient = Some(color);
        self
    }

    /// Set the diffuse color channel (`Kd`).
    pub fn with_diffuse(mut self, color: Vec3) -> Self {
        self.diffuse = Some(color);
        self
    }

    /// Set the specular color channel (`Ks`).
    pub fn with_specular(mut self, color: Vec3) -> Self {
        self.specular = Some(color);
        self
    }

    /// Set the shininess exponent (`Ns`).
    pub fn with_shininess(mut self, exponent: f32) -> Self {
        self.shininess = Some(exponent);
        self
    }

    /// Set the refractive index (`Ni`).
    pub fn with_refractive_index(mut self, index: f32) -> Self {
        self.refractive_index = Some(index);
        self
    }

    /// Set the transparency channel (`Tr`): 1 is fully opaque, 0 lets
    /// all light through.
    pub fn with_transparency(mut self, transparency: f32) -> Self {
        self.transparency = Some(transparency);
        self
    }

    /// Set the transmission filter color (`Tf`).
    pub fn with_transmission_filter(mut self, color: Vec3) -> Self {
        self.transmission_filter = Some(color);
        self
    }

    /// Record a texture reference (path or name from the MTL source).
    pub fn with_texture(mut self, reference: impl Into<String>) -> Self {
        self.texture = Some(reference.into());
        self
    }

    /// Record a normal-map reference.
    ///
    /// The channel is tracked for completeness of the material model;
    /// shading does not consult it.
    pub fn with_normal_map(mut self, reference: impl Into<String>) -> Self {
        self.normal_map = Some(reference.into());
        self
    }

    // Channel accessors. `None` means "absent", which every consumer
    // treats as "contributes nothing".

    pub fn ambient(&self) -> Option<Vec3> {
        self.ambient
    }

    pub fn diffuse(&self) -> Option<Vec3> {
        self.diffuse
    }

    pub fn specular(&self) -> Option<Vec3> {
        self.specular
    }

    /// Shininess exponent, falling back to [`DEFAULT_SHININESS`] when
    /// the channel is absent. Only meaningful when a specular color is
    /// present.
    pub fn shininess_or_default(&self) -> f32 {
        self.shininess.unwrap_or(DEFAULT_SHININESS)
    }

    pub fn refractive_index(&self) -> Option<f32> {
        self.refractive_index
    }

    pub fn transparency(&self) -> Option<f32> {
        self.transparency
    }

    pub fn transmission_filter(&self) -> Option<Vec3> {
        self.transmission_filter
    }

    pub fn texture(&self) -> Option<&str> {
        self.texture.as_deref()
    }

    pub fn normal_map(&self) -> Option<&str> {
        self.normal_map.as_deref()
    }

    /// Whether the material blocks shadow rays entirely: no
    /// transparency channel, or transparency of 1 (fully opaque).
    pub fn is_opaque(&self) -> bool {
        match self.transparency {
            Some(tr) => tr >= 1.0,
            None => true,
        }
    }
}
