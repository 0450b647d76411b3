//! Triangle mesh storage for the ray tracer.
//!
//! A mesh owns shared vertex position / normal / texcoord arrays and a
//! list of faces indexing into them. Materials are assigned per face
//! (not per vertex): `face_materials[i]` is an index into `materials`
//! for face `i`, so many faces can share one `Arc<Material>`.

use std::sync::Arc;

use glint_math::Vec3;

use crate::material::Material;

/// A mesh face: three vertex indices plus optional texcoord indices.
///
/// Texture coordinates index a separate array from positions, so a
/// vertex shared by two faces can carry different UVs in each.
#[derive(Clone, Copy, Debug)]
pub struct Face {
    /// Indices into the mesh position/normal arrays
    pub vertices: [u32; 3],
    /// Indices into the mesh texcoord array, when the mesh is textured
    pub texcoords: Option<[u32; 3]>,
}

impl Face {
    pub fn new(v0: u32, v1: u32, v2: u32) -> Self {
        Self {
            vertices: [v0, v1, v2],
            texcoords: None,
        }
    }

    pub fn with_texcoords(mut self, t0: u32, t1: u32, t2: u32) -> Self {
        self.texcoords = Some([t0, t1, t2]);
        self
    }
}

/// A triangle mesh with per-face materials.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Vertex normals, parallel to `positions`
    pub normals: Vec<Vec3>,

    /// UV coordinates, indexed by `Face::texcoords`
    pub texcoords: Vec<[f32; 2]>,

    /// Faces (index triples)
    pub faces: Vec<Face>,

    /// Per-face index into the material table
    pub face_materials: Vec<usize>,

    // Kept private: the constructor guarantees at least one entry, and
    // `material_for` relies on that.
    materials: Vec<Arc<Material>>,
}

impl Mesh {
    /// Create a mesh from positions, faces, and materials.
    ///
    /// Normals start empty; call [`Mesh::compute_vertex_normals`] (or
    /// fill them from the loader) before intersecting. A mesh handed in
    /// with no materials gets a grey diffuse fallback so shading always
    /// has something to consult.
    pub fn new(positions: Vec<Vec3>, faces: Vec<Face>, materials: Vec<Arc<Material>>) -> Self {
        let materials = if materials.is_empty() {
            log::warn!("mesh constructed without materials, using grey fallback");
            vec![Arc::new(
                Material::named("fallback").with_diffuse(Vec3::splat(0.5)),
            )]
        } else {
            materials
        };

        Self {
            positions,
            normals: Vec::new(),
            texcoords: Vec::new(),
            faces,
            face_materials: Vec::new(),
            materials,
        }
    }

    /// Attach texture coordinates.
    pub fn with_texcoords(mut self, texcoords: Vec<[f32; 2]>) -> Self {
        self.texcoords = texcoords;
        self
    }

    /// Assign per-face material indices (parallel to `faces`).
    pub fn with_face_materials(mut self, face_materials: Vec<usize>) -> Self {
        self.face_materials = face_materials;
        self
    }

    /// Materials shared across faces. Never empty.
    pub fn materials(&self) -> &[Arc<Material>] {
        &self.materials
    }

    /// Material for a face, falling back to the first material when no
    /// per-face assignment exists.
    pub fn material_for(&self, face_index: usize) -> &Arc<Material> {
        let idx = self
            .face_materials
            .get(face_index)
            .copied()
            .unwrap_or(0)
            .min(self.materials.len().saturating_sub(1));
        &self.materials[idx]
    }

    /// Texture coordinates for the three corners of a face, if present.
    pub fn face_texcoords(&self, face: &Face) -> Option<[[f32; 2]; 3]> {
        let t = face.texcoords?;
        Some([
            *self.texcoords.get(t[0] as usize)?,
            *self.texcoords.get(t[1] as usize)?,
            *self.texcoords.get(t[2] as usize)?,
        ])
    }

    /// Compute smooth vertex normals by accumulating face normals.
    ///
    /// The cross product of the edge vectors is accumulated unnormalized
    /// at each corner, which weights large faces more heavily, then each
    /// vertex normal is normalized. Degenerate faces contribute nothing.
    pub fn compute_vertex_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];

        for face in &self.faces {
            let [i0, i1, i2] = face.vertices.map(|i| i as usize);
            if i0 >= self.positions.len() || i1 >= self.positions.len() || i2 >= self.positions.len()
            {
                continue;
            }

            let edge1 = self.positions[i1] - self.positions[i0];
            let edge2 = self.positions[i2] - self.positions[i0];
            let face_normal = edge1.cross(edge2);

            normals[i0] += face_normal;
            normals[i1] += face_normal;
            normals[i2] += face_normal;
        }

        self.normals = normals
            .into_iter()
            .map(|n| n.normalize_or_zero())
            .collect();
    }
}
