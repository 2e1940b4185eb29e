//! # Procedural Geometry Generation
//!
//! Generates the primitive shapes the demo scene is built from, so no
//! external model files are needed. All shapes come with outward normals
//! and texture coordinates.

pub mod primitives;
pub mod teapot;

pub use primitives::*;
pub use teapot::generate_teapot;

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Appends another geometry, offsetting its indices past our vertices
    pub fn append(&mut self, other: GeometryData) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.tex_coords.extend(other.tex_coords);
        self.normals.extend(other.normals);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }
}
