//! Mesh buffer types
//!
//! Everything here is independently owned output: no back-references into
//! the map buffer the geometry came from.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use indexmap::IndexMap;

/// An interleaved vertex as uploaded to a GPU vertex buffer.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Triangle buffers for one material bucket.
///
/// Vertices are deduplicated by exact bit equality, matching the source
/// format's own vertex table; every index is strictly less than
/// `positions.len()`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Mesh {
    /// Unique vertex positions.
    pub positions: Vec<[f32; 3]>,
    /// Texture coordinates, parallel to `positions`.
    pub uvs: Vec<[f32; 2]>,
    /// Triangle list, three indices per triangle.
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Number of triangles in the index list.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Positions as raw bytes for buffer upload.
    #[must_use]
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Indices as raw bytes for buffer upload.
    #[must_use]
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Build an interleaved position+uv vertex buffer.
    #[must_use]
    pub fn interleaved(&self) -> Vec<MeshVertex> {
        self.positions
            .iter()
            .zip(&self.uvs)
            .map(|(&position, &uv)| MeshVertex { position, uv })
            .collect()
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// A box containing a single point.
    #[must_use]
    pub fn from_point(point: Vec3) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Grow the box to contain `point`.
    pub fn expand(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Edge lengths of the box.
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// The complete output of one mesh assembly.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MeshBundle {
    /// One mesh per texinfo index, in first-seen face order.
    pub meshes: IndexMap<i16, Mesh>,
    /// Bounds over every emitted position; `None` when nothing was emitted.
    pub bounds: Option<Aabb>,
    /// Faces skipped for having under three resolvable vertices or a
    /// surfedge range outside the lump. Metadata, not an error.
    pub degenerate_faces: usize,
}

impl MeshBundle {
    /// Total triangles across all material buckets.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.meshes.values().map(Mesh::triangle_count).sum()
    }

    /// True when no triangles were emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}
