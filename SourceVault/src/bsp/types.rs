//! Types for BSP map handling
//!
//! Record layouts follow the on-disk format exactly; sizes are declared as
//! constants on each record and validated against lump lengths before any
//! decoding happens.

use glam::{Vec3, Vec4};

use crate::cursor::ByteSpan;

/// Lump slots used by this crate, with their format-defined indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LumpId {
    /// Worldspawn and entity key/values (not decoded here).
    Entities = 0,
    /// Splitting planes.
    Planes = 1,
    /// Vertex positions.
    Vertices = 3,
    /// Texture orientation and material references.
    TexInfo = 6,
    /// Polygon faces.
    Faces = 7,
    /// Vertex index pairs.
    Edges = 12,
    /// Signed, direction-carrying edge references.
    SurfEdges = 13,
    /// Brush models (worldspawn is model 0).
    Models = 14,
    /// Archive embedded in the map (not decoded here).
    PakFile = 40,
}

impl LumpId {
    /// Directory slot number for this lump.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Lump name for diagnostics.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Entities => "entities",
            Self::Planes => "planes",
            Self::Vertices => "vertices",
            Self::TexInfo => "texinfo",
            Self::Faces => "faces",
            Self::Edges => "edges",
            Self::SurfEdges => "surfedges",
            Self::Models => "models",
            Self::PakFile => "pakfile",
        }
    }
}

/// One slot of the lump directory.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LumpDirEntry {
    /// Offset of the lump payload from the start of the file.
    pub offset: u32,
    /// Payload length in bytes; 0 means the lump is absent.
    pub length: u32,
    /// Lump format version.
    pub version: i32,
    /// Lump ident code (zero for uncompressed lumps).
    pub ident: [u8; 4],
}

impl LumpDirEntry {
    /// The byte range this slot claims within the map buffer.
    #[must_use]
    pub fn span(&self) -> ByteSpan {
        ByteSpan::new(self.offset, self.length)
    }
}

/// A fixed-size record decoded from a lump payload.
///
/// `decode` is handed exactly [`SIZE`](Self::SIZE) bytes; lump lengths are
/// validated to be a whole number of records before a view is created, so
/// decoding itself cannot fail.
pub trait LumpRecord: Sized {
    /// On-disk record size in bytes.
    const SIZE: usize;
    /// The lump this record type lives in.
    const LUMP: LumpId;

    /// Decode one record from its raw bytes.
    fn decode(bytes: &[u8]) -> Self;
}

fn u16_at(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn i16_at(bytes: &[u8], offset: usize) -> i16 {
    i16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn i32_at(bytes: &[u8], offset: usize) -> i32 {
    i32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

fn f32_at(bytes: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

fn vec3_at(bytes: &[u8], offset: usize) -> Vec3 {
    Vec3::new(
        f32_at(bytes, offset),
        f32_at(bytes, offset + 4),
        f32_at(bytes, offset + 8),
    )
}

fn vec4_at(bytes: &[u8], offset: usize) -> Vec4 {
    Vec4::new(
        f32_at(bytes, offset),
        f32_at(bytes, offset + 4),
        f32_at(bytes, offset + 8),
        f32_at(bytes, offset + 12),
    )
}

impl LumpRecord for Vec3 {
    const SIZE: usize = 12;
    const LUMP: LumpId = LumpId::Vertices;

    fn decode(bytes: &[u8]) -> Self {
        vec3_at(bytes, 0)
    }
}

/// A pair of vertex indices. Edges are shared between adjacent faces and
/// are referenced through the surfedge lump, which supplies direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub v0: u16,
    pub v1: u16,
}

impl LumpRecord for Edge {
    const SIZE: usize = 4;
    const LUMP: LumpId = LumpId::Edges;

    fn decode(bytes: &[u8]) -> Self {
        Self {
            v0: u16_at(bytes, 0),
            v1: u16_at(bytes, 2),
        }
    }
}

/// A signed edge reference: the absolute value indexes the edge lump, the
/// sign selects traversal direction (positive reads v0→v1, negative
/// v1→v0). Index 0 can only appear positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfEdge(pub i32);

impl SurfEdge {
    /// Index into the edge lump.
    #[must_use]
    pub fn edge_index(self) -> usize {
        self.0.unsigned_abs() as usize
    }

    /// True when the edge is traversed second-vertex-first.
    #[must_use]
    pub fn reversed(self) -> bool {
        self.0 < 0
    }

    /// The edge's vertex indices in traversal order.
    #[must_use]
    pub fn endpoints(self, edge: Edge) -> (u16, u16) {
        if self.reversed() {
            (edge.v1, edge.v0)
        } else {
            (edge.v0, edge.v1)
        }
    }
}

impl LumpRecord for SurfEdge {
    const SIZE: usize = 4;
    const LUMP: LumpId = LumpId::SurfEdges;

    fn decode(bytes: &[u8]) -> Self {
        Self(i32_at(bytes, 0))
    }
}

/// A splitting plane: `normal · p = dist`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal.
    pub normal: Vec3,
    /// Distance from the origin along the normal.
    pub dist: f32,
    /// Closest axis (0-2 axial X/Y/Z, 3-5 near-axial).
    pub axis: i32,
}

impl LumpRecord for Plane {
    const SIZE: usize = 20;
    const LUMP: LumpId = LumpId::Planes;

    fn decode(bytes: &[u8]) -> Self {
        Self {
            normal: vec3_at(bytes, 0),
            dist: f32_at(bytes, 12),
            axis: i32_at(bytes, 16),
        }
    }
}

/// A polygon face: `surf_edge_count` surfedges starting at
/// `first_surf_edge` trace its boundary clockwise.
///
/// The on-disk record also carries lighting and primitive bookkeeping that
/// this crate skips over; the record size stays the full 56 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    /// Index into the plane lump.
    pub plane: u16,
    /// Nonzero if the face points opposite its plane's normal.
    pub side: u8,
    /// First index into the surfedge lump.
    pub first_surf_edge: i32,
    /// Number of surfedges; fewer than 3 makes the face degenerate.
    pub surf_edge_count: i16,
    /// Index into the texinfo lump.
    pub tex_info: i16,
    /// Displacement index, or -1 for a plain face.
    pub disp_info: i16,
}

impl Face {
    /// True for faces that carry a displacement surface.
    #[must_use]
    pub fn is_displacement(&self) -> bool {
        self.disp_info >= 0
    }
}

impl LumpRecord for Face {
    const SIZE: usize = 56;
    const LUMP: LumpId = LumpId::Faces;

    fn decode(bytes: &[u8]) -> Self {
        Self {
            plane: u16_at(bytes, 0),
            side: bytes[2],
            first_surf_edge: i32_at(bytes, 4),
            surf_edge_count: i16_at(bytes, 8),
            tex_info: i16_at(bytes, 10),
            disp_info: i16_at(bytes, 12),
        }
    }
}

/// Don't draw, but add to the skybox.
pub const SURF_SKY: i32 = 0x4;
/// Don't bother referencing the texture.
pub const SURF_NODRAW: i32 = 0x80;

/// Texture orientation for a face.
///
/// `texture_s`/`texture_t` map world positions into texel space:
/// `u = s.xyz · p + s.w`, `v = t.xyz · p + t.w`. The lightmap vectors do
/// the same for lightmap luxels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexInfo {
    pub texture_s: Vec4,
    pub texture_t: Vec4,
    pub lightmap_s: Vec4,
    pub lightmap_t: Vec4,
    /// Surface flag bits (`SURF_*`).
    pub flags: i32,
    /// Index into the texdata lump.
    pub tex_data: i32,
}

impl TexInfo {
    /// Project a world position into this texture's (u, v) space.
    #[must_use]
    pub fn uv(&self, position: Vec3) -> [f32; 2] {
        let p = Vec4::from((position, 1.0));
        [self.texture_s.dot(p), self.texture_t.dot(p)]
    }

    /// True when the surface is never drawn.
    #[must_use]
    pub fn is_nodraw(&self) -> bool {
        self.flags & SURF_NODRAW != 0
    }

    /// True when the surface stands in for the skybox.
    #[must_use]
    pub fn is_sky(&self) -> bool {
        self.flags & SURF_SKY != 0
    }
}

impl LumpRecord for TexInfo {
    const SIZE: usize = 72;
    const LUMP: LumpId = LumpId::TexInfo;

    fn decode(bytes: &[u8]) -> Self {
        Self {
            texture_s: vec4_at(bytes, 0),
            texture_t: vec4_at(bytes, 16),
            lightmap_s: vec4_at(bytes, 32),
            lightmap_t: vec4_at(bytes, 48),
            flags: i32_at(bytes, 64),
            tex_data: i32_at(bytes, 68),
        }
    }
}

/// A brush model: a face range plus its bounds. Model 0 is the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Model {
    pub mins: Vec3,
    pub maxs: Vec3,
    pub origin: Vec3,
    /// Root of the model's node tree (unused here).
    pub head_node: i32,
    /// First index into the face lump.
    pub first_face: i32,
    /// Number of faces.
    pub face_count: i32,
}

impl LumpRecord for Model {
    const SIZE: usize = 48;
    const LUMP: LumpId = LumpId::Models;

    fn decode(bytes: &[u8]) -> Self {
        Self {
            mins: vec3_at(bytes, 0),
            maxs: vec3_at(bytes, 12),
            origin: vec3_at(bytes, 24),
            head_node: i32_at(bytes, 36),
            first_face: i32_at(bytes, 40),
            face_count: i32_at(bytes, 44),
        }
    }
}
