//! Byte-level map builders shared by the unit tests.
//!
//! Fixtures write real wire bytes (header, directory, lump payloads) so the
//! parsers are exercised against the same layout the format defines.

use glam::Vec3;

use super::types::LumpId;
use super::{BSP_MAGIC, HEADER_LUMPS, HEADER_SIZE};

#[derive(Clone, Copy)]
pub(crate) struct FaceFixture {
    pub plane: u16,
    pub first_surf_edge: i32,
    pub surf_edge_count: i16,
    pub tex_info: i16,
}

#[derive(Clone, Copy)]
pub(crate) struct TexInfoFixture {
    pub s: [f32; 4],
    pub t: [f32; 4],
    pub flags: i32,
}

impl Default for TexInfoFixture {
    fn default() -> Self {
        Self {
            s: [1.0, 0.0, 0.0, 0.0],
            t: [0.0, 1.0, 0.0, 0.0],
            flags: 0,
        }
    }
}

/// Declarative map contents; `build` lays them out as a version 20 file.
#[derive(Default)]
pub(crate) struct MapFixture {
    pub vertices: Vec<Vec3>,
    /// Vertex index pairs.
    pub edges: Vec<(u16, u16)>,
    pub surf_edges: Vec<i32>,
    pub faces: Vec<FaceFixture>,
    /// (normal, dist, axis)
    pub planes: Vec<(Vec3, f32, i32)>,
    pub tex_infos: Vec<TexInfoFixture>,
    /// (mins, maxs, first_face, face_count)
    pub models: Vec<(Vec3, Vec3, i32, i32)>,
}

impl MapFixture {
    /// A single 64x64 quad on the Z=0 plane: four vertices, four edges
    /// (slot 0 is a dummy so negative surfedges stay expressible), one
    /// four-surfedge face, one texinfo, one world model.
    pub fn quad() -> Self {
        Self {
            vertices: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(64.0, 0.0, 0.0),
                Vec3::new(64.0, 64.0, 0.0),
                Vec3::new(0.0, 64.0, 0.0),
            ],
            edges: vec![(0, 0), (0, 1), (1, 2), (2, 3), (3, 0)],
            surf_edges: vec![1, 2, 3, 4],
            faces: vec![FaceFixture {
                plane: 0,
                first_surf_edge: 0,
                surf_edge_count: 4,
                tex_info: 0,
            }],
            planes: vec![(Vec3::Z, 0.0, 2)],
            tex_infos: vec![TexInfoFixture::default()],
            models: vec![(Vec3::ZERO, Vec3::new(64.0, 64.0, 0.0), 0, 1)],
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let mut payloads: Vec<(LumpId, Vec<u8>)> = Vec::new();

        if !self.planes.is_empty() {
            let mut bytes = Vec::new();
            for (normal, dist, axis) in &self.planes {
                push_vec3(&mut bytes, *normal);
                bytes.extend_from_slice(&dist.to_le_bytes());
                bytes.extend_from_slice(&axis.to_le_bytes());
            }
            payloads.push((LumpId::Planes, bytes));
        }

        if !self.vertices.is_empty() {
            let mut bytes = Vec::new();
            for vertex in &self.vertices {
                push_vec3(&mut bytes, *vertex);
            }
            payloads.push((LumpId::Vertices, bytes));
        }

        if !self.tex_infos.is_empty() {
            let mut bytes = Vec::new();
            for (i, info) in self.tex_infos.iter().enumerate() {
                for component in info.s.iter().chain(&info.t) {
                    bytes.extend_from_slice(&component.to_le_bytes());
                }
                // Lightmap vectors are zero in fixtures.
                bytes.extend_from_slice(&[0u8; 32]);
                bytes.extend_from_slice(&info.flags.to_le_bytes());
                bytes.extend_from_slice(&(i as i32).to_le_bytes());
            }
            payloads.push((LumpId::TexInfo, bytes));
        }

        if !self.faces.is_empty() {
            let mut bytes = Vec::new();
            for face in &self.faces {
                push_face(&mut bytes, face);
            }
            payloads.push((LumpId::Faces, bytes));
        }

        if !self.edges.is_empty() {
            let mut bytes = Vec::new();
            for (v0, v1) in &self.edges {
                bytes.extend_from_slice(&v0.to_le_bytes());
                bytes.extend_from_slice(&v1.to_le_bytes());
            }
            payloads.push((LumpId::Edges, bytes));
        }

        if !self.surf_edges.is_empty() {
            let mut bytes = Vec::new();
            for surf_edge in &self.surf_edges {
                bytes.extend_from_slice(&surf_edge.to_le_bytes());
            }
            payloads.push((LumpId::SurfEdges, bytes));
        }

        if !self.models.is_empty() {
            let mut bytes = Vec::new();
            for (mins, maxs, first_face, face_count) in &self.models {
                push_vec3(&mut bytes, *mins);
                push_vec3(&mut bytes, *maxs);
                push_vec3(&mut bytes, Vec3::ZERO);
                bytes.extend_from_slice(&0i32.to_le_bytes());
                bytes.extend_from_slice(&first_face.to_le_bytes());
                bytes.extend_from_slice(&face_count.to_le_bytes());
            }
            payloads.push((LumpId::Models, bytes));
        }

        let mut directory = [(0u32, 0u32); HEADER_LUMPS];
        let mut offset = HEADER_SIZE;
        for (id, bytes) in &payloads {
            directory[id.index()] = (offset as u32, bytes.len() as u32);
            offset += bytes.len();
        }

        let mut buf = Vec::with_capacity(offset);
        buf.extend_from_slice(&BSP_MAGIC);
        buf.extend_from_slice(&20i32.to_le_bytes());
        for (slot_offset, slot_length) in directory {
            buf.extend_from_slice(&slot_offset.to_le_bytes());
            buf.extend_from_slice(&slot_length.to_le_bytes());
            buf.extend_from_slice(&0i32.to_le_bytes());
            buf.extend_from_slice(&[0u8; 4]);
        }
        buf.extend_from_slice(&1i32.to_le_bytes());
        for (_, bytes) in &payloads {
            buf.extend_from_slice(bytes);
        }
        buf
    }
}

fn push_vec3(buf: &mut Vec<u8>, v: Vec3) {
    for component in v.to_array() {
        buf.extend_from_slice(&component.to_le_bytes());
    }
}

/// Write one full 56-byte face record; lighting and primitive fields are
/// zeroed (light offset -1, no displacement).
fn push_face(buf: &mut Vec<u8>, face: &FaceFixture) {
    buf.extend_from_slice(&face.plane.to_le_bytes());
    buf.push(0); // side
    buf.push(1); // on_node
    buf.extend_from_slice(&face.first_surf_edge.to_le_bytes());
    buf.extend_from_slice(&face.surf_edge_count.to_le_bytes());
    buf.extend_from_slice(&face.tex_info.to_le_bytes());
    buf.extend_from_slice(&(-1i16).to_le_bytes()); // disp_info
    buf.extend_from_slice(&0i16.to_le_bytes()); // surface_fog_volume_id
    buf.extend_from_slice(&[0u8; 4]); // styles
    buf.extend_from_slice(&(-1i32).to_le_bytes()); // light_ofs
    buf.extend_from_slice(&0f32.to_le_bytes()); // area
    buf.extend_from_slice(&[0u8; 16]); // lightmap mins + size
    buf.extend_from_slice(&0i32.to_le_bytes()); // orig_face
    buf.extend_from_slice(&0u16.to_le_bytes()); // num_prims
    buf.extend_from_slice(&0u16.to_le_bytes()); // first_prim_id
    buf.extend_from_slice(&0u32.to_le_bytes()); // smoothing_groups
}
