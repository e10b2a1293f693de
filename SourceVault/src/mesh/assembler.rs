//! Face walking and fan triangulation

use std::collections::HashMap;

use glam::Vec3;
use indexmap::IndexMap;

use crate::bsp::{BspFile, Model};
use crate::error::Result;

use super::types::{Aabb, Mesh, MeshBundle};

/// Assemble every face of the map into per-texinfo triangle buffers.
///
/// Faces are walked in face-array order, so identical bytes always produce
/// an identical bundle. Unresolvable faces are counted, never fatal.
///
/// # Errors
///
/// Returns an error only for lump-level problems (a geometry lump whose
/// span escapes the file, or whose length is not a whole number of
/// records).
pub fn assemble_mesh(bsp: &BspFile) -> Result<MeshBundle> {
    let face_count = bsp.faces()?.len();
    assemble_range(bsp, 0, face_count)
}

/// Assemble only the faces belonging to one brush model.
///
/// The model's face range is clamped to the face lump, so a model record
/// pointing past the lump yields fewer (or zero) faces rather than an
/// error.
///
/// # Errors
///
/// Same as [`assemble_mesh`].
pub fn assemble_model_mesh(bsp: &BspFile, model: &Model) -> Result<MeshBundle> {
    let face_count = bsp.faces()?.len();
    let start = usize::try_from(model.first_face).unwrap_or(0).min(face_count);
    let count = usize::try_from(model.face_count).unwrap_or(0);
    let end = start.saturating_add(count).min(face_count);
    assemble_range(bsp, start, end)
}

fn assemble_range(bsp: &BspFile, start: usize, end: usize) -> Result<MeshBundle> {
    let faces = bsp.faces()?;
    let surf_edges = bsp.surf_edges()?;
    let edges = bsp.edges()?;
    let vertices = bsp.vertices()?;
    let tex_infos = bsp.tex_infos()?;

    let mut builders: IndexMap<i16, MeshBuilder> = IndexMap::new();
    let mut degenerate_faces = 0usize;
    let mut boundary: Vec<Vec3> = Vec::new();

    for face_index in start..end {
        let Some(face) = faces.get(face_index) else {
            break;
        };

        if face.surf_edge_count < 3 || face.first_surf_edge < 0 {
            degenerate_faces += 1;
            continue;
        }
        let first = face.first_surf_edge as usize;
        let count = face.surf_edge_count as usize;
        if first + count > surf_edges.len() {
            degenerate_faces += 1;
            continue;
        }

        // Boundary loop: each directed surfedge contributes its first
        // vertex, clockwise around the face.
        boundary.clear();
        let mut resolved = true;
        for surf_index in first..first + count {
            let endpoint = surf_edges
                .get(surf_index)
                .and_then(|surf_edge| {
                    edges
                        .get(surf_edge.edge_index())
                        .map(|edge| surf_edge.endpoints(edge).0)
                })
                .and_then(|vertex_index| vertices.get(vertex_index as usize));
            match endpoint {
                Some(position) => boundary.push(position),
                None => {
                    resolved = false;
                    break;
                }
            }
        }
        if !resolved || boundary.len() < 3 {
            degenerate_faces += 1;
            continue;
        }

        let info = usize::try_from(face.tex_info)
            .ok()
            .and_then(|index| tex_infos.get(index));
        let builder = builders.entry(face.tex_info).or_default();

        // Fan from the first boundary vertex; convex faces are the
        // format's invariant, so this cannot fold back on itself.
        for i in 1..boundary.len() - 1 {
            for position in [boundary[0], boundary[i], boundary[i + 1]] {
                let uv = info.map_or([0.0, 0.0], |info| info.uv(position));
                builder.push_vertex(position, uv);
            }
        }
    }

    let meshes: IndexMap<i16, Mesh> = builders
        .into_iter()
        .map(|(tex_info, builder)| (tex_info, builder.finish()))
        .collect();

    let mut bounds: Option<Aabb> = None;
    for mesh in meshes.values() {
        for &position in &mesh.positions {
            let point = Vec3::from_array(position);
            match &mut bounds {
                Some(aabb) => aabb.expand(point),
                None => bounds = Some(Aabb::from_point(point)),
            }
        }
    }

    let bundle = MeshBundle {
        meshes,
        bounds,
        degenerate_faces,
    };

    tracing::debug!(
        "assembled {} meshes, {} triangles, {} degenerate faces",
        bundle.meshes.len(),
        bundle.triangle_count(),
        degenerate_faces
    );

    Ok(bundle)
}

/// Accumulates one material bucket, deduplicating vertices by exact bit
/// pattern.
#[derive(Default)]
struct MeshBuilder {
    positions: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    indices: Vec<u32>,
    seen: HashMap<[u32; 5], u32>,
}

impl MeshBuilder {
    fn push_vertex(&mut self, position: Vec3, uv: [f32; 2]) {
        let key = [
            position.x.to_bits(),
            position.y.to_bits(),
            position.z.to_bits(),
            uv[0].to_bits(),
            uv[1].to_bits(),
        ];
        let next = self.positions.len() as u32;
        let index = *self.seen.entry(key).or_insert_with(|| {
            self.positions.push(position.to_array());
            self.uvs.push(uv);
            next
        });
        self.indices.push(index);
    }

    fn finish(self) -> Mesh {
        Mesh {
            positions: self.positions,
            uvs: self.uvs,
            indices: self.indices,
        }
    }
}
