//! BSP header parsing and lazy lump access

use std::marker::PhantomData;

use glam::Vec3;

use crate::cursor::{ByteCursor, ByteSpan};
use crate::error::{Error, Result};

use super::types::{Edge, Face, LumpDirEntry, LumpId, LumpRecord, Model, Plane, SurfEdge, TexInfo};
use super::{BSP_MAGIC, HEADER_LUMPS, MAX_VERSION, MIN_VERSION};

/// A parsed BSP map.
///
/// Owns the complete file buffer and the decoded lump directory. Record
/// decoding is deferred to the typed accessors, which hand out restartable
/// [`LumpView`]s over the owned bytes.
#[derive(Debug)]
pub struct BspFile {
    data: Vec<u8>,
    version: i32,
    map_revision: i32,
    lumps: [LumpDirEntry; HEADER_LUMPS],
}

impl BspFile {
    /// Parse the header and lump directory from a complete map buffer.
    ///
    /// Lump spans are *not* validated here; a slot is checked against the
    /// file size when it is first resolved, so one corrupt slot does not
    /// poison the rest of the map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadBspSignature`] or [`Error::UnsupportedBspVersion`]
    /// for a foreign header, and [`Error::TruncatedData`] if the buffer ends
    /// inside the header.
    pub fn parse(data: Vec<u8>) -> Result<Self> {
        let mut cursor = ByteCursor::new(&data);

        let ident = cursor.take(4)?;
        let ident = [ident[0], ident[1], ident[2], ident[3]];
        if ident != BSP_MAGIC {
            return Err(Error::BadBspSignature { found: ident });
        }

        let version = cursor.read_i32()?;
        if !(MIN_VERSION..=MAX_VERSION).contains(&version) {
            return Err(Error::UnsupportedBspVersion { version });
        }

        let mut lumps = [LumpDirEntry::default(); HEADER_LUMPS];
        for slot in &mut lumps {
            let offset = cursor.read_u32()?;
            let length = cursor.read_u32()?;
            let lump_version = cursor.read_i32()?;
            let ident = cursor.take(4)?;
            *slot = LumpDirEntry {
                offset,
                length,
                version: lump_version,
                ident: [ident[0], ident[1], ident[2], ident[3]],
            };
        }

        let map_revision = cursor.read_i32()?;

        tracing::debug!(
            "BSP version {version}, revision {map_revision}, {} bytes",
            data.len()
        );

        Ok(Self {
            data,
            version,
            map_revision,
            lumps,
        })
    }

    /// Map format version.
    #[must_use]
    pub fn version(&self) -> i32 {
        self.version
    }

    /// The map's revision (iteration) number.
    #[must_use]
    pub fn map_revision(&self) -> i32 {
        self.map_revision
    }

    /// Resolve a directory slot to its byte range.
    ///
    /// A zero-length slot resolves to an empty span.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LumpOutOfRange`] if `index` exceeds the directory
    /// or the slot's `offset + length` escapes the file.
    pub fn lump(&self, index: usize) -> Result<ByteSpan> {
        let Some(entry) = self.lumps.get(index) else {
            return Err(Error::LumpOutOfRange {
                index,
                offset: 0,
                length: 0,
                available: self.data.len(),
            });
        };
        let span = entry.span();
        if span.end() > self.data.len() as u64 {
            return Err(Error::LumpOutOfRange {
                index,
                offset: entry.offset,
                length: entry.length,
                available: self.data.len(),
            });
        }
        Ok(span)
    }

    /// The raw payload bytes of a lump.
    ///
    /// # Errors
    ///
    /// Same as [`lump`](Self::lump).
    pub fn lump_data(&self, id: LumpId) -> Result<&[u8]> {
        let span = self.lump(id.index())?;
        ByteCursor::new(&self.data).slice(span)
    }

    /// Typed view over a lump, validated but not yet decoded.
    fn view<T: LumpRecord>(&self) -> Result<LumpView<'_, T>> {
        let bytes = self.lump_data(T::LUMP)?;
        if bytes.len() % T::SIZE != 0 {
            return Err(Error::CorruptLump {
                lump: T::LUMP.name(),
                length: bytes.len() as u32,
                record_size: T::SIZE,
            });
        }
        Ok(LumpView {
            bytes,
            _marker: PhantomData,
        })
    }

    /// Vertex positions.
    pub fn vertices(&self) -> Result<LumpView<'_, Vec3>> {
        self.view()
    }

    /// Edge records.
    pub fn edges(&self) -> Result<LumpView<'_, Edge>> {
        self.view()
    }

    /// Signed surfedge records.
    pub fn surf_edges(&self) -> Result<LumpView<'_, SurfEdge>> {
        self.view()
    }

    /// Face records.
    pub fn faces(&self) -> Result<LumpView<'_, Face>> {
        self.view()
    }

    /// Splitting planes.
    pub fn planes(&self) -> Result<LumpView<'_, Plane>> {
        self.view()
    }

    /// Texture orientation records.
    pub fn tex_infos(&self) -> Result<LumpView<'_, TexInfo>> {
        self.view()
    }

    /// Brush models (model 0 is the world).
    pub fn models(&self) -> Result<LumpView<'_, Model>> {
        self.view()
    }
}

/// A lazy, restartable view over one lump's records.
///
/// Nothing is decoded up front; `get` and `iter` decode per access, so a
/// view over an untouched lump costs only its directory lookup. The view
/// is `Copy`, so iterating it never consumes it.
#[derive(Debug)]
pub struct LumpView<'a, T> {
    bytes: &'a [u8],
    _marker: PhantomData<T>,
}

impl<T> Clone for LumpView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for LumpView<'_, T> {}

impl<T: LumpRecord> LumpView<'_, T> {
    /// Number of records in the lump.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len() / T::SIZE
    }

    /// True when the lump is absent or empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decode the record at `index`, if it exists.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        if index >= self.len() {
            return None;
        }
        Some(T::decode(&self.bytes[index * T::SIZE..(index + 1) * T::SIZE]))
    }

    /// Iterate the records in lump order. Restartable: call again for a
    /// fresh pass.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.bytes.chunks_exact(T::SIZE).map(T::decode)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::super::fixtures::MapFixture;
    use super::super::{HEADER_SIZE, LUMP_DIR_ENTRY_SIZE};
    use super::*;

    #[test]
    fn header_round_trip() {
        let map = MapFixture::default().build();
        assert_eq!(map.len(), HEADER_SIZE);

        let bsp = BspFile::parse(map).unwrap();
        assert_eq!(bsp.version(), 20);
        assert_eq!(bsp.map_revision(), 1);
        assert!(bsp.vertices().unwrap().is_empty());
        assert!(bsp.faces().unwrap().is_empty());
    }

    #[test]
    fn bad_magic_is_rejected() {
        let mut map = MapFixture::default().build();
        map[0..4].copy_from_slice(b"PSBV");
        assert!(matches!(
            BspFile::parse(map).unwrap_err(),
            Error::BadBspSignature { found } if &found == b"PSBV"
        ));
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let mut map = MapFixture::default().build();
        map[4..8].copy_from_slice(&17i32.to_le_bytes());
        assert!(matches!(
            BspFile::parse(map).unwrap_err(),
            Error::UnsupportedBspVersion { version: 17 }
        ));
    }

    #[test]
    fn truncated_header_is_reported() {
        let map = MapFixture::default().build();
        let err = BspFile::parse(map[..100].to_vec()).unwrap_err();
        assert!(matches!(err, Error::TruncatedData { .. }));
    }

    #[test]
    fn oversized_lump_span_fails_without_poisoning_others() {
        let fixture = MapFixture {
            vertices: vec![Vec3::ZERO],
            ..MapFixture::default()
        };
        let mut map = fixture.build();

        // Corrupt the edges slot (12) to claim bytes past the end of file.
        let slot = 8 + LumpId::Edges.index() * LUMP_DIR_ENTRY_SIZE;
        let map_len = map.len() as u32;
        map[slot..slot + 4].copy_from_slice(&map_len.to_le_bytes());
        map[slot + 4..slot + 8].copy_from_slice(&64u32.to_le_bytes());

        let bsp = BspFile::parse(map).unwrap();
        assert!(matches!(
            bsp.lump(LumpId::Edges.index()).unwrap_err(),
            Error::LumpOutOfRange { index: 12, .. }
        ));
        // The valid vertex slot still resolves.
        assert_eq!(bsp.vertices().unwrap().len(), 1);
    }

    #[test]
    fn slot_index_past_directory_is_out_of_range() {
        let bsp = BspFile::parse(MapFixture::default().build()).unwrap();
        assert!(matches!(
            bsp.lump(HEADER_LUMPS).unwrap_err(),
            Error::LumpOutOfRange { .. }
        ));
    }

    #[test]
    fn ragged_lump_length_is_corrupt() {
        let fixture = MapFixture {
            vertices: vec![Vec3::ZERO],
            ..MapFixture::default()
        };
        let mut map = fixture.build();

        // Shave one byte off the vertex lump's declared length.
        let slot = 8 + LumpId::Vertices.index() * LUMP_DIR_ENTRY_SIZE;
        map[slot + 4..slot + 8].copy_from_slice(&11u32.to_le_bytes());

        let bsp = BspFile::parse(map).unwrap();
        assert!(matches!(
            bsp.vertices().unwrap_err(),
            Error::CorruptLump {
                lump: "vertices",
                length: 11,
                record_size: 12
            }
        ));
    }

    #[test]
    fn views_decode_lazily_and_restart() {
        let fixture = MapFixture {
            vertices: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(64.0, 0.0, 0.0),
                Vec3::new(64.0, 64.0, 0.0),
            ],
            edges: vec![(0, 1), (1, 2), (2, 0)],
            surf_edges: vec![1, 2, -3],
            ..MapFixture::default()
        };
        let bsp = BspFile::parse(fixture.build()).unwrap();

        let vertices = bsp.vertices().unwrap();
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices.get(1), Some(Vec3::new(64.0, 0.0, 0.0)));
        assert_eq!(vertices.get(3), None);

        // Two full passes over the same view.
        assert_eq!(vertices.iter().count(), 3);
        assert_eq!(vertices.iter().count(), 3);

        let edges = bsp.edges().unwrap();
        assert_eq!(edges.get(2), Some(Edge { v0: 2, v1: 0 }));

        let surf_edges = bsp.surf_edges().unwrap();
        assert_eq!(surf_edges.get(2), Some(SurfEdge(-3)));
    }

    #[test]
    fn planes_and_models_decode() {
        let fixture = MapFixture {
            planes: vec![(Vec3::Z, 16.0, 2)],
            models: vec![(Vec3::ZERO, Vec3::splat(64.0), 0, 4)],
            ..MapFixture::default()
        };
        let bsp = BspFile::parse(fixture.build()).unwrap();

        let plane = bsp.planes().unwrap().get(0).unwrap();
        assert_eq!(plane.normal, Vec3::Z);
        assert_eq!(plane.dist, 16.0);
        assert_eq!(plane.axis, 2);

        let model = bsp.models().unwrap().get(0).unwrap();
        assert_eq!(model.maxs, Vec3::splat(64.0));
        assert_eq!(model.first_face, 0);
        assert_eq!(model.face_count, 4);
    }
}
