//! Types for VPK archive handling

use std::collections::HashMap;

use super::INLINE_CHUNK;

/// Whether a payload read checks the entry's CRC32.
///
/// Verification walks the whole reconstructed payload; callers reading
/// large entries on a hot path can opt out per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Integrity {
    /// Compute a CRC32 over the payload and compare it to the directory.
    Verify,
    /// Trust the directory and skip the checksum.
    Skip,
}

/// A single file entry from the VPK directory tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VpkEntry {
    /// CRC32 of the complete payload.
    pub crc: u32,
    /// Bytes stored inline in the directory. Either the whole payload
    /// (inline entries) or a prefix of it.
    pub preload: Vec<u8>,
    /// Numbered chunk holding the external part of the payload, or
    /// [`INLINE_CHUNK`] when there is none.
    pub archive_index: u16,
    /// Offset of the external bytes within the chunk.
    pub entry_offset: u32,
    /// Number of external bytes. Always 0 for inline entries.
    pub entry_length: u32,
}

impl VpkEntry {
    /// Returns true if the payload is fully contained in [`preload`].
    ///
    /// [`preload`]: VpkEntry::preload
    #[must_use]
    pub fn is_inline(&self) -> bool {
        self.archive_index == INLINE_CHUNK
    }

    /// Total payload size once preload and external bytes are joined.
    #[must_use]
    pub fn payload_len(&self) -> usize {
        self.preload.len() + self.entry_length as usize
    }
}

/// Source of numbered data-chunk buffers.
///
/// The chunk index is encoded in the chunk file's name by a convention
/// outside this crate; callers hand over buffers already keyed by that
/// number.
pub trait ChunkProvider {
    /// The chunk buffer for `index`, if the caller supplied one.
    fn chunk(&self, index: u16) -> Option<&[u8]>;
}

impl<B: AsRef<[u8]>> ChunkProvider for HashMap<u16, B> {
    fn chunk(&self, index: u16) -> Option<&[u8]> {
        self.get(&index).map(AsRef::as_ref)
    }
}

/// Provider for callers that have no chunk files at all (pure-inline
/// archives).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoChunks;

impl ChunkProvider for NoChunks {
    fn chunk(&self, _index: u16) -> Option<&[u8]> {
        None
    }
}
