//! BSP map format reader
//!
//! A BSP file is a single buffer: a magic/version header, a fixed 64-slot
//! lump directory, and the lump payloads themselves. Each lump holds one
//! fixed-size record type; this module exposes the lumps needed for
//! geometry as lazy typed views, so an untouched lump costs nothing beyond
//! its directory slot.

mod reader;
mod types;

#[cfg(test)]
pub(crate) mod fixtures;

pub use reader::{BspFile, LumpView};
pub use types::{
    Edge, Face, LumpDirEntry, LumpId, LumpRecord, Model, Plane, SurfEdge, TexInfo, SURF_NODRAW,
    SURF_SKY,
};

/// BSP file identifier ("VBSP"; the byte order distinguishes it from the
/// big-endian console variant).
pub const BSP_MAGIC: [u8; 4] = *b"VBSP";

/// Minimum supported map version.
pub const MIN_VERSION: i32 = 19;

/// Maximum supported map version.
pub const MAX_VERSION: i32 = 21;

/// Number of slots in the lump directory.
pub const HEADER_LUMPS: usize = 64;

/// Size of one lump directory entry.
pub const LUMP_DIR_ENTRY_SIZE: usize = 16;

/// Total header size: ident + version + directory + map revision.
pub const HEADER_SIZE: usize = 4 + 4 + HEADER_LUMPS * LUMP_DIR_ENTRY_SIZE + 4;
