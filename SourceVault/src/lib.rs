//! # SourceVault
//!
//! A pure-Rust library for decoding Valve Source engine asset files into
//! validated, renderable data.
//!
//! ## Supported Formats
//!
//! - **VPK archives** - Resolve and read packed files from a directory
//!   file plus numbered data chunks, with opt-in CRC32 verification
//! - **BSP maps** - Header and lump-directory parsing with lazy typed
//!   access to the geometry lumps
//! - **Mesh assembly** - Faces to per-material, GPU-ready vertex/index
//!   buffers with bounding data
//!
//! Everything is buffer-in, structured-data-out: the library never opens
//! files or sockets itself, so hosts can source bytes however they like
//! (disk, fetch, drag-and-drop) and hand them over fully materialized.
//!
//! ## Quick Start
//!
//! ### Reading a VPK archive
//!
//! ```no_run
//! use sourcevault::prelude::*;
//!
//! # fn main() -> sourcevault::Result<()> {
//! let directory = std::fs::read("hl2_textures_dir.vpk")?;
//! let archive = VpkArchive::parse(&directory)?;
//!
//! let entry = archive.resolve("vtf", "materials/brick", "brickwall003a")?;
//! println!("{} bytes packed", entry.payload_len());
//!
//! // Inline entries need no chunk files at all.
//! let data = archive.read_file(entry, &NoChunks, Integrity::Verify)?;
//! # let _ = data;
//! # Ok(())
//! # }
//! ```
//!
//! ### Assembling map geometry
//!
//! ```no_run
//! use sourcevault::bsp::BspFile;
//! use sourcevault::mesh::assemble_mesh;
//!
//! # fn main() -> sourcevault::Result<()> {
//! let map = BspFile::parse(std::fs::read("d1_trainstation_01.bsp")?)?;
//! let bundle = assemble_mesh(&map)?;
//! println!(
//!     "{} triangles across {} materials ({} degenerate faces skipped)",
//!     bundle.triangle_count(),
//!     bundle.meshes.len(),
//!     bundle.degenerate_faces,
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ### Using the Prelude
//!
//! The prelude provides convenient access to commonly used types:
//!
//! ```
//! use sourcevault::prelude::*;
//!
//! // Now you have access to:
//! // - VpkArchive, VpkEntry, ChunkProvider, Integrity
//! // - BspFile, LumpView, Face, Model
//! // - assemble_mesh, MeshBundle, Aabb
//! // - Error, Result, and more
//! ```

pub mod bridge;
pub mod bsp;
pub mod cursor;
pub mod error;
pub mod mesh;
pub mod vpk;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::bridge::PresentationBridge;
    pub use crate::bsp::{BspFile, Edge, Face, LumpId, LumpView, Model, Plane, SurfEdge, TexInfo};
    pub use crate::cursor::{ByteCursor, ByteSpan};
    pub use crate::error::{Error, Result};
    pub use crate::mesh::{assemble_mesh, assemble_model_mesh, Aabb, Mesh, MeshBundle, MeshVertex};
    pub use crate::vpk::{ChunkProvider, Integrity, NoChunks, VpkArchive, VpkEntry};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
