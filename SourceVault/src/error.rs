//! Error types for `sourcevault`

use thiserror::Error;

/// The error type for `sourcevault` operations.
///
/// Every failure is recoverable and carries enough context (offsets,
/// expected vs. actual sizes) for the caller to log or display. Nothing in
/// this crate aborts the process on malformed input.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from an underlying reader.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Byte Cursor Errors ====================
    /// A sequential read ran past the end of the buffer.
    #[error("truncated data at offset {offset}: needed {needed} bytes, {remaining} remain")]
    TruncatedData {
        /// Cursor position when the read was attempted.
        offset: usize,
        /// Number of bytes the read required.
        needed: usize,
        /// Number of bytes actually remaining.
        remaining: usize,
    },

    /// A seek or span referenced a range outside the buffer.
    #[error("out of bounds: offset {offset} + length {length} exceeds buffer of {available} bytes")]
    OutOfBounds {
        /// Start of the requested range.
        offset: usize,
        /// Length of the requested range (0 for a bare seek).
        length: usize,
        /// Size of the backing buffer.
        available: usize,
    },

    // ==================== VPK Archive Errors ====================
    /// The buffer is not a valid VPK directory (wrong magic).
    #[error("invalid VPK magic: {found:#010x} (expected 0x55aa1234)")]
    BadVpkSignature {
        /// The 32-bit value found where the magic should be.
        found: u32,
    },

    /// The VPK directory version is not supported.
    #[error("unsupported VPK version: {version} (supported: 1-2)")]
    UnsupportedVpkVersion {
        /// The version number found in the header.
        version: u32,
    },

    /// The directory tree ended before a level was terminated.
    #[error("truncated VPK tree at offset {offset}")]
    TruncatedTree {
        /// Offset at which the tree ran out of bytes.
        offset: usize,
    },

    /// A directory entry did not end with the 0xffff terminator.
    #[error("invalid VPK entry terminator: {found:#06x} (expected 0xffff)")]
    BadEntryTerminator {
        /// The 16-bit value found in the terminator slot.
        found: u16,
    },

    /// An inline entry declared a nonzero external data length.
    #[error("inline VPK entry declares {length} external bytes (must be 0)")]
    InlineEntryLength {
        /// The external length the entry declared.
        length: u32,
    },

    /// The requested file is not present in the archive tree.
    #[error("file not found in VPK: {path}")]
    NotFound {
        /// The normalized `dir/name.ext` path that was looked up.
        path: String,
    },

    /// A payload read required a chunk buffer that was not supplied.
    #[error("VPK chunk {index} not supplied")]
    MissingChunk {
        /// The numbered chunk the entry points into.
        index: u16,
    },

    /// The reconstructed payload failed its CRC32 check.
    #[error("VPK integrity mismatch: expected {expected:#010x}, computed {actual:#010x}")]
    IntegrityMismatch {
        /// Checksum recorded in the directory entry.
        expected: u32,
        /// Checksum computed over the reconstructed payload.
        actual: u32,
    },

    // ==================== BSP Map Errors ====================
    /// The buffer is not a valid BSP file (wrong identifier).
    #[error("invalid BSP identifier: {found:?} (expected \"VBSP\")")]
    BadBspSignature {
        /// The four bytes found where the identifier should be.
        found: [u8; 4],
    },

    /// The BSP version is not supported.
    #[error("unsupported BSP version: {version} (supported: 19-21)")]
    UnsupportedBspVersion {
        /// The version number found in the header.
        version: i32,
    },

    /// A lump slot is out of range or its span escapes the file.
    #[error("lump {index} out of range: offset {offset} + length {length} exceeds file of {available} bytes")]
    LumpOutOfRange {
        /// The lump slot number.
        index: usize,
        /// Declared lump offset.
        offset: u32,
        /// Declared lump length.
        length: u32,
        /// Size of the map buffer.
        available: usize,
    },

    /// A lump's length is not a whole number of records.
    #[error("corrupt {lump} lump: {length} bytes is not a multiple of the {record_size}-byte record")]
    CorruptLump {
        /// Name of the lump being decoded.
        lump: &'static str,
        /// Declared lump length in bytes.
        length: u32,
        /// Fixed record size for that lump.
        record_size: usize,
    },
}

/// A specialized Result type for `sourcevault` operations.
pub type Result<T> = std::result::Result<T, Error>;
