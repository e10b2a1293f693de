//! VPK directory parsing and payload reconstruction

use std::collections::HashMap;

use crate::cursor::{ByteCursor, ByteSpan};
use crate::error::{Error, Result};

use super::types::{ChunkProvider, Integrity, VpkEntry};
use super::{ENTRY_TERMINATOR, INLINE_CHUNK, MAX_VERSION, MIN_VERSION, VPK_MAGIC};

/// Files map, keyed by extension, then directory, then filename.
type DirMap = HashMap<String, HashMap<String, HashMap<String, VpkEntry>>>;

/// Section sizes appended to the version 2 header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VpkSections {
    /// Bytes of file content stored in the directory file itself.
    pub file_data_size: u32,
    /// Size of the MD5 section covering external archive content.
    pub archive_md5_size: u32,
    /// Size of the MD5 section covering this file.
    pub other_md5_size: u32,
    /// Size of the public key + signature section.
    pub signature_size: u32,
}

/// A parsed VPK directory.
///
/// Built once from the directory bytes and immutable afterward. Payload
/// reads borrow chunk buffers from the caller through [`ChunkProvider`];
/// the archive itself never touches the filesystem.
#[derive(Debug)]
pub struct VpkArchive {
    version: u32,
    tree_size: u32,
    sections: Option<VpkSections>,
    /// Highest chunk number referenced by any entry, if any entry points
    /// into a chunk at all.
    max_chunk_index: Option<u16>,
    file_count: usize,
    files: DirMap,
}

impl VpkArchive {
    /// Parse a VPK directory from its complete byte buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadVpkSignature`] or [`Error::UnsupportedVpkVersion`]
    /// for a foreign or unknown header, [`Error::TruncatedTree`] if a tree
    /// level is missing its terminator, and [`Error::BadEntryTerminator`] /
    /// [`Error::InlineEntryLength`] for malformed entry records.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(data);

        let magic = cursor.read_u32()?;
        if magic != VPK_MAGIC {
            return Err(Error::BadVpkSignature { found: magic });
        }

        let version = cursor.read_u32()?;
        if !(MIN_VERSION..=MAX_VERSION).contains(&version) {
            return Err(Error::UnsupportedVpkVersion { version });
        }

        let tree_size = cursor.read_u32()?;

        let sections = if version == 2 {
            Some(VpkSections {
                file_data_size: cursor.read_u32()?,
                archive_md5_size: cursor.read_u32()?,
                other_md5_size: cursor.read_u32()?,
                signature_size: cursor.read_u32()?,
            })
        } else {
            None
        };

        tracing::debug!("VPK directory version {version}, tree size {tree_size}");

        let mut files: DirMap = HashMap::new();
        let mut max_chunk_index = None;
        let mut file_count = 0usize;

        loop {
            let ext = read_tree_string(&mut cursor)?;
            if ext.is_empty() {
                break;
            }
            loop {
                let dir = read_tree_string(&mut cursor)?;
                if dir.is_empty() {
                    break;
                }
                // A single space marks the archive root.
                let dir = if dir == " " { String::new() } else { dir };
                loop {
                    let name = read_tree_string(&mut cursor)?;
                    if name.is_empty() {
                        break;
                    }

                    let entry = read_entry(&mut cursor)?;
                    if !entry.is_inline() {
                        let chunk = entry.archive_index;
                        max_chunk_index =
                            Some(max_chunk_index.map_or(chunk, |max: u16| max.max(chunk)));
                    }

                    files
                        .entry(ext.clone())
                        .or_default()
                        .entry(dir.clone())
                        .or_default()
                        .insert(name, entry);
                    file_count += 1;
                }
            }
        }

        tracing::debug!(
            "parsed VPK tree: {file_count} files across {} extensions, max chunk {max_chunk_index:?}",
            files.len()
        );

        Ok(Self {
            version,
            tree_size,
            sections,
            max_chunk_index,
            file_count,
            files,
        })
    }

    /// Look up an entry by extension, directory and filename.
    ///
    /// Lookups are case-insensitive; the empty string is a valid extension
    /// and a valid directory (the archive root, also reachable as `" "`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no such entry exists.
    pub fn resolve(&self, ext: &str, dir: &str, name: &str) -> Result<&VpkEntry> {
        let ext = normalize(ext);
        let dir = normalize_dir(dir);
        let name = normalize(name);

        self.files
            .get(&ext)
            .and_then(|dirs| dirs.get(&dir))
            .and_then(|names| names.get(&name))
            .ok_or_else(|| Error::NotFound {
                path: display_path(&ext, &dir, &name),
            })
    }

    /// Reconstruct an entry's payload from its preload bytes plus, for
    /// non-inline entries, the caller-supplied chunk buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingChunk`] when the entry's chunk buffer was
    /// not supplied, [`Error::OutOfBounds`] when the entry's range escapes
    /// that buffer, and [`Error::IntegrityMismatch`] when
    /// [`Integrity::Verify`] was requested and the CRC32 disagrees.
    pub fn read_file(
        &self,
        entry: &VpkEntry,
        chunks: &impl ChunkProvider,
        integrity: Integrity,
    ) -> Result<Vec<u8>> {
        let mut payload = Vec::with_capacity(entry.payload_len());
        payload.extend_from_slice(&entry.preload);

        if !entry.is_inline() && entry.entry_length > 0 {
            let chunk = chunks.chunk(entry.archive_index).ok_or(Error::MissingChunk {
                index: entry.archive_index,
            })?;
            let span = ByteSpan::new(entry.entry_offset, entry.entry_length);
            payload.extend_from_slice(ByteCursor::new(chunk).slice(span)?);
        }

        if integrity == Integrity::Verify {
            let mut hasher = crc32fast::Hasher::new();
            hasher.update(&payload);
            let actual = hasher.finalize();
            if actual != entry.crc {
                return Err(Error::IntegrityMismatch {
                    expected: entry.crc,
                    actual,
                });
            }
        }

        Ok(payload)
    }

    /// Resolve a path and read its payload in one step.
    ///
    /// # Errors
    ///
    /// Any error from [`resolve`](Self::resolve) or
    /// [`read_file`](Self::read_file).
    pub fn resolve_and_read(
        &self,
        ext: &str,
        dir: &str,
        name: &str,
        chunks: &impl ChunkProvider,
        integrity: Integrity,
    ) -> Result<Vec<u8>> {
        let entry = self.resolve(ext, dir, name)?;
        self.read_file(entry, chunks, integrity)
    }

    /// Directory format version (1 or 2).
    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Tree size declared by the header.
    #[must_use]
    pub fn tree_size(&self) -> u32 {
        self.tree_size
    }

    /// Version 2 section sizes, absent on version 1 directories.
    #[must_use]
    pub fn sections(&self) -> Option<&VpkSections> {
        self.sections.as_ref()
    }

    /// Highest chunk number any entry points into, if any.
    #[must_use]
    pub fn max_chunk_index(&self) -> Option<u16> {
        self.max_chunk_index
    }

    /// Number of file entries in the tree.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.file_count
    }

    /// Iterate all entries as `(extension, directory, filename, entry)`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &str, &VpkEntry)> {
        self.files.iter().flat_map(|(ext, dirs)| {
            dirs.iter().flat_map(move |(dir, names)| {
                names
                    .iter()
                    .map(move |(name, entry)| (ext.as_str(), dir.as_str(), name.as_str(), entry))
            })
        })
    }
}

/// Read one NUL-terminated tree string, case-normalized.
fn read_tree_string(cursor: &mut ByteCursor<'_>) -> Result<String> {
    let offset = cursor.position();
    let bytes = cursor
        .read_cstr()
        .map_err(|_| Error::TruncatedTree { offset })?;
    Ok(String::from_utf8_lossy(bytes).to_lowercase())
}

/// Read one 18-byte directory entry record plus its inline preload bytes.
fn read_entry(cursor: &mut ByteCursor<'_>) -> Result<VpkEntry> {
    let crc = cursor.read_u32()?;
    let preload_len = cursor.read_u16()?;
    let archive_index = cursor.read_u16()?;
    let entry_offset = cursor.read_u32()?;
    let entry_length = cursor.read_u32()?;

    let terminator = cursor.read_u16()?;
    if terminator != ENTRY_TERMINATOR {
        return Err(Error::BadEntryTerminator { found: terminator });
    }
    if archive_index == INLINE_CHUNK && entry_length != 0 {
        return Err(Error::InlineEntryLength {
            length: entry_length,
        });
    }

    let preload = cursor.take(preload_len as usize)?.to_vec();

    Ok(VpkEntry {
        crc,
        preload,
        archive_index,
        entry_offset,
        entry_length,
    })
}

fn normalize(key: &str) -> String {
    key.to_lowercase()
}

fn normalize_dir(dir: &str) -> String {
    if dir == " " {
        String::new()
    } else {
        dir.to_lowercase()
    }
}

fn display_path(ext: &str, dir: &str, name: &str) -> String {
    let mut path = String::new();
    if !dir.is_empty() {
        path.push_str(dir);
        path.push('/');
    }
    path.push_str(name);
    if !ext.is_empty() {
        path.push('.');
        path.push_str(ext);
    }
    path
}
