//! Bounds-checked little-endian reads over in-memory buffers
//!
//! Every parser in this crate works through [`ByteCursor`]: a thin wrapper
//! around an immutable byte slice and a read position. Out-of-range access
//! is always a typed error, never a panic, so untrusted input can at worst
//! produce an [`Error`](crate::Error) for the caller to report.

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{Error, Result};

/// A half-open byte range indexing into some backing buffer.
///
/// A span never owns data; it is only meaningful against the buffer it was
/// resolved from, and is invalid if `offset + length` exceeds that buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteSpan {
    /// Start of the range, in bytes from the beginning of the buffer.
    pub offset: u32,
    /// Length of the range in bytes.
    pub length: u32,
}

impl ByteSpan {
    /// Create a span from an offset and length.
    #[must_use]
    pub fn new(offset: u32, length: u32) -> Self {
        Self { offset, length }
    }

    /// One past the last byte of the range.
    ///
    /// Widened to `u64` so `offset + length` cannot wrap.
    #[must_use]
    pub fn end(self) -> u64 {
        u64::from(self.offset) + u64::from(self.length)
    }

    /// Returns true for a zero-length span.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.length == 0
    }
}

/// Sequential and random-access reader over an immutable byte buffer.
///
/// All multi-byte reads are little-endian, as both the VPK and BSP formats
/// require.
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor at position 0.
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current read position.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes left between the position and the end of the buffer.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Total size of the backing buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if the backing buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Fail with [`Error::TruncatedData`] unless `needed` bytes remain.
    fn require(&self, needed: usize) -> Result<()> {
        if self.remaining() < needed {
            return Err(Error::TruncatedData {
                offset: self.pos,
                needed,
                remaining: self.remaining(),
            });
        }
        Ok(())
    }

    /// Move the read position to an absolute offset.
    ///
    /// Seeking to exactly `len()` is allowed (the cursor is then exhausted);
    /// anything past that fails with [`Error::OutOfBounds`].
    pub fn seek(&mut self, offset: usize) -> Result<()> {
        if offset > self.buf.len() {
            return Err(Error::OutOfBounds {
                offset,
                length: 0,
                available: self.buf.len(),
            });
        }
        self.pos = offset;
        Ok(())
    }

    /// Read `length` raw bytes and advance.
    pub fn take(&mut self, length: usize) -> Result<&'a [u8]> {
        self.require(length)?;
        let bytes = &self.buf[self.pos..self.pos + length];
        self.pos += length;
        Ok(bytes)
    }

    /// Resolve a span against the buffer without moving the position.
    pub fn slice(&self, span: ByteSpan) -> Result<&'a [u8]> {
        if span.end() > self.buf.len() as u64 {
            return Err(Error::OutOfBounds {
                offset: span.offset as usize,
                length: span.length as usize,
                available: self.buf.len(),
            });
        }
        Ok(&self.buf[span.offset as usize..(span.offset + span.length) as usize])
    }

    /// Read bytes up to (not including) the next NUL and consume the NUL.
    ///
    /// Fails with [`Error::TruncatedData`] if the buffer ends before a NUL
    /// is found.
    pub fn read_cstr(&mut self) -> Result<&'a [u8]> {
        let Some(len) = self.buf[self.pos..].iter().position(|&b| b == 0) else {
            return Err(Error::TruncatedData {
                offset: self.pos,
                needed: self.remaining() + 1,
                remaining: self.remaining(),
            });
        };
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len + 1;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.require(1)?;
        let value = self.buf[self.pos];
        self.pos += 1;
        Ok(value)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.require(2)?;
        let value = (&self.buf[self.pos..]).read_u16::<LittleEndian>()?;
        self.pos += 2;
        Ok(value)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.require(4)?;
        let value = (&self.buf[self.pos..]).read_u32::<LittleEndian>()?;
        self.pos += 4;
        Ok(value)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.require(2)?;
        let value = (&self.buf[self.pos..]).read_i16::<LittleEndian>()?;
        self.pos += 2;
        Ok(value)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.require(4)?;
        let value = (&self.buf[self.pos..]).read_i32::<LittleEndian>()?;
        self.pos += 4;
        Ok(value)
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.require(4)?;
        let value = (&self.buf[self.pos..]).read_f32::<LittleEndian>()?;
        self.pos += 4;
        Ok(value)
    }
}
