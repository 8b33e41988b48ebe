//! # Byte Reader
//!
//! Bounds-checked little-endian cursor over container bytes.

use bytemuck::Pod;

use crate::error::{DecodeError, DecodeResult};

/// Forward-only little-endian reader.
///
/// Every read either returns the value and advances, or returns
/// [`DecodeError::Truncated`] and leaves the cursor where it was.
#[derive(Clone, Copy, Debug)]
pub struct ByteReader<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a reader at the start of `buffer`.
    #[must_use]
    pub const fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// Creates a reader positioned at `position`.
    #[must_use]
    pub const fn at(buffer: &'a [u8], position: usize) -> Self {
        Self { buffer, position }
    }

    /// Current offset from the start of the buffer.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Number of bytes remaining.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    /// Advances past `count` bytes.
    ///
    /// # Errors
    ///
    /// `Truncated` if fewer than `count` bytes remain.
    pub fn skip(&mut self, count: usize) -> DecodeResult<()> {
        self.read_bytes(count).map(|_| ())
    }

    /// Reads `count` raw bytes.
    ///
    /// # Errors
    ///
    /// `Truncated` if fewer than `count` bytes remain.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> DecodeResult<&'a [u8]> {
        let end = self
            .position
            .checked_add(count)
            .filter(|&end| end <= self.buffer.len())
            .ok_or(DecodeError::Truncated {
                offset: self.position,
                needed: count,
                len: self.buffer.len(),
            })?;
        let bytes = &self.buffer[self.position..end];
        self.position = end;
        Ok(bytes)
    }

    /// Reads a fixed-size byte array.
    ///
    /// # Errors
    ///
    /// `Truncated` if fewer than `N` bytes remain.
    #[inline]
    pub fn read_array<const N: usize>(&mut self) -> DecodeResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Reads a single byte.
    ///
    /// # Errors
    ///
    /// `Truncated` at end of input.
    #[inline]
    pub fn read_u8(&mut self) -> DecodeResult<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Reads a `u16`.
    ///
    /// # Errors
    ///
    /// `Truncated` if fewer than 2 bytes remain.
    #[inline]
    pub fn read_u16(&mut self) -> DecodeResult<u16> {
        self.read_array().map(u16::from_le_bytes)
    }

    /// Reads an `i16`.
    ///
    /// # Errors
    ///
    /// `Truncated` if fewer than 2 bytes remain.
    #[inline]
    pub fn read_i16(&mut self) -> DecodeResult<i16> {
        self.read_array().map(i16::from_le_bytes)
    }

    /// Reads a `u32`.
    ///
    /// # Errors
    ///
    /// `Truncated` if fewer than 4 bytes remain.
    #[inline]
    pub fn read_u32(&mut self) -> DecodeResult<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    /// Reads an `i32`.
    ///
    /// # Errors
    ///
    /// `Truncated` if fewer than 4 bytes remain.
    #[inline]
    pub fn read_i32(&mut self) -> DecodeResult<i32> {
        self.read_array().map(i32::from_le_bytes)
    }

    /// Reads `count` values of a byte-only `Pod` type, e.g. `[u8; 4]` palette entries.
    ///
    /// # Errors
    ///
    /// `Truncated` if the slice does not fit.
    pub fn read_slice<T: Pod>(&mut self, count: usize) -> DecodeResult<&'a [T]> {
        let size = std::mem::size_of::<T>();
        let needed = count.checked_mul(size).ok_or(DecodeError::Truncated {
            offset: self.position,
            needed: usize::MAX,
            len: self.buffer.len(),
        })?;
        let bytes = self.read_bytes(needed)?;
        bytemuck::try_cast_slice(bytes).map_err(|_| DecodeError::Truncated {
            offset: self.position - needed,
            needed,
            len: self.buffer.len(),
        })
    }
}
