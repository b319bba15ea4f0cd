//! Utility functions for COFF decoding
//!
//! Header fields are reconstructed from byte sequences rather than read
//! through typed overlays, so unaligned and adversarial inputs stay safe.

use memchr::memchr;

use crate::coff::types::{CoffError, Result};

/// Extension trait for reading little-endian primitives from byte slices
pub trait ReadExt {
    fn read_u8_at(&self, offset: usize) -> Option<u8>;
    fn read_u16_le_at(&self, offset: usize) -> Option<u16>;
    fn read_i16_le_at(&self, offset: usize) -> Option<i16>;
    fn read_u32_le_at(&self, offset: usize) -> Option<u32>;
    fn read_i32_le_at(&self, offset: usize) -> Option<i32>;
    fn read_slice_at(&self, offset: usize, len: usize) -> Option<&[u8]>;
}

impl ReadExt for [u8] {
    #[inline(always)]
    fn read_u8_at(&self, offset: usize) -> Option<u8> {
        self.get(offset).copied()
    }

    #[inline(always)]
    fn read_u16_le_at(&self, offset: usize) -> Option<u16> {
        self.get(offset..offset.checked_add(2)?)
            .and_then(|b| b.try_into().ok())
            .map(u16::from_le_bytes)
    }

    #[inline(always)]
    fn read_i16_le_at(&self, offset: usize) -> Option<i16> {
        self.read_u16_le_at(offset).map(|v| v as i16)
    }

    #[inline(always)]
    fn read_u32_le_at(&self, offset: usize) -> Option<u32> {
        self.get(offset..offset.checked_add(4)?)
            .and_then(|b| b.try_into().ok())
            .map(u32::from_le_bytes)
    }

    #[inline(always)]
    fn read_i32_le_at(&self, offset: usize) -> Option<i32> {
        self.read_u32_le_at(offset).map(|v| v as i32)
    }

    #[inline(always)]
    fn read_slice_at(&self, offset: usize, len: usize) -> Option<&[u8]> {
        self.get(offset..offset.checked_add(len)?)
    }
}

/// Read a null-terminated string starting at `offset`.
///
/// The terminator must fall inside the buffer; a string running off the
/// end of the file is a parse error, not a partial read.
pub fn read_cstr_at(data: &[u8], offset: usize) -> Result<&[u8]> {
    let tail = data
        .get(offset..)
        .ok_or(CoffError::UnterminatedString { offset })?;
    match memchr(0, tail) {
        Some(end) => Ok(&tail[..end]),
        None => Err(CoffError::UnterminatedString { offset }),
    }
}

/// Decode a fixed 8-byte inline name field, truncating at the first null.
pub fn short_name_to_string(name: &[u8]) -> String {
    let end = memchr(0, name).unwrap_or(name.len());
    String::from_utf8_lossy(&name[..end]).into_owned()
}
