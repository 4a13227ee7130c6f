//! Bounds-checked big-endian record access.

use crate::error::{DecodeError, DecodeResult};

/// Borrow `len` bytes starting at `offset`.
///
/// # Errors
///
/// Returns [`DecodeError::TruncatedBuffer`] if the range does not fit in `data`.
pub(crate) fn span<'a>(
    data: &'a [u8],
    offset: usize,
    len: usize,
    context: &'static str,
) -> DecodeResult<&'a [u8]> {
    offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or(DecodeError::TruncatedBuffer {
            context,
            offset,
            needed: len,
            len: data.len(),
        })
}

/// Borrow a contiguous array of `count` records of `stride` bytes each.
pub(crate) fn array<'a>(
    data: &'a [u8],
    offset: usize,
    count: usize,
    stride: usize,
    context: &'static str,
) -> DecodeResult<&'a [u8]> {
    let len = count
        .checked_mul(stride)
        .ok_or(DecodeError::TruncatedBuffer {
            context,
            offset,
            needed: usize::MAX,
            len: data.len(),
        })?;
    span(data, offset, len, context)
}

pub(crate) fn be_u16(record: &[u8], at: usize) -> u16 {
    u16::from_be_bytes([record[at], record[at + 1]])
}

pub(crate) fn be_i16(record: &[u8], at: usize) -> i16 {
    i16::from_be_bytes([record[at], record[at + 1]])
}

pub(crate) fn be_u32(record: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([record[at], record[at + 1], record[at + 2], record[at + 3]])
}
