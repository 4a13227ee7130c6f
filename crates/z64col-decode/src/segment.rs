//! Segmented addresses.

use std::fmt;

use crate::error::Warning;

/// Mask selecting the offset part of a segmented address.
pub const OFFSET_MASK: u32 = 0x00FF_FFFF;

/// A 32-bit address split into an 8-bit segment and a 24-bit offset.
///
/// The segment is never dereferenced here; it only serves sanity checks.
/// Decoding always uses the offset, relative to the start of the file.
///
/// Built only through [`SegmentedAddress::resolve`], so the offset always
/// fits in 24 bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SegmentedAddress {
    segment: u8,
    offset: u32,
}

impl SegmentedAddress {
    /// Split a raw address into its segment and offset.
    #[must_use]
    pub const fn resolve(raw: u32) -> Self {
        Self {
            segment: (raw >> 24) as u8,
            offset: raw & OFFSET_MASK,
        }
    }

    #[must_use]
    pub const fn segment(self) -> u8 {
        self.segment
    }

    /// The 24-bit offset within the segment.
    #[must_use]
    pub const fn offset(self) -> u32 {
        self.offset
    }

    /// Reassemble the raw 32-bit value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        ((self.segment as u32) << 24) | self.offset
    }

    /// The offset as a buffer index.
    #[must_use]
    pub const fn file_offset(self) -> usize {
        self.offset as usize
    }

    /// Check that a required address is set and uses the expected segment.
    ///
    /// Addresses that are not required never warn. An unset address takes
    /// precedence over a segment mismatch, since zero never has the expected
    /// segment unless that segment is zero.
    #[must_use]
    pub fn validate(
        self,
        what: &'static str,
        expected_segment: u8,
        must_be_defined: bool,
    ) -> Option<Warning> {
        if !must_be_defined {
            return None;
        }
        if self.raw() == 0 {
            return Some(Warning::UndefinedRequiredOffset { what });
        }
        if self.segment != expected_segment {
            return Some(Warning::SegmentMismatch {
                what,
                address: self.raw(),
                expected: expected_segment,
            });
        }
        None
    }
}

impl From<u32> for SegmentedAddress {
    fn from(raw: u32) -> Self {
        Self::resolve(raw)
    }
}

impl fmt::Display for SegmentedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.raw())
    }
}
