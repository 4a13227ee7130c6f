//! Mesh collision header.

use glam::I16Vec3;

use crate::error::{DecodeResult, Warning};
use crate::reader::{be_i16, be_u16, be_u32, span};
use crate::segment::SegmentedAddress;

/// Size of the mesh collision header in bytes.
pub const HEADER_SIZE: usize = 44;

/// Bounds and array locations of a collision mesh.
///
/// # Format
///
/// All fields are big-endian:
///
/// - `0x00`: minimum corner (3 × i16)
/// - `0x06`: maximum corner (3 × i16)
/// - `0x0C`: vertex count (u16), 2 bytes padding
/// - `0x10`: vertex array address (u32)
/// - `0x14`: polygon count (u16), 2 bytes padding
/// - `0x18`: polygon array address (u32)
/// - `0x1C`: polytype table address (u32)
/// - `0x20`: camera data address (u32)
/// - `0x24`: waterbox count (u16), 2 bytes padding
/// - `0x28`: waterbox array address (u32)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CollisionHeader {
    pub min: I16Vec3,
    pub max: I16Vec3,
    pub vertex_count: u16,
    pub vertex_array: SegmentedAddress,
    pub polygon_count: u16,
    pub polygon_array: SegmentedAddress,
    pub polytype_table: SegmentedAddress,
    pub camera_data: SegmentedAddress,
    /// Waterboxes are not decoded further.
    pub waterbox_count: u16,
    pub waterbox_array: SegmentedAddress,
}

impl CollisionHeader {
    /// Read the header located at `offset` in `data`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DecodeError::TruncatedBuffer`] if the 44-byte header
    /// does not fit.
    pub fn load(data: &[u8], offset: usize) -> DecodeResult<Self> {
        let h = span(data, offset, HEADER_SIZE, "mesh collision header")?;

        Ok(Self {
            min: I16Vec3::new(be_i16(h, 0x00), be_i16(h, 0x02), be_i16(h, 0x04)),
            max: I16Vec3::new(be_i16(h, 0x06), be_i16(h, 0x08), be_i16(h, 0x0A)),
            vertex_count: be_u16(h, 0x0C),
            vertex_array: be_u32(h, 0x10).into(),
            polygon_count: be_u16(h, 0x14),
            polygon_array: be_u32(h, 0x18).into(),
            polytype_table: be_u32(h, 0x1C).into(),
            camera_data: be_u32(h, 0x20).into(),
            waterbox_count: be_u16(h, 0x24),
            waterbox_array: be_u32(h, 0x28).into(),
        })
    }

    /// Check every address the decoder may use against `expected_segment`.
    ///
    /// The polytype table is only required when there are polygons to
    /// reference it. Camera data is always required.
    #[must_use]
    pub fn sanity_check_segments(&self, expected_segment: u8) -> Vec<Warning> {
        let has_polygons = self.polygon_count != 0;
        let addresses = [
            ("vertex array", self.vertex_array, self.vertex_count != 0),
            ("polygon array", self.polygon_array, has_polygons),
            ("polytypes table", self.polytype_table, has_polygons),
            ("cameradata", self.camera_data, true),
            ("waterbox array", self.waterbox_array, self.waterbox_count != 0),
        ];

        addresses
            .into_iter()
            .filter_map(|(what, address, must_be_defined)| {
                address.validate(what, expected_segment, must_be_defined)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;

    fn header_bytes() -> Vec<u8> {
        let mut h = Vec::with_capacity(HEADER_SIZE);
        for v in [-100i16, -50, -25, 100, 50, 25] {
            h.extend_from_slice(&v.to_be_bytes());
        }
        h.extend_from_slice(&[0x00, 0x04, 0xAA, 0xBB]); // vertex count + padding
        h.extend_from_slice(&0x0600_0100u32.to_be_bytes());
        h.extend_from_slice(&[0x00, 0x02, 0x00, 0x00]); // polygon count + padding
        h.extend_from_slice(&0x0600_0200u32.to_be_bytes());
        h.extend_from_slice(&0x0600_0300u32.to_be_bytes());
        h.extend_from_slice(&0x0600_0400u32.to_be_bytes());
        h.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]); // waterbox count + padding
        h.extend_from_slice(&0u32.to_be_bytes());
        assert_eq!(h.len(), HEADER_SIZE);
        h
    }

    #[test]
    fn test_load_header() {
        let mut data = vec![0xFFu8; 8];
        data.extend(header_bytes());

        let header = CollisionHeader::load(&data, 8).unwrap();
        assert_eq!(header.min, I16Vec3::new(-100, -50, -25));
        assert_eq!(header.max, I16Vec3::new(100, 50, 25));
        assert_eq!(header.vertex_count, 4);
        assert_eq!(header.vertex_array.raw(), 0x0600_0100);
        assert_eq!(header.polygon_count, 2);
        assert_eq!(header.polygon_array.offset(), 0x200);
        assert_eq!(header.polytype_table.offset(), 0x300);
        assert_eq!(header.camera_data.offset(), 0x400);
        assert_eq!(header.waterbox_count, 0);
        assert_eq!(header.waterbox_array.raw(), 0);
    }

    #[test]
    fn test_load_truncated() {
        let data = header_bytes();
        assert_eq!(
            CollisionHeader::load(&data[..43], 0),
            Err(DecodeError::TruncatedBuffer {
                context: "mesh collision header",
                offset: 0,
                needed: HEADER_SIZE,
                len: 43,
            })
        );
        assert!(CollisionHeader::load(&data, 1).is_err());
    }

    #[test]
    fn test_sanity_check_clean() {
        let header = CollisionHeader::load(&header_bytes(), 0).unwrap();
        assert!(header.sanity_check_segments(6).is_empty());
    }

    #[test]
    fn test_sanity_check_wrong_segment() {
        let header = CollisionHeader::load(&header_bytes(), 0).unwrap();
        let warnings = header.sanity_check_segments(2);
        // Waterbox array is unused since its count is zero.
        assert_eq!(warnings.len(), 4);
        assert!(
            warnings
                .iter()
                .all(|w| matches!(w, Warning::SegmentMismatch { expected: 2, .. }))
        );
    }

    #[test]
    fn test_sanity_check_missing_camera_data() {
        let mut header = CollisionHeader::load(&header_bytes(), 0).unwrap();
        header.camera_data = SegmentedAddress::resolve(0);
        header.polygon_count = 0;
        header.polygon_array = SegmentedAddress::resolve(0);
        header.polytype_table = SegmentedAddress::resolve(0);

        assert_eq!(
            header.sanity_check_segments(6),
            vec![Warning::UndefinedRequiredOffset { what: "cameradata" }]
        );
    }

    #[test]
    fn test_sanity_check_waterboxes() {
        let mut header = CollisionHeader::load(&header_bytes(), 0).unwrap();
        header.waterbox_count = 1;
        assert_eq!(
            header.sanity_check_segments(6),
            vec![Warning::UndefinedRequiredOffset {
                what: "waterbox array"
            }]
        );
    }
}
