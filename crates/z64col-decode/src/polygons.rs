//! Polygon array decoding.

use glam::I16Vec3;

use crate::error::{DecodeError, DecodeResult};
use crate::materials::IgnoreFlags;
use crate::reader::{array, be_i16, be_u16};
use crate::segment::SegmentedAddress;

/// Size of one polygon record.
pub const POLYGON_SIZE: usize = 16;

/// Low 13 bits of a vertex reference hold the vertex index.
pub const VERTEX_INDEX_MASK: u16 = 0x1FFF;

/// Bit of the second vertex reference enabling conveyor behavior.
pub const ENABLE_CONVEYOR_BIT: u16 = 0x2000;

/// A triangle record as stored in the file, before material resolution.
///
/// # Format
///
/// 16 bytes, big-endian:
///
/// - `polytype_index: u16`
/// - `ref_a, ref_b, ref_c: u16`, vertex index in the low 13 bits
/// - `normal: 3 × i16`
/// - `plane_distance: i16`
///
/// The high 3 bits of `ref_a` are the ignore flags and bit 13 of `ref_b`
/// enables conveyors. The remaining high bits are kept as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawTriangle {
    pub polytype_index: u16,
    pub vertex_refs: [u16; 3],
    pub normal: I16Vec3,
    /// Plane distance, carried through without interpretation.
    pub plane_distance: i16,
}

impl RawTriangle {
    /// Vertex indices with the flag bits masked off.
    #[must_use]
    pub fn vertex_indices(&self) -> [u16; 3] {
        self.vertex_refs.map(|r| r & VERTEX_INDEX_MASK)
    }

    #[must_use]
    pub fn ignore_flags(&self) -> IgnoreFlags {
        IgnoreFlags::from_vertex_ref(self.vertex_refs[0])
    }

    #[must_use]
    pub fn enable_conveyor(&self) -> bool {
        self.vertex_refs[1] & ENABLE_CONVEYOR_BIT != 0
    }

    fn parse(r: &[u8]) -> Self {
        Self {
            polytype_index: be_u16(r, 0),
            vertex_refs: [be_u16(r, 2), be_u16(r, 4), be_u16(r, 6)],
            normal: I16Vec3::new(be_i16(r, 8), be_i16(r, 10), be_i16(r, 12)),
            plane_distance: be_i16(r, 14),
        }
    }
}

/// Decode `count` triangles starting at `addr`.
///
/// Every masked vertex index is checked against `vertex_count`.
///
/// # Errors
///
/// Returns [`DecodeError::TruncatedBuffer`] if the array does not fit, or
/// [`DecodeError::VertexIndexOutOfRange`] for the first triangle referencing
/// a vertex at or past `vertex_count`.
pub fn decode_polygons(
    data: &[u8],
    addr: SegmentedAddress,
    count: u16,
    vertex_count: usize,
) -> DecodeResult<Vec<RawTriangle>> {
    let records = array(
        data,
        addr.file_offset(),
        usize::from(count),
        POLYGON_SIZE,
        "polygon array",
    )?;

    records
        .chunks_exact(POLYGON_SIZE)
        .enumerate()
        .map(|(triangle, r)| {
            let raw = RawTriangle::parse(r);
            if let Some(&index) = raw
                .vertex_indices()
                .iter()
                .find(|&&i| usize::from(i) >= vertex_count)
            {
                return Err(DecodeError::VertexIndexOutOfRange {
                    triangle,
                    index,
                    vertex_count,
                });
            }
            Ok(raw)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(polytype: u16, refs: [u16; 3], normal: [i16; 3], d: i16) -> Vec<u8> {
        let mut r = Vec::with_capacity(POLYGON_SIZE);
        r.extend_from_slice(&polytype.to_be_bytes());
        for v in refs {
            r.extend_from_slice(&v.to_be_bytes());
        }
        for n in normal {
            r.extend_from_slice(&n.to_be_bytes());
        }
        r.extend_from_slice(&d.to_be_bytes());
        r
    }

    #[test]
    fn test_decode_polygon_fields() {
        let data = record(3, [0, 1, 2], [0, 0x7FFF, 0], -120);
        let triangles = decode_polygons(&data, SegmentedAddress::default(), 1, 3).unwrap();
        assert_eq!(
            triangles,
            vec![RawTriangle {
                polytype_index: 3,
                vertex_refs: [0, 1, 2],
                normal: I16Vec3::new(0, 0x7FFF, 0),
                plane_distance: -120,
            }]
        );
    }

    #[test]
    fn test_ignore_flags_from_first_ref() {
        let data = record(0, [0x2005, 1, 2], [0; 3], 0);
        let triangle = decode_polygons(&data, SegmentedAddress::default(), 1, 6).unwrap()[0];
        assert_eq!(triangle.ignore_flags().bits(), 1);
        assert!(triangle.ignore_flags().camera());
        assert!(!triangle.ignore_flags().entities());
        assert!(!triangle.ignore_flags().projectiles());
        assert_eq!(triangle.vertex_indices(), [5, 1, 2]);
    }

    #[test]
    fn test_enable_conveyor_bit() {
        let data = [record(0, [0, 0x2000, 1], [0; 3], 0), record(0, [0, 0x1FFF, 1], [0; 3], 0)]
            .concat();
        let triangles =
            decode_polygons(&data, SegmentedAddress::default(), 2, 0x2000).unwrap();
        assert!(triangles[0].enable_conveyor());
        assert_eq!(triangles[0].vertex_indices()[1], 0);
        assert!(!triangles[1].enable_conveyor());
        assert_eq!(triangles[1].vertex_indices()[1], 0x1FFF);
    }

    #[test]
    fn test_undocumented_ref_bits_kept() {
        let data = record(0, [0xE000, 0xC001, 0xE002], [0; 3], 0);
        let triangle = decode_polygons(&data, SegmentedAddress::default(), 1, 3).unwrap()[0];
        assert_eq!(triangle.vertex_refs, [0xE000, 0xC001, 0xE002]);
        assert_eq!(triangle.vertex_indices(), [0, 1, 2]);
        assert_eq!(triangle.ignore_flags().bits(), 0b111);
        assert!(!triangle.enable_conveyor());
    }

    #[test]
    fn test_vertex_index_one_past_end() {
        let data = [record(0, [0, 1, 2], [0; 3], 0), record(0, [0, 3, 1], [0; 3], 0)].concat();
        assert_eq!(
            decode_polygons(&data, SegmentedAddress::default(), 2, 3),
            Err(DecodeError::VertexIndexOutOfRange {
                triangle: 1,
                index: 3,
                vertex_count: 3,
            })
        );
    }

    #[test]
    fn test_decode_polygons_truncated() {
        let data = record(0, [0, 1, 2], [0; 3], 0);
        assert!(matches!(
            decode_polygons(&data[..15], SegmentedAddress::default(), 1, 3),
            Err(DecodeError::TruncatedBuffer { .. })
        ));
    }
}
