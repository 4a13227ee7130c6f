//! Vertex array decoding.

use glam::{Affine3A, I16Vec3, Vec3};

use crate::error::DecodeResult;
use crate::reader::{array, be_i16};
use crate::segment::SegmentedAddress;

/// Size of one vertex record.
pub const VERTEX_SIZE: usize = 6;

/// Decode `count` vertices starting at `addr`.
///
/// Each record is 3 × i16 (big-endian). Coordinates are converted to floats
/// and passed through `transform`. The output index is the vertex index
/// triangles refer to.
///
/// # Errors
///
/// Returns [`crate::DecodeError::TruncatedBuffer`] if the array does not fit.
pub fn decode_vertices(
    data: &[u8],
    addr: SegmentedAddress,
    count: u16,
    transform: &Affine3A,
) -> DecodeResult<Vec<Vec3>> {
    let records = array(
        data,
        addr.file_offset(),
        usize::from(count),
        VERTEX_SIZE,
        "vertex array",
    )?;

    Ok(records
        .chunks_exact(VERTEX_SIZE)
        .map(|r| {
            let raw = I16Vec3::new(be_i16(r, 0), be_i16(r, 2), be_i16(r, 4));
            transform.transform_point3(raw.as_vec3())
        })
        .collect())
}
