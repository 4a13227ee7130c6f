//! Decode collision meshes from Zelda64 scene and object files.
//!
//! This crate provides pure synchronous decoding of the mesh collision
//! format: the header, vertex and polygon arrays, and the polytype table of
//! per-surface behavior flags. The output is a triangle mesh whose triangles
//! reference deduplicated materials.
//!
//! # Design principles
//!
//! - **Synchronous**: No async, no threading primitives
//! - **Read-only**: Decodes in-memory buffers, never re-encodes
//! - **Best-effort**: Inconsistent segments and degenerate faces become
//!   [`Warning`]s; only truncated or out-of-range data is fatal
//!
//! # Key functions
//!
//! - [`decode_collision`]: Run a complete decode
//! - [`scan_header_command`]: Find the collision header in a scene file
//! - [`CollisionHeader::load`]: Read the 44-byte collision header
//! - [`decode_vertices`], [`decode_polygons`]: Decode the mesh arrays
//! - [`PolytypeBitfield::decode`]: Split a polytype into its fields
//!
//! # Example
//!
//! ```ignore
//! use z64col_decode::{DecodeOptions, decode_collision};
//!
//! let data = std::fs::read("spot04_scene.zscene")?;
//! let decoded = decode_collision(&data, &DecodeOptions::scene())?;
//! for warning in &decoded.warnings {
//!     eprintln!("{warning}");
//! }
//! ```

mod decoder;
mod error;
mod reader;

pub mod header;
pub mod materials;
pub mod mesh;
pub mod polygons;
pub mod polytype;
pub mod scene;
pub mod segment;
pub mod vertices;

pub use decoder::{
    CollisionDecoder, DecodeOptions, Decoded, DecodedScene, FileKind, HeaderLocation, Triangle,
    decode_collision,
};
pub use error::{DecodeError, DecodeResult, Warning};
pub use header::CollisionHeader;
pub use materials::{IgnoreFlags, Material, MaterialHandle, MaterialKey, MaterialTable};
pub use mesh::FacePolicy;
pub use polygons::{RawTriangle, decode_polygons};
pub use polytype::{PolytypeBitfield, read_polytype};
pub use scene::{HeaderCommandScan, scan_header_command};
pub use segment::SegmentedAddress;
pub use vertices::decode_vertices;
