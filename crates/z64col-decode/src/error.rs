//! Error and warning types for collision decoding.

use std::fmt;

/// Fatal errors that abort a decode.
///
/// A decode that returns one of these produces no scene at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A fixed-size record does not fit in the buffer.
    TruncatedBuffer {
        context: &'static str,
        offset: usize,
        needed: usize,
        len: usize,
    },
    /// The scene command list has no usable collision header command.
    MissingHeaderCommand {
        /// Whether a 0x03 command was seen before the buffer ran out.
        found_header: bool,
        /// Number of command records read, including the terminator if any.
        commands_read: usize,
    },
    /// A triangle references a vertex past the end of the vertex array.
    VertexIndexOutOfRange {
        triangle: usize,
        index: u16,
        vertex_count: usize,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TruncatedBuffer {
                context,
                offset,
                needed,
                len,
            } => {
                write!(
                    f,
                    "truncated buffer reading {context}: need {needed} bytes at 0x{offset:X}, buffer is {len} bytes"
                )
            }
            Self::MissingHeaderCommand {
                found_header: true,
                commands_read,
            } => {
                write!(
                    f,
                    "scene header has no 0x14 end command ({commands_read} commands read)"
                )
            }
            Self::MissingHeaderCommand {
                found_header: false,
                commands_read,
            } => {
                write!(
                    f,
                    "no 0x03 command was found in the scene header ({commands_read} commands read)"
                )
            }
            Self::VertexIndexOutOfRange {
                triangle,
                index,
                vertex_count,
            } => {
                write!(
                    f,
                    "triangle {triangle} references vertex {index} but only {vertex_count} vertices exist"
                )
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Result type for decoding operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Non-fatal diagnostics collected during a decode.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Warning {
    /// An address does not use the segment expected for this file.
    SegmentMismatch {
        what: &'static str,
        address: u32,
        expected: u8,
    },
    /// An address that will be used is zero.
    UndefinedRequiredOffset { what: &'static str },
    /// A later 0x03 scene command replaced an earlier one.
    DuplicateHeaderCommand {
        discarded: u32,
        command_index: usize,
    },
    /// A triangle was rebuilt from duplicated vertices.
    DegenerateFaceRecovered { triangle: usize },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SegmentMismatch {
                what,
                address,
                expected,
            } => {
                write!(
                    f,
                    "offset of {what} 0x{address:08X} does not use expected segment 0x{expected:02X}"
                )
            }
            Self::UndefinedRequiredOffset { what } => {
                write!(f, "offset of {what} is 0 but it will be used")
            }
            Self::DuplicateHeaderCommand {
                discarded,
                command_index,
            } => {
                write!(
                    f,
                    "found several 0x03 commands (another at index {command_index}), ditching previous mesh collision header offset 0x{discarded:08X}"
                )
            }
            Self::DegenerateFaceRecovered { triangle } => {
                write!(
                    f,
                    "triangle {triangle} could not be built from its vertices, rebuilt from duplicates"
                )
            }
        }
    }
}
