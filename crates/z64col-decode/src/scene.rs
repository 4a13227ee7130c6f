//! Scene header command scanning.
//!
//! Scene files start with a list of 8-byte commands:
//!
//! - Byte 0: command id
//! - Bytes 1-3: padding
//! - Bytes 4-7: payload (big-endian `u32`)
//!
//! Command 0x03 carries the segmented address of the mesh collision header,
//! and command 0x14 ends the list.

use crate::error::{DecodeError, DecodeResult, Warning};
use crate::reader::be_u32;
use crate::segment::SegmentedAddress;

/// Size of one scene command record.
pub const COMMAND_SIZE: usize = 8;

/// Command id carrying the collision header address.
pub const CMD_COLLISION_HEADER: u8 = 0x03;

/// Command id ending the command list.
pub const CMD_END: u8 = 0x14;

/// Outcome of scanning a scene command list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCommandScan {
    /// Address of the collision header, from the last 0x03 command.
    pub header: SegmentedAddress,
    /// Number of command records read, including the terminator.
    pub commands_read: usize,
    /// One entry per 0x03 command that was overridden by a later one.
    pub warnings: Vec<Warning>,
}

/// Walk the scene command list from the start of `data` to find the
/// collision header address.
///
/// When several 0x03 commands appear, the last one wins and each discarded
/// address is reported as a [`Warning::DuplicateHeaderCommand`].
///
/// # Errors
///
/// Returns [`DecodeError::MissingHeaderCommand`] if the buffer ends before a
/// 0x14 command, or if the list ends without any 0x03 command.
pub fn scan_header_command(data: &[u8]) -> DecodeResult<HeaderCommandScan> {
    let mut header: Option<SegmentedAddress> = None;
    let mut warnings = Vec::new();

    for (index, command) in data.chunks_exact(COMMAND_SIZE).enumerate() {
        match command[0] {
            CMD_COLLISION_HEADER => {
                let address = SegmentedAddress::resolve(be_u32(command, 4));
                if let Some(previous) = header.replace(address) {
                    warnings.push(Warning::DuplicateHeaderCommand {
                        discarded: previous.raw(),
                        command_index: index,
                    });
                }
                tracing::debug!("found 0x03 command: mesh header at {address}");
            }
            CMD_END => {
                let commands_read = index + 1;
                return match header {
                    Some(header) => Ok(HeaderCommandScan {
                        header,
                        commands_read,
                        warnings,
                    }),
                    None => Err(DecodeError::MissingHeaderCommand {
                        found_header: false,
                        commands_read,
                    }),
                };
            }
            _ => {}
        }
    }

    Err(DecodeError::MissingHeaderCommand {
        found_header: header.is_some(),
        commands_read: data.len() / COMMAND_SIZE,
    })
}
