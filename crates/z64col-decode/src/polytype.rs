//! Surface type ("polytype") bitfields.
//!
//! A polytype is a 64-bit record split into two big-endian words.
//!
//! High word:
//!
//! | bits  | field            |
//! |-------|------------------|
//! | 31    | `no_horse`       |
//! | 30    | `minus_one_unit` |
//! | 26-29 | `floor_type`     |
//! | 21-25 | `wall_type`      |
//! | 18-20 | unused           |
//! | 13-17 | `special_type`   |
//! | 8-12  | `exit_index`     |
//! | 0-7   | `camera_index`   |
//!
//! Low word:
//!
//! | bits  | field                |
//! |-------|----------------------|
//! | 28-31 | padding              |
//! | 27    | `wall_damage`        |
//! | 21-26 | `conveyor_direction` |
//! | 18-20 | `conveyor_speed`     |
//! | 17    | `hookshot`           |
//! | 11-16 | `echo`               |
//! | 6-10  | `lighting`           |
//! | 4-5   | `slope_type`         |
//! | 0-3   | `sound_type`         |

use std::fmt;

use crate::error::DecodeResult;
use crate::reader::{be_u32, span};
use crate::segment::SegmentedAddress;

/// Size of one polytype table entry.
pub const POLYTYPE_SIZE: usize = 8;

/// Extract `width` bits of `word` starting at bit `shift`.
const fn bits(word: u32, shift: u32, width: u32) -> u8 {
    ((word >> shift) & ((1 << width) - 1)) as u8
}

const fn bit(word: u32, shift: u32) -> bool {
    (word >> shift) & 1 != 0
}

/// A decoded polytype.
///
/// Every 64-bit value decodes, including values outside the documented
/// ranges. Two polytypes are equal exactly when their raw words are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PolytypeBitfield {
    pub hi: u32,
    pub lo: u32,

    pub no_horse: bool,
    pub minus_one_unit: bool,
    pub floor_type: u8,
    pub wall_type: u8,
    pub special_type: u8,
    pub exit_index: u8,
    pub camera_index: u8,

    pub wall_damage: bool,
    pub conveyor_direction: u8,
    pub conveyor_speed: u8,
    pub hookshot: bool,
    pub echo: u8,
    pub lighting: u8,
    pub slope_type: u8,
    pub sound_type: u8,
}

/// Accessor for one named field, as a plain integer.
pub type FieldAccessor<T> = (&'static str, fn(&T) -> u32);

impl PolytypeBitfield {
    /// Every field by name, including the undocumented bit ranges.
    pub const FIELDS: &'static [FieldAccessor<Self>] = &[
        ("no_horse", |p| u32::from(p.no_horse)),
        ("minus_one_unit", |p| u32::from(p.minus_one_unit)),
        ("floor_type", |p| u32::from(p.floor_type)),
        ("wall_type", |p| u32::from(p.wall_type)),
        ("unused", |p| u32::from(p.unused())),
        ("special_type", |p| u32::from(p.special_type)),
        ("exit_index", |p| u32::from(p.exit_index)),
        ("camera_index", |p| u32::from(p.camera_index)),
        ("padding", |p| u32::from(p.padding())),
        ("wall_damage", |p| u32::from(p.wall_damage)),
        ("conveyor_direction", |p| u32::from(p.conveyor_direction)),
        ("conveyor_speed", |p| u32::from(p.conveyor_speed)),
        ("hookshot", |p| u32::from(p.hookshot)),
        ("echo", |p| u32::from(p.echo)),
        ("lighting", |p| u32::from(p.lighting)),
        ("slope_type", |p| u32::from(p.slope_type)),
        ("sound_type", |p| u32::from(p.sound_type)),
    ];

    #[must_use]
    pub const fn decode(hi: u32, lo: u32) -> Self {
        Self {
            hi,
            lo,
            no_horse: bit(hi, 31),
            minus_one_unit: bit(hi, 30),
            floor_type: bits(hi, 26, 4),
            wall_type: bits(hi, 21, 5),
            special_type: bits(hi, 13, 5),
            exit_index: bits(hi, 8, 5),
            camera_index: bits(hi, 0, 8),
            wall_damage: bit(lo, 27),
            conveyor_direction: bits(lo, 21, 6),
            conveyor_speed: bits(lo, 18, 3),
            hookshot: bit(lo, 17),
            echo: bits(lo, 11, 6),
            lighting: bits(lo, 6, 5),
            slope_type: bits(lo, 4, 2),
            sound_type: bits(lo, 0, 4),
        }
    }

    /// High-word bits 18-20, which have no known meaning.
    #[must_use]
    pub const fn unused(&self) -> u8 {
        bits(self.hi, 18, 3)
    }

    /// Low-word bits 28-31, which have no known meaning.
    #[must_use]
    pub const fn padding(&self) -> u8 {
        bits(self.lo, 28, 4)
    }

    /// Look up a field value by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<u32> {
        Self::FIELDS
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, get)| get(self))
    }

    #[must_use]
    pub fn floor_name(&self) -> Option<&'static str> {
        Some(match self.floor_type {
            0x0 => "Default",
            0x5 => "Void to Scene",
            0x6 => "Climb (vines)",
            0x8 => "Grab ledge",
            0x9 => "Step off",
            0xB => "Dive",
            0xC => "Void to Room",
            _ => return None,
        })
    }

    #[must_use]
    pub fn wall_name(&self) -> Option<&'static str> {
        Some(match self.wall_type {
            0 => "None",
            1 => "No Grab",
            2 => "Ladder",
            3 => "Ladder Top",
            4 => "Vines",
            5 => "Crawl",
            6 => "Crawl 1",
            7 => "Pushblock",
            _ => return None,
        })
    }

    #[must_use]
    pub fn special_name(&self) -> Option<&'static str> {
        Some(match self.special_type {
            0x0 => "None",
            0x1 => "Camera related",
            0x2 => "Lava",
            0x3 => "Lava 1",
            0x4 => "Shallow Sand",
            0x5 => "Slippery",
            0x6 => "No Fall Damage",
            0x7 => "Quicksand (no horse)",
            0x8 => "Bleeding Wall",
            0x9 => "Void on Contact",
            0xB => "Look Up",
            0xC => "Quicksand (horse)",
            _ => return None,
        })
    }

    #[must_use]
    pub fn conveyor_speed_name(&self) -> Option<&'static str> {
        Some(match self.conveyor_speed {
            0 => "None",
            1 => "Slow",
            2 => "Mid",
            3 => "Fast",
            _ => return None,
        })
    }

    #[must_use]
    pub fn slope_name(&self) -> Option<&'static str> {
        Some(match self.slope_type {
            0 => "Flat",
            1 => "Sloped",
            2 => "Flat, Keep Temp Flags",
            _ => return None,
        })
    }

    #[must_use]
    pub fn sound_name(&self) -> Option<&'static str> {
        Some(match self.sound_type {
            0x0 | 0x8 | 0xB => "Earth/Dirt",
            0x1 => "Sand",
            0x2 => "Stone",
            0x3 => "Stone (wet)",
            0x4 => "Shallow Water",
            0x5 => "Shallow Water (lower-pitched)",
            0x6 => "Underbrush/Grass",
            0x7 => "Lava/Goo",
            0x9 => "Wooden Plank",
            0xA => "Packed Earth/Wood",
            0xC => "Ceramic",
            0xD => "Loose Earth/Dirt",
            _ => return None,
        })
    }
}

impl fmt::Display for PolytypeBitfield {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}_{:08X}", self.hi, self.lo)
    }
}

/// Read entry `index` of the polytype table at `table`.
///
/// The table has no stored length, so only the entry itself is bounds-checked.
///
/// # Errors
///
/// Returns [`crate::DecodeError::TruncatedBuffer`] if the entry lies past the
/// end of `data`.
pub fn read_polytype(
    data: &[u8],
    table: SegmentedAddress,
    index: u16,
) -> DecodeResult<PolytypeBitfield> {
    let offset = table.file_offset() + usize::from(index) * POLYTYPE_SIZE;
    let r = span(data, offset, POLYTYPE_SIZE, "polytype table")?;
    Ok(PolytypeBitfield::decode(be_u32(r, 0), be_u32(r, 4)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use proptest::prelude::*;

    #[test]
    fn test_decode_zero() {
        let p = PolytypeBitfield::decode(0, 0);
        assert!(PolytypeBitfield::FIELDS.iter().all(|(_, get)| get(&p) == 0));
        assert_eq!(p.to_string(), "00000000_00000000");
    }

    #[test]
    fn test_decode_high_word() {
        // no_horse, floor 0xB, wall 2, unused 0b101, special 7, exit 3, camera 0x42.
        let hi = (1 << 31) | (0xB << 26) | (2 << 21) | (0b101 << 18) | (7 << 13) | (3 << 8) | 0x42;
        let p = PolytypeBitfield::decode(hi, 0);
        assert!(p.no_horse);
        assert!(!p.minus_one_unit);
        assert_eq!(p.floor_type, 0xB);
        assert_eq!(p.floor_name(), Some("Dive"));
        assert_eq!(p.wall_type, 2);
        assert_eq!(p.wall_name(), Some("Ladder"));
        assert_eq!(p.unused(), 0b101);
        assert_eq!(p.special_type, 7);
        assert_eq!(p.exit_index, 3);
        assert_eq!(p.camera_index, 0x42);
    }

    #[test]
    fn test_decode_low_word() {
        let lo = (0xA << 28)
            | (1 << 27)
            | (0x30 << 21)
            | (2 << 18)
            | (1 << 17)
            | (0x3F << 11)
            | (0x15 << 6)
            | (1 << 4)
            | 0x9;
        let p = PolytypeBitfield::decode(0, lo);
        assert_eq!(p.padding(), 0xA);
        assert!(p.wall_damage);
        assert_eq!(p.conveyor_direction, 0x30);
        assert_eq!(p.conveyor_speed, 2);
        assert_eq!(p.conveyor_speed_name(), Some("Mid"));
        assert!(p.hookshot);
        assert_eq!(p.echo, 0x3F);
        assert_eq!(p.lighting, 0x15);
        assert_eq!(p.slope_type, 1);
        assert_eq!(p.slope_name(), Some("Sloped"));
        assert_eq!(p.sound_type, 9);
        assert_eq!(p.sound_name(), Some("Wooden Plank"));
    }

    #[test]
    fn test_undocumented_values_decode() {
        let p = PolytypeBitfield::decode(
            (0x7 << 26) | (0x1F << 21) | (0xA << 13),
            (0x7 << 18) | (3 << 4) | 0xF,
        );
        assert_eq!(p.floor_type, 7);
        assert_eq!(p.floor_name(), None);
        assert_eq!(p.wall_name(), None);
        assert_eq!(p.special_name(), None);
        assert_eq!(p.conveyor_speed, 7);
        assert_eq!(p.conveyor_speed_name(), None);
        assert_eq!(p.slope_name(), None);
        assert_eq!(p.sound_name(), None);
    }

    #[test]
    fn test_field_by_name() {
        let p = PolytypeBitfield::decode(0x0000_0105, 0);
        assert_eq!(p.field("camera_index"), Some(5));
        assert_eq!(p.field("exit_index"), Some(1));
        assert_eq!(p.field("no_such_field"), None);
    }

    #[test]
    fn test_read_polytype_by_index() {
        let mut data = vec![0u8; 4];
        data.extend_from_slice(&[0, 0, 0, 1, 0, 0, 0, 2]);
        data.extend_from_slice(&[0x80, 0, 0, 0, 0, 0, 0, 0x0D]);
        let table = SegmentedAddress::resolve(0x0200_0004);

        let p = read_polytype(&data, table, 1).unwrap();
        assert!(p.no_horse);
        assert_eq!(p.sound_type, 0xD);
        assert_eq!((p.hi, p.lo), (0x8000_0000, 0x0000_000D));

        assert!(matches!(
            read_polytype(&data, table, 2),
            Err(DecodeError::TruncatedBuffer { .. })
        ));
    }

    fn field_values(p: &PolytypeBitfield) -> Vec<u32> {
        PolytypeBitfield::FIELDS.iter().map(|(_, get)| get(p)).collect()
    }

    proptest! {
        #[test]
        fn single_bit_changes_single_field(hi: u32, lo: u32, bit_index in 0u32..64) {
            let base = PolytypeBitfield::decode(hi, lo);
            let toggled = if bit_index < 32 {
                PolytypeBitfield::decode(hi ^ (1 << bit_index), lo)
            } else {
                PolytypeBitfield::decode(hi, lo ^ (1 << (bit_index - 32)))
            };

            let changed = field_values(&base)
                .into_iter()
                .zip(field_values(&toggled))
                .filter(|(a, b)| a != b)
                .count();
            prop_assert_eq!(changed, 1);
            prop_assert_ne!(base, toggled);
        }

        #[test]
        fn decode_never_fails(hi: u32, lo: u32) {
            let p = PolytypeBitfield::decode(hi, lo);
            prop_assert!(p.floor_type < 16);
            prop_assert!(p.wall_type < 32);
            prop_assert!(p.conveyor_direction < 64);
            prop_assert_eq!((p.hi, p.lo), (hi, lo));
        }
    }
}
