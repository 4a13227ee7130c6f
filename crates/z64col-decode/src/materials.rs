//! Collision materials and their deduplication.
//!
//! A material is one distinct combination of triangle flags and polytype.
//! Triangles sharing that combination share the material.

use std::collections::HashMap;
use std::fmt;

use crate::polytype::{FieldAccessor, PolytypeBitfield};

/// The 3 ignore bits stored at the top of a triangle's first vertex reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IgnoreFlags(u8);

impl IgnoreFlags {
    pub const PROJECTILES: u8 = 0b100;
    pub const ENTITIES: u8 = 0b010;
    pub const CAMERA: u8 = 0b001;

    pub const FIELDS: &'static [FieldAccessor<Self>] = &[
        ("ignore_projectiles", |f| u32::from(f.projectiles())),
        ("ignore_entities", |f| u32::from(f.entities())),
        ("ignore_camera", |f| u32::from(f.camera())),
    ];

    /// Build from the low 3 bits of `bits`.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0b111)
    }

    #[must_use]
    pub const fn from_vertex_ref(vertex_ref: u16) -> Self {
        Self((vertex_ref >> 13) as u8)
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn projectiles(self) -> bool {
        self.0 & Self::PROJECTILES != 0
    }

    #[must_use]
    pub const fn entities(self) -> bool {
        self.0 & Self::ENTITIES != 0
    }

    #[must_use]
    pub const fn camera(self) -> bool {
        self.0 & Self::CAMERA != 0
    }
}

impl fmt::Display for IgnoreFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03b}", self.0)
    }
}

/// Structural identity of a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MaterialKey {
    pub ignore_flags: IgnoreFlags,
    pub enable_conveyor: bool,
    pub polytype_hi: u32,
    pub polytype_lo: u32,
}

/// Index of a material in [`MaterialTable`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MaterialHandle(pub u32);

impl MaterialHandle {
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Material {
    pub key: MaterialKey,
    pub polytype: PolytypeBitfield,
    /// Polytype table index of the first triangle that used this material.
    pub polytype_index: u16,
}

impl Material {
    #[must_use]
    pub fn ignore_flags(&self) -> IgnoreFlags {
        self.key.ignore_flags
    }

    #[must_use]
    pub fn enable_conveyor(&self) -> bool {
        self.key.enable_conveyor
    }

    /// Human-readable name: ignore bits, conveyor flag, polytype index and
    /// raw polytype, e.g. `001 1 4 00000000_000C0002`.
    #[must_use]
    pub fn name(&self) -> String {
        format!(
            "{} {} {} {}",
            self.key.ignore_flags,
            u8::from(self.key.enable_conveyor),
            self.polytype_index,
            self.polytype
        )
    }
}

/// Append-only intern table mapping material keys to handles.
///
/// Scoped to a single decode; handles are assigned in first-seen order.
#[derive(Debug, Default)]
pub struct MaterialTable {
    materials: Vec<Material>,
    handles: HashMap<MaterialKey, MaterialHandle>,
}

impl MaterialTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the handle for `key`, creating the material on first sight.
    ///
    /// `polytype_index` is only recorded when the material is created.
    pub fn intern(&mut self, key: MaterialKey, polytype_index: u16) -> MaterialHandle {
        if let Some(&handle) = self.handles.get(&key) {
            return handle;
        }

        // Material count is bounded by the u16 triangle count.
        #[allow(clippy::cast_possible_truncation)]
        let handle = MaterialHandle(self.materials.len() as u32);
        self.materials.push(Material {
            key,
            polytype: PolytypeBitfield::decode(key.polytype_hi, key.polytype_lo),
            polytype_index,
        });
        self.handles.insert(key, handle);
        tracing::trace!("new material {handle:?}: {}", self.materials[handle.index()].name());
        handle
    }

    #[must_use]
    pub fn get(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get(handle.index())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    #[must_use]
    pub fn into_materials(self) -> Vec<Material> {
        self.materials
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(ignore: u8, conveyor: bool, hi: u32, lo: u32) -> MaterialKey {
        MaterialKey {
            ignore_flags: IgnoreFlags::from_bits(ignore),
            enable_conveyor: conveyor,
            polytype_hi: hi,
            polytype_lo: lo,
        }
    }

    #[test]
    fn test_ignore_flags_breakdown() {
        let flags = IgnoreFlags::from_vertex_ref(0xA123);
        assert_eq!(flags.bits(), 0b101);
        assert!(flags.projectiles());
        assert!(!flags.entities());
        assert!(flags.camera());
        assert_eq!(flags.to_string(), "101");

        let values: Vec<u32> = IgnoreFlags::FIELDS.iter().map(|(_, get)| get(&flags)).collect();
        assert_eq!(values, vec![1, 0, 1]);
    }

    #[test]
    fn test_intern_same_key() {
        let mut table = MaterialTable::new();
        let a = table.intern(key(0, false, 1, 2), 0);
        let b = table.intern(key(0, false, 1, 2), 7);
        assert_eq!(a, b);
        assert_eq!(table.len(), 1);
        // The first occurrence's polytype index is kept.
        assert_eq!(table.get(a).unwrap().polytype_index, 0);
    }

    #[test]
    fn test_intern_each_component_distinguishes() {
        let mut table = MaterialTable::new();
        let base = table.intern(key(0, false, 1, 2), 0);
        let variants = [
            key(1, false, 1, 2),
            key(0, true, 1, 2),
            key(0, false, 3, 2),
            key(0, false, 1, 3),
        ];
        for variant in variants {
            assert_ne!(table.intern(variant, 0), base);
        }
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_handles_in_first_seen_order() {
        let mut table = MaterialTable::new();
        let keys = [key(0, false, 5, 0), key(0, false, 1, 0), key(0, false, 3, 0)];
        for k in keys {
            table.intern(k, 0);
        }
        table.intern(keys[1], 0);

        let materials = table.into_materials();
        let order: Vec<MaterialKey> = materials.iter().map(|m| m.key).collect();
        assert_eq!(order, keys);
    }

    #[test]
    fn test_material_decodes_polytype() {
        let mut table = MaterialTable::new();
        let handle = table.intern(key(0b010, true, 0x8000_0000, 0x000C_0002), 4);
        let material = table.get(handle).unwrap();
        assert!(material.polytype.no_horse);
        assert_eq!(material.polytype.conveyor_speed, 3);
        assert_eq!(material.polytype.sound_type, 2);
        assert!(material.ignore_flags().entities());
        assert!(material.enable_conveyor());
        assert_eq!(material.name(), "010 1 4 80000000_000C0002");
    }
}
