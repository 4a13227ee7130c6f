//! Human-readable and JSON output for a decode.

use std::io::{self, Write};

use serde::Serialize;
use z64col_decode::{
    CollisionHeader, Decoded, DecodedScene, IgnoreFlags, Material, MaterialHandle,
    PolytypeBitfield,
};

/// Serialized form of a decode, for `--json`.
#[derive(Serialize)]
struct JsonReport<'a> {
    header_offset: usize,
    header: &'a CollisionHeader,
    scene: &'a DecodedScene,
    warnings: Vec<String>,
}

/// Render `decoded` as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json(decoded: &Decoded) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        header_offset: decoded.header_offset,
        header: &decoded.header,
        scene: &decoded.scene,
        warnings: decoded.warnings.iter().map(ToString::to_string).collect(),
    })
}

/// Write a text summary of `decoded` to `out`.
///
/// With `reduced`, material properties at their zero default are omitted,
/// except the camera, echo, and lighting values, which are always listed,
/// and the conveyor fields, which are listed whenever the conveyor is enabled.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_summary(out: &mut impl Write, decoded: &Decoded, reduced: bool) -> io::Result<()> {
    let header = &decoded.header;
    let scene = &decoded.scene;

    writeln!(out, "Mesh collision header at 0x{:X}", decoded.header_offset)?;
    writeln!(out, "  bounds: {} .. {}", header.min, header.max)?;
    writeln!(
        out,
        "  vertices: {} at {}",
        header.vertex_count, header.vertex_array
    )?;
    writeln!(
        out,
        "  polygons: {} at {}",
        header.polygon_count, header.polygon_array
    )?;
    writeln!(out, "  polytypes: {}", header.polytype_table)?;
    writeln!(out, "  camera data: {}", header.camera_data)?;
    writeln!(
        out,
        "  waterboxes: {} at {}",
        header.waterbox_count, header.waterbox_array
    )?;

    let added = scene.vertices.len() - scene.source_vertex_count;
    writeln!(
        out,
        "Mesh: {} vertices ({} added), {} triangles, bounding radius {:.1}",
        scene.vertices.len(),
        added,
        scene.triangles.len(),
        scene.bounding_radius()
    )?;

    writeln!(out, "Materials: {}", scene.materials.len())?;
    for (index, material) in scene.materials.iter().enumerate() {
        let handle = MaterialHandle(u32::try_from(index).unwrap_or(u32::MAX));
        let count = scene.triangles_using(handle).count();
        writeln!(out, "  [{index}] {} ({count} triangles)", material.name())?;
        write_properties(out, material, reduced)?;
    }

    let review: Vec<usize> = scene.triangles_needing_review().map(|(i, _)| i).collect();
    if !review.is_empty() {
        writeln!(out, "Triangles needing review: {review:?}")?;
    }

    if !decoded.warnings.is_empty() {
        writeln!(out, "Warnings: {}", decoded.warnings.len())?;
        for warning in &decoded.warnings {
            writeln!(out, "  {warning}")?;
        }
    }

    Ok(())
}

/// Whether a polytype field is listed in the reduced view.
fn shown_when_reduced(name: &str, value: u32, enable_conveyor: bool) -> bool {
    match name {
        "camera_index" | "echo" | "lighting" => true,
        "conveyor_direction" | "conveyor_speed" => value != 0 || enable_conveyor,
        _ => value != 0,
    }
}

fn write_properties(out: &mut impl Write, material: &Material, reduced: bool) -> io::Result<()> {
    let flags = material.ignore_flags();
    for (name, get) in IgnoreFlags::FIELDS {
        let value = get(&flags);
        if !reduced || value != 0 {
            writeln!(out, "      {name}: {value}")?;
        }
    }
    if !reduced || material.enable_conveyor() {
        writeln!(
            out,
            "      enable_conveyor: {}",
            u8::from(material.enable_conveyor())
        )?;
    }

    let polytype = &material.polytype;
    for (name, get) in PolytypeBitfield::FIELDS {
        let value = get(polytype);
        if reduced && !shown_when_reduced(name, value, material.enable_conveyor()) {
            continue;
        }
        let label = match *name {
            "floor_type" => polytype.floor_name(),
            "wall_type" => polytype.wall_name(),
            "special_type" => polytype.special_name(),
            "conveyor_speed" => polytype.conveyor_speed_name(),
            "slope_type" => polytype.slope_name(),
            "sound_type" => polytype.sound_name(),
            _ => None,
        };
        match label {
            Some(label) => writeln!(out, "      {name}: {value} ({label})")?,
            None => writeln!(out, "      {name}: {value}")?,
        }
    }
    Ok(())
}
