//! Command-line parameter parsing.
//!
//! Parameters mirror the inputs the decoder takes from its caller: the file,
//! where its collision header lives, which segment its addresses should use,
//! and how vertex coordinates are transformed.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use z64col_decode::{DecodeOptions, FacePolicy, FileKind, HeaderLocation};

use crate::axis::{Axis, import_transform};
use crate::error::{Error, Result};

/// File type selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FileType {
    /// Infer from the `.zscene` / `.zobj` extension.
    #[default]
    Auto,
    /// Scene file; the scene header is read unless a header offset is given.
    #[value(alias = "zscene")]
    Scene,
    /// Object file.
    #[value(alias = "zobj")]
    Object,
}

/// Face policy selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FacePolicyArg {
    #[default]
    Manifold,
    Permissive,
}

impl From<FacePolicyArg> for FacePolicy {
    fn from(arg: FacePolicyArg) -> Self {
        match arg {
            FacePolicyArg::Manifold => FacePolicy::Manifold,
            FacePolicyArg::Permissive => FacePolicy::Permissive,
        }
    }
}

/// Parse a hexadecimal file offset, with or without a `0x` prefix.
fn parse_hex_offset(s: &str) -> std::result::Result<usize, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    usize::from_str_radix(digits, 16).map_err(|e| format!("invalid hex offset '{s}': {e}"))
}

#[derive(Parser, Debug)]
#[command(about = "Decode collision meshes from Zelda64 scene and object files")]
pub struct ImportParams {
    /// Scene (.zscene) or object (.zobj) file to read.
    pub path: PathBuf,

    /// Type of the file, for locating the collision header and for sanity checks.
    #[arg(long, value_enum, default_value_t = FileType::default())]
    pub file_type: FileType,

    /// Offset of the mesh collision header in the file (hex).
    #[arg(long, value_parser = parse_hex_offset)]
    pub header_offset: Option<usize>,

    /// Segment the file's addresses should use (default: 2 for scenes, 6 for objects).
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=7))]
    pub segment: Option<u8>,

    /// How much to scale vertex coordinates by.
    #[arg(long, default_value_t = 1.0)]
    pub scale: f32,

    /// Source axis that becomes +Y.
    #[arg(long, value_enum, allow_hyphen_values = true, default_value_t = Axis::NegZ)]
    pub axis_forward: Axis,

    /// Source axis that becomes +Z.
    #[arg(long, value_enum, allow_hyphen_values = true, default_value_t = Axis::Y)]
    pub axis_up: Axis,

    /// Which faces get rebuilt from duplicated vertices.
    #[arg(long, value_enum, default_value_t = FacePolicyArg::default())]
    pub face_policy: FacePolicyArg,

    /// Only list material properties that differ from their defaults.
    #[arg(long)]
    pub reduced: bool,

    /// Print the decoded scene as JSON.
    #[arg(long)]
    pub json: bool,
}

impl ImportParams {
    /// Resolve the file type, inferring it from the extension if needed.
    pub fn file_kind(&self) -> Result<FileKind> {
        match self.file_type {
            FileType::Scene => Ok(FileKind::Scene),
            FileType::Object => Ok(FileKind::Object),
            FileType::Auto => kind_from_path(&self.path).ok_or_else(|| Error::UnknownFileKind {
                path: self.path.clone(),
            }),
        }
    }

    /// Build decoder options.
    ///
    /// The file type is only required when it decides something: how to find
    /// the header without `--header-offset`, or the segment without `--segment`.
    pub fn decode_options(&self) -> Result<DecodeOptions> {
        let kind = self.file_kind();

        let header = match self.header_offset {
            Some(offset) => HeaderLocation::Offset(offset),
            None => match kind {
                Ok(FileKind::Scene) => HeaderLocation::SceneCommands,
                Ok(FileKind::Object) => {
                    return Err(Error::InvalidArgument {
                        context: "header offset",
                        detail: "cannot determine header offset automatically for object files"
                            .to_string(),
                    });
                }
                Err(e) => return Err(e),
            },
        };

        let file_kind = match (kind, self.segment) {
            (Ok(kind), _) => kind,
            (Err(_), Some(_)) => FileKind::default(),
            (Err(e), None) => return Err(e),
        };

        let mut options = DecodeOptions {
            header,
            file_kind,
            ..DecodeOptions::default()
        }
        .with_transform(import_transform(self.axis_forward, self.axis_up, self.scale)?)
        .with_face_policy(self.face_policy.into());

        match self.segment {
            Some(segment) => options = options.with_expected_segment(segment),
            None => tracing::info!(
                "expected segment defaulted to 0x{:X}",
                file_kind.default_segment()
            ),
        }

        Ok(options)
    }
}

fn kind_from_path(path: &Path) -> Option<FileKind> {
    match path.extension()?.to_str()? {
        "zscene" => Some(FileKind::Scene),
        "zobj" => Some(FileKind::Object),
        _ => None,
    }
}

/// Parse parameters from the process arguments.
pub fn parse() -> ImportParams {
    ImportParams::parse()
}
