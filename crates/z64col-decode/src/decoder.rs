//! One complete decode pass over a scene or object file.

use glam::{Affine3A, I16Vec3, Vec3};

use crate::error::{DecodeError, DecodeResult, Warning};
use crate::header::CollisionHeader;
use crate::materials::{IgnoreFlags, Material, MaterialHandle, MaterialKey, MaterialTable};
use crate::mesh::{FacePolicy, MeshBuilder};
use crate::polygons::{RawTriangle, VERTEX_INDEX_MASK, decode_polygons};
use crate::polytype::read_polytype;
use crate::scene::scan_header_command;
use crate::segment::SegmentedAddress;
use crate::vertices::decode_vertices;

/// Kind of file being decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FileKind {
    /// A scene file (`.zscene`), loaded into segment 2.
    Scene,
    /// An object file (`.zobj`), loaded into segment 6.
    #[default]
    Object,
}

impl FileKind {
    /// Segment the file's addresses are expected to use.
    #[must_use]
    pub const fn default_segment(self) -> u8 {
        match self {
            Self::Scene => 0x02,
            Self::Object => 0x06,
        }
    }
}

/// Where to find the mesh collision header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderLocation {
    /// At a known file offset.
    Offset(usize),
    /// At the address given by the scene command list at the start of the file.
    SceneCommands,
}

impl Default for HeaderLocation {
    fn default() -> Self {
        Self::Offset(0)
    }
}

/// Inputs for one decode.
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    pub header: HeaderLocation,
    pub file_kind: FileKind,
    /// Segment for sanity checks; defaults to the file kind's segment.
    pub expected_segment: Option<u8>,
    /// Applied to every vertex position.
    pub transform: Affine3A,
    pub face_policy: FacePolicy,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            header: HeaderLocation::default(),
            file_kind: FileKind::default(),
            expected_segment: None,
            transform: Affine3A::IDENTITY,
            face_policy: FacePolicy::default(),
        }
    }
}

impl DecodeOptions {
    /// Options for a scene file, locating the header through its commands.
    #[must_use]
    pub fn scene() -> Self {
        Self {
            header: HeaderLocation::SceneCommands,
            file_kind: FileKind::Scene,
            ..Self::default()
        }
    }

    /// Options for an object file with the header at `offset`.
    #[must_use]
    pub fn object(offset: usize) -> Self {
        Self {
            header: HeaderLocation::Offset(offset),
            file_kind: FileKind::Object,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_header(mut self, header: HeaderLocation) -> Self {
        self.header = header;
        self
    }

    #[must_use]
    pub fn with_expected_segment(mut self, segment: u8) -> Self {
        self.expected_segment = Some(segment);
        self
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Affine3A) -> Self {
        self.transform = transform;
        self
    }

    #[must_use]
    pub fn with_face_policy(mut self, policy: FacePolicy) -> Self {
        self.face_policy = policy;
        self
    }

    /// The segment sanity checks compare against.
    #[must_use]
    pub fn segment(&self) -> u8 {
        self.expected_segment
            .unwrap_or_else(|| self.file_kind.default_segment())
    }
}

/// A decoded triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Triangle {
    /// Indices into [`DecodedScene::vertices`].
    pub vertices: [u32; 3],
    pub material: MaterialHandle,
    pub polytype_index: u16,
    /// Vertex reference words as stored, including their flag bits.
    pub vertex_refs: [u16; 3],
    pub normal: I16Vec3,
    /// Carried through without interpretation.
    pub plane_distance: i16,
    /// The face was rebuilt from duplicated vertices.
    pub needs_review: bool,
}

impl Triangle {
    #[must_use]
    pub fn ignore_flags(&self) -> IgnoreFlags {
        IgnoreFlags::from_vertex_ref(self.vertex_refs[0])
    }

    /// Vertex indices as referenced in the file, before any recovery.
    #[must_use]
    pub fn source_vertices(&self) -> [u16; 3] {
        self.vertex_refs.map(|r| r & VERTEX_INDEX_MASK)
    }

    /// The stored normal in the same space as the transformed vertices.
    ///
    /// Returns zero for a zero normal.
    #[must_use]
    pub fn transformed_normal(&self, transform: &Affine3A) -> Vec3 {
        transform
            .transform_vector3(self.normal.as_vec3())
            .normalize_or_zero()
    }
}

/// The collision mesh produced by a decode.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DecodedScene {
    /// Source vertices followed by any duplicates made during recovery.
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<Triangle>,
    pub materials: Vec<Material>,
    /// Number of vertices read from the file.
    pub source_vertex_count: usize,
}

impl DecodedScene {
    #[must_use]
    pub fn material(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get(handle.index())
    }

    /// Largest distance of any vertex from the origin.
    #[must_use]
    pub fn bounding_radius(&self) -> f32 {
        self.vertices
            .iter()
            .map(|v| v.length_squared())
            .fold(0.0, f32::max)
            .sqrt()
    }

    pub fn triangles_using(&self, handle: MaterialHandle) -> impl Iterator<Item = &Triangle> {
        self.triangles.iter().filter(move |t| t.material == handle)
    }

    pub fn triangles_needing_review(&self) -> impl Iterator<Item = (usize, &Triangle)> {
        self.triangles
            .iter()
            .enumerate()
            .filter(|(_, t)| t.needs_review)
    }
}

/// A successful decode: the scene, the header it came from, and diagnostics.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub scene: DecodedScene,
    pub header: CollisionHeader,
    pub header_offset: usize,
    pub warnings: Vec<Warning>,
}

/// Sequences the individual decoders into a single pass.
///
/// Owns every piece of mutable state for the pass, so separate decoders can
/// run on separate buffers in parallel.
pub struct CollisionDecoder<'a> {
    data: &'a [u8],
    options: DecodeOptions,
    warnings: Vec<Warning>,
}

impl<'a> CollisionDecoder<'a> {
    #[must_use]
    pub fn new(data: &'a [u8], options: DecodeOptions) -> Self {
        Self {
            data,
            options,
            warnings: Vec::new(),
        }
    }

    /// Run the decode.
    ///
    /// # Errors
    ///
    /// Returns the first fatal [`crate::DecodeError`]. No partial scene is
    /// produced in that case.
    pub fn decode(mut self) -> DecodeResult<Decoded> {
        let header_offset = self.locate_header()?;
        tracing::debug!("reading mesh collision header at 0x{header_offset:X}");
        let header = CollisionHeader::load(self.data, header_offset)?;
        tracing::debug!(?header, "loaded mesh collision header");

        let segment = self.options.segment();
        for warning in header.sanity_check_segments(segment) {
            self.warn(warning);
        }

        let vertices = decode_vertices(
            self.data,
            header.vertex_array,
            header.vertex_count,
            &self.options.transform,
        )?;
        let source_vertex_count = vertices.len();

        let raw_triangles = decode_polygons(
            self.data,
            header.polygon_array,
            header.polygon_count,
            source_vertex_count,
        )?;
        tracing::debug!(
            "decoded {} vertices and {} triangles",
            source_vertex_count,
            raw_triangles.len()
        );

        let mut mesh = MeshBuilder::new(vertices, self.options.face_policy);
        let mut materials = MaterialTable::new();
        let mut triangles = Vec::with_capacity(raw_triangles.len());

        for (index, raw) in raw_triangles.iter().enumerate() {
            let material = self.material_for(&mut materials, header.polytype_table, raw)?;
            let indices = raw.vertex_indices();
            let face = mesh.add_face(indices.map(u32::from)).ok_or_else(|| {
                DecodeError::VertexIndexOutOfRange {
                    triangle: index,
                    index: indices.into_iter().max().unwrap_or_default(),
                    vertex_count: source_vertex_count,
                }
            })?;
            if face.recovered {
                self.warn(Warning::DegenerateFaceRecovered { triangle: index });
            }

            triangles.push(Triangle {
                vertices: face.vertices,
                material,
                polytype_index: raw.polytype_index,
                vertex_refs: raw.vertex_refs,
                normal: raw.normal,
                plane_distance: raw.plane_distance,
                needs_review: face.recovered,
            });
        }

        tracing::debug!("created {} materials", materials.len());

        Ok(Decoded {
            scene: DecodedScene {
                vertices: mesh.into_positions(),
                triangles,
                materials: materials.into_materials(),
                source_vertex_count,
            },
            header,
            header_offset,
            warnings: self.warnings,
        })
    }

    fn locate_header(&mut self) -> DecodeResult<usize> {
        match self.options.header {
            HeaderLocation::Offset(offset) => Ok(offset),
            HeaderLocation::SceneCommands => {
                let scan = scan_header_command(self.data)?;
                for warning in scan.warnings {
                    self.warn(warning);
                }
                // Scene headers always point into the scene segment.
                let scene_segment = FileKind::Scene.default_segment();
                if let Some(warning) = scan.header.validate("mesh header", scene_segment, true) {
                    self.warn(warning);
                }
                tracing::debug!(
                    "found mesh header address {} after {} commands",
                    scan.header,
                    scan.commands_read
                );
                Ok(scan.header.file_offset())
            }
        }
    }

    /// The polytype table has no stored length, so entries are read on demand.
    fn material_for(
        &self,
        materials: &mut MaterialTable,
        table: SegmentedAddress,
        raw: &RawTriangle,
    ) -> DecodeResult<MaterialHandle> {
        let polytype = read_polytype(self.data, table, raw.polytype_index)?;
        let key = MaterialKey {
            ignore_flags: raw.ignore_flags(),
            enable_conveyor: raw.enable_conveyor(),
            polytype_hi: polytype.hi,
            polytype_lo: polytype.lo,
        };
        Ok(materials.intern(key, raw.polytype_index))
    }

    fn warn(&mut self, warning: Warning) {
        tracing::warn!("{warning}");
        self.warnings.push(warning);
    }
}

/// Decode `data` with `options`.
///
/// # Errors
///
/// See [`CollisionDecoder::decode`].
pub fn decode_collision(data: &[u8], options: &DecodeOptions) -> DecodeResult<Decoded> {
    CollisionDecoder::new(data, *options).decode()
}
