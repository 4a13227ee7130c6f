//! Face construction with degenerate-face recovery.
//!
//! Collision data sometimes contains triangles a polygon mesh cannot hold
//! as-is: repeated vertices, the same face twice, or (for manifold targets)
//! an edge walked in the same direction by two faces. Rather than failing,
//! such a face is rebuilt from fresh copies of its three vertices.

use std::collections::HashSet;

use glam::Vec3;

/// Which faces the target mesh representation rejects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FacePolicy {
    /// Reject repeated vertices, duplicate faces, and reused directed edges.
    #[default]
    Manifold,
    /// Reject only repeated vertices and duplicate faces.
    Permissive,
}

/// Result of adding one face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceOutcome {
    /// Vertex indices the face was built from.
    pub vertices: [u32; 3],
    /// The face was rebuilt from duplicated vertices.
    pub recovered: bool,
}

/// Append-only vertex arena plus the set of faces built so far.
///
/// Existing vertices are never moved or modified, so indices handed out for
/// earlier faces stay valid as duplicates are appended.
#[derive(Debug)]
pub struct MeshBuilder {
    positions: Vec<Vec3>,
    policy: FacePolicy,
    faces: HashSet<[u32; 3]>,
    edges: HashSet<(u32, u32)>,
}

impl MeshBuilder {
    #[must_use]
    pub fn new(positions: Vec<Vec3>, policy: FacePolicy) -> Self {
        Self {
            positions,
            policy,
            faces: HashSet::new(),
            edges: HashSet::new(),
        }
    }

    /// Whether a face over `vertices` would be rejected.
    #[must_use]
    pub fn is_degenerate(&self, vertices: [u32; 3]) -> bool {
        let [a, b, c] = vertices;
        if a == b || b == c || a == c {
            return true;
        }
        if self.faces.contains(&sorted(vertices)) {
            return true;
        }
        self.policy == FacePolicy::Manifold
            && directed_edges(vertices)
                .iter()
                .any(|edge| self.edges.contains(edge))
    }

    /// Add a face, duplicating its vertices if it would be rejected.
    ///
    /// Returns `None`, leaving the mesh unchanged, if any index does not
    /// refer to an existing vertex.
    pub fn add_face(&mut self, vertices: [u32; 3]) -> Option<FaceOutcome> {
        let len = self.positions.len();
        if vertices.iter().any(|&v| v as usize >= len) {
            return None;
        }

        let recovered = self.is_degenerate(vertices);
        let vertices = if recovered {
            vertices.map(|v| self.duplicate(v))
        } else {
            vertices
        };

        self.faces.insert(sorted(vertices));
        self.edges.extend(directed_edges(vertices));

        Some(FaceOutcome {
            vertices,
            recovered,
        })
    }

    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    #[must_use]
    pub fn into_positions(self) -> Vec<Vec3> {
        self.positions
    }

    fn duplicate(&mut self, vertex: u32) -> u32 {
        // At most 0xFFFF source vertices plus 3 per triangle, far below u32::MAX.
        #[allow(clippy::cast_possible_truncation)]
        let index = self.positions.len() as u32;
        self.positions.push(self.positions[vertex as usize]);
        index
    }
}

fn sorted(mut vertices: [u32; 3]) -> [u32; 3] {
    vertices.sort_unstable();
    vertices
}

fn directed_edges([a, b, c]: [u32; 3]) -> [(u32, u32); 3] {
    [(a, b), (b, c), (c, a)]
}
