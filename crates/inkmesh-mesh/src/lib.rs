#![warn(missing_docs)]

//! Outline extrusion for the inkmesh engine.
//!
//! Picks the largest closed shape of a drawing, orders its nodes into a
//! ring, ear-clips the ring into caps, extrudes it into a solid with side
//! walls, and writes the result as a single-mesh binary glTF container.
//!
//! ```text
//! strokes -> graph -> outline ring -> caps -> solid -> normals
//!         -> [decimate] -> scale -> .glb bytes
//! ```
//!
//! Nothing is exported when any step fails; the error says whether the
//! drawing was unusable ([`MeshError::is_validation`]) or the geometry broke
//! down ([`MeshError::is_geometry`]).

mod decimate;
mod extrude;
mod glb;
mod normals;
mod outline;
mod pipeline;
mod settings;
mod triangulate;

pub use decimate::{Decimator, EdgeCollapseDecimator};
pub use extrude::extrude_ring;
pub use glb::write_glb;
pub use normals::{compute_normals, recenter};
pub use outline::{select_outline, Outline};
pub use pipeline::{build_mesh, export_glb, export_glb_with};
pub use settings::{ExportSettings, Material, Thickness};
pub use triangulate::triangulate_ring;

use thiserror::Error;

/// Output triangle mesh for export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Flat array of vertex positions: `[x0, y0, z0, x1, y1, z1, ...]`.
    pub vertices: Vec<f32>,
    /// Flat array of triangle indices: `[i0, i1, i2, ...]`.
    pub indices: Vec<u32>,
    /// Flat array of vertex normals, same layout as `vertices`. Empty until
    /// [`compute_normals`] runs.
    pub normals: Vec<f32>,
}

impl TriangleMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Position of vertex `i`.
    pub fn vertex(&self, i: usize) -> [f32; 3] {
        [
            self.vertices[i * 3],
            self.vertices[i * 3 + 1],
            self.vertices[i * 3 + 2],
        ]
    }

    /// Per-axis minimum and maximum of the positions, `None` when empty.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let mut chunks = self.vertices.chunks_exact(3);
        let first = chunks.next()?;
        let mut min = [first[0], first[1], first[2]];
        let mut max = min;
        for v in chunks {
            for axis in 0..3 {
                min[axis] = min[axis].min(v[axis]);
                max[axis] = max[axis].max(v[axis]);
            }
        }
        Some((min, max))
    }

    /// Multiply every position by `factor`.
    pub fn scale(&mut self, factor: f32) {
        for v in &mut self.vertices {
            *v *= factor;
        }
    }
}

/// Errors from outline extrusion and export.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    /// The drawing has no strokes.
    #[error("drawing is empty")]
    EmptyDrawing,

    /// After merging, the graph has too few nodes to hold an outline.
    #[error("graph has {0} node(s), at least 2 are required")]
    TooFewNodes(usize),

    /// No shape has every node on at least two edges.
    #[error("no valid closed shape found")]
    NoClosedShape,

    /// The outline ring is shorter than a triangle.
    #[error("outline has {0} point(s), at least 3 are required")]
    TooFewRingPoints(usize),

    /// The outline is not a simple cycle.
    #[error("outline node {node} has {degree} neighbors, expected 2")]
    BranchingOutline {
        /// Offending graph node.
        node: usize,
        /// Its degree.
        degree: usize,
    },

    /// Export settings out of range.
    #[error("invalid export settings: {0}")]
    InvalidSettings(String),

    /// The ring encloses no area.
    #[error("outline ring encloses no area")]
    DegenerateRing,

    /// Ear clipping produced no triangles.
    #[error("triangulation failed")]
    TriangulationFailed,

    /// The binary container could not be written.
    #[error("glb encoding failed: {0}")]
    Encoding(String),
}

impl MeshError {
    /// The drawing or settings cannot produce a solid at all.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            MeshError::EmptyDrawing
                | MeshError::TooFewNodes(_)
                | MeshError::NoClosedShape
                | MeshError::TooFewRingPoints(_)
                | MeshError::BranchingOutline { .. }
                | MeshError::InvalidSettings(_)
        )
    }

    /// An outline was found but its geometry could not be meshed.
    pub fn is_geometry(&self) -> bool {
        matches!(self, MeshError::DegenerateRing | MeshError::TriangulationFailed)
    }
}

/// Result type for outline extrusion.
pub type Result<T> = std::result::Result<T, MeshError>;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_bounds_and_scale() {
        let mut mesh = TriangleMesh {
            vertices: vec![0.0, -1.0, 2.0, 3.0, 4.0, -5.0],
            indices: vec![],
            normals: vec![],
        };
        assert_eq!(mesh.bounds(), Some(([0.0, -1.0, -5.0], [3.0, 4.0, 2.0])));
        mesh.scale(2.0);
        assert_eq!(mesh.vertex(1), [6.0, 8.0, -10.0]);
        assert!(TriangleMesh::new().bounds().is_none());
    }

    #[test]
    fn test_error_kinds() {
        assert!(MeshError::EmptyDrawing.is_validation());
        assert!(MeshError::BranchingOutline { node: 3, degree: 3 }.is_validation());
        assert!(MeshError::TriangulationFailed.is_geometry());
        assert!(!MeshError::TriangulationFailed.is_validation());
        let enc = MeshError::Encoding("io".into());
        assert!(!enc.is_validation() && !enc.is_geometry());
    }
}
