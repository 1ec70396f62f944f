//! Extrude operation: turn a triangulated ring into a closed solid.

use inkmesh_math::{centroid, Point2};

use crate::{Thickness, TriangleMesh};

/// Extrude a counter-clockwise ring symmetrically about z = 0.
///
/// Ring point `i` becomes vertex `i` at `+h/2` (top cap) and vertex
/// `R + i` at `-h/2` (bottom cap), where `h` comes from `thickness`. The
/// top cap uses `cap` as given, the bottom cap reversed so it faces -z, and
/// every ring edge gets two outward-facing side triangles.
///
/// For an R-point ring and R - 2 cap triangles the mesh has 2R vertices and
/// 4R - 4 triangles.
///
/// # Example
///
/// ```
/// use inkmesh_math::Point2;
/// use inkmesh_mesh::{extrude_ring, triangulate_ring, Thickness};
///
/// let ring = vec![
///     Point2::new(0.0, 0.0),
///     Point2::new(10.0, 0.0),
///     Point2::new(10.0, 5.0),
///     Point2::new(0.0, 5.0),
/// ];
/// let cap = triangulate_ring(&ring).unwrap();
/// let mesh = extrude_ring(&ring, &cap, Thickness::Uniform(2.0));
/// assert_eq!(mesh.num_vertices(), 8);
/// assert_eq!(mesh.num_triangles(), 12);
/// ```
pub fn extrude_ring(ring: &[Point2], cap: &[[u32; 3]], thickness: Thickness) -> TriangleMesh {
    let r = ring.len();
    let center = centroid(ring).unwrap_or_else(Point2::origin);
    let distances: Vec<f64> = ring.iter().map(|p| (p - center).norm()).collect();
    let farthest = distances.iter().copied().fold(0.0, f64::max);

    let mut mesh = TriangleMesh::new();
    mesh.vertices.reserve(r * 6);
    mesh.indices.reserve((4 * r).saturating_sub(4) * 3);

    for sign in [1.0, -1.0] {
        for (p, &d) in ring.iter().zip(&distances) {
            let half = thickness.at(d, farthest) / 2.0;
            mesh.vertices.extend([p.x as f32, p.y as f32, (sign * half) as f32]);
        }
    }

    let bottom = r as u32;
    for &[a, b, c] in cap {
        mesh.indices.extend([a, b, c]);
    }
    for &[a, b, c] in cap {
        mesh.indices.extend([bottom + a, bottom + c, bottom + b]);
    }

    for i in 0..r as u32 {
        let j = (i + 1) % r as u32;
        mesh.indices.extend([i, bottom + i, j]);
        mesh.indices.extend([bottom + i, bottom + j, j]);
    }

    mesh
}
