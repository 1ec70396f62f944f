//! Recentering and smooth vertex normals.

use crate::TriangleMesh;

/// Translate the mesh so its bounding-box center sits at the origin.
pub fn recenter(mesh: &mut TriangleMesh) {
    let Some((min, max)) = mesh.bounds() else {
        return;
    };
    let center = [0, 1, 2].map(|axis| (min[axis] + max[axis]) / 2.0);
    for v in mesh.vertices.chunks_exact_mut(3) {
        for axis in 0..3 {
            v[axis] -= center[axis];
        }
    }
}

/// Compute smooth per-vertex normals, replacing any existing ones.
///
/// Phase 1 computes each face's area-weighted normal; phase 2 sums them
/// into the face's vertices and normalizes. A vertex touched by no
/// non-degenerate face gets +z.
pub fn compute_normals(mesh: &mut TriangleMesh) {
    let vertex = |i: u32| {
        let v = mesh.vertex(i as usize);
        [v[0] as f64, v[1] as f64, v[2] as f64]
    };

    let face_normals: Vec<[f64; 3]> = mesh
        .indices
        .chunks_exact(3)
        .map(|t| {
            let (a, b, c) = (vertex(t[0]), vertex(t[1]), vertex(t[2]));
            let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
            let w = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
            [
                u[1] * w[2] - u[2] * w[1],
                u[2] * w[0] - u[0] * w[2],
                u[0] * w[1] - u[1] * w[0],
            ]
        })
        .collect();

    let mut sums = vec![[0.0f64; 3]; mesh.num_vertices()];
    for (tri, n) in mesh.indices.chunks_exact(3).zip(&face_normals) {
        for &i in tri {
            let sum = &mut sums[i as usize];
            for axis in 0..3 {
                sum[axis] += n[axis];
            }
        }
    }

    mesh.normals = sums
        .into_iter()
        .flat_map(|[x, y, z]| {
            let len = (x * x + y * y + z * z).sqrt();
            if len > 1e-12 {
                [(x / len) as f32, (y / len) as f32, (z / len) as f32]
            } else {
                [0.0, 0.0, 1.0]
            }
        })
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{extrude_ring, triangulate_ring, Thickness};
    use approx::assert_relative_eq;
    use inkmesh_math::Point2;

    fn slab() -> TriangleMesh {
        let ring = vec![
            Point2::new(10.0, 10.0),
            Point2::new(30.0, 10.0),
            Point2::new(30.0, 20.0),
            Point2::new(10.0, 20.0),
        ];
        let cap = triangulate_ring(&ring).unwrap();
        extrude_ring(&ring, &cap, Thickness::Uniform(6.0))
    }

    #[test]
    fn test_recenter_moves_bbox_to_origin() {
        let mut mesh = slab();
        recenter(&mut mesh);
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, [-10.0, -5.0, -3.0]);
        assert_eq!(max, [10.0, 5.0, 3.0]);
    }

    #[test]
    fn test_normals_unit_length_and_outward() {
        let mut mesh = slab();
        recenter(&mut mesh);
        compute_normals(&mut mesh);
        assert_eq!(mesh.normals.len(), mesh.vertices.len());

        for (v, n) in mesh.vertices.chunks_exact(3).zip(mesh.normals.chunks_exact(3)) {
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert_relative_eq!(len, 1.0, epsilon = 1e-5);
            // Every corner of a centered box points away from the origin.
            assert!(v[0] * n[0] + v[1] * n[1] + v[2] * n[2] > 0.0);
        }
    }

    #[test]
    fn test_isolated_vertex_gets_up_normal() {
        let mut mesh = TriangleMesh {
            vertices: vec![0.0; 3],
            indices: vec![],
            normals: vec![],
        };
        compute_normals(&mut mesh);
        assert_eq!(mesh.normals, vec![0.0, 0.0, 1.0]);
    }
}
