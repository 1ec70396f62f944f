//! Mesh decimation by shortest-edge collapse.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use tracing::debug;

use crate::TriangleMesh;

/// Something that can reduce a mesh's triangle count.
///
/// Implementations return a new mesh with roughly `ratio` of the input's
/// triangles; normals in the result may be stale and are recomputed by the
/// caller.
pub trait Decimator {
    /// Decimate `mesh` to about `ratio` of its triangle count.
    fn decimate(&self, mesh: &TriangleMesh, ratio: f32) -> TriangleMesh;
}

/// Greedy edge collapse ordered by squared edge length.
///
/// Collapses the shortest remaining edge into its midpoint and drops the
/// triangles that degenerate, until the target count is reached or the
/// edges run out. The ratio is clamped to [0.1, 1.0].
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeCollapseDecimator;

#[derive(PartialEq)]
struct EdgeEntry {
    cost: f32,
    edge_idx: usize,
}

impl Eq for EdgeEntry {}

impl Ord for EdgeEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap; ties by index for determinism
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.edge_idx.cmp(&self.edge_idx))
    }
}

impl PartialOrd for EdgeEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Unique undirected edges, smaller index first, in first-seen order.
fn build_edge_list(indices: &[u32]) -> Vec<(u32, u32)> {
    let mut seen = HashSet::new();
    let mut edges = Vec::new();
    for tri in indices.chunks_exact(3) {
        for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            let edge = if a < b { (a, b) } else { (b, a) };
            if seen.insert(edge) {
                edges.push(edge);
            }
        }
    }
    edges
}

fn get_canonical(vertex_map: &[u32], mut idx: u32) -> u32 {
    while vertex_map[idx as usize] != idx {
        idx = vertex_map[idx as usize];
    }
    idx
}

impl Decimator for EdgeCollapseDecimator {
    fn decimate(&self, mesh: &TriangleMesh, ratio: f32) -> TriangleMesh {
        let triangle_count = mesh.num_triangles();
        let target = (triangle_count as f32 * ratio.clamp(0.1, 1.0)) as usize;

        let edges = build_edge_list(&mesh.indices);
        let mut positions = mesh.vertices.clone();
        let squared_length = |(a, b): (u32, u32)| {
            let (pa, pb) = (mesh.vertex(a as usize), mesh.vertex(b as usize));
            (0..3).map(|k| (pa[k] - pb[k]).powi(2)).sum::<f32>()
        };
        let mut heap: BinaryHeap<EdgeEntry> = edges
            .iter()
            .enumerate()
            .map(|(edge_idx, &e)| EdgeEntry {
                cost: squared_length(e),
                edge_idx,
            })
            .collect();

        let mut vertex_map: Vec<u32> = (0..mesh.num_vertices() as u32).collect();
        let mut active = vec![true; triangle_count];
        let mut remaining = triangle_count;

        while remaining > target {
            let Some(entry) = heap.pop() else {
                break;
            };
            let (v0, v1) = edges[entry.edge_idx];
            let (keep, gone) = (
                get_canonical(&vertex_map, v0),
                get_canonical(&vertex_map, v1),
            );
            if keep == gone {
                continue;
            }

            vertex_map[gone as usize] = keep;
            let (k, g) = (keep as usize * 3, gone as usize * 3);
            for axis in 0..3 {
                positions[k + axis] = (positions[k + axis] + positions[g + axis]) / 2.0;
            }

            for (tri, alive) in mesh.indices.chunks_exact(3).zip(active.iter_mut()) {
                if !*alive {
                    continue;
                }
                let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| get_canonical(&vertex_map, i));
                if a == b || b == c || c == a {
                    *alive = false;
                    remaining -= 1;
                }
            }
        }

        // Compact the surviving vertices in first-use order
        let mut remap: HashMap<u32, u32> = HashMap::new();
        let mut out = TriangleMesh::new();
        for (tri, _) in mesh
            .indices
            .chunks_exact(3)
            .zip(&active)
            .filter(|&(_, &alive)| alive)
        {
            for &old in tri {
                let old = get_canonical(&vertex_map, old);
                let new = *remap.entry(old).or_insert_with(|| {
                    let idx = (out.vertices.len() / 3) as u32;
                    let base = old as usize * 3;
                    out.vertices.extend_from_slice(&positions[base..base + 3]);
                    idx
                });
                out.indices.push(new);
            }
        }

        debug!(
            before = triangle_count,
            after = out.num_triangles(),
            target,
            "decimated mesh"
        );
        out
    }
}
