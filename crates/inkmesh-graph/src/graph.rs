//! Deduplicated point graph built from raw strokes.

use std::collections::{BTreeSet, HashMap};

use inkmesh_math::{Point2, Tolerance};
use tracing::debug;

use crate::Stroke;

/// Grid cell key; cells are one merge tolerance wide.
type CellKey = (i64, i64);

/// Spatial hash over node positions.
///
/// Any sample within the merge tolerance of a node lies in the node's cell
/// or one of its eight neighbours, so probing the 3x3 block finds every
/// candidate a full linear scan would.
struct MergeGrid {
    cell: f64,
    cells: HashMap<CellKey, Vec<usize>>,
}

impl MergeGrid {
    fn new(tolerance: Tolerance) -> Self {
        Self {
            cell: tolerance.merge,
            cells: HashMap::new(),
        }
    }

    fn key(&self, p: &Point2) -> CellKey {
        ((p.x / self.cell).floor() as i64, (p.y / self.cell).floor() as i64)
    }

    /// Lowest-index node within tolerance of `p`, the one a linear scan in
    /// insertion order would hit first.
    fn find(&self, p: &Point2, nodes: &[Point2], tolerance: Tolerance) -> Option<usize> {
        let (cx, cy) = self.key(p);
        let mut best: Option<usize> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(bucket) = self.cells.get(&(cx + dx, cy + dy)) else {
                    continue;
                };
                for &id in bucket {
                    if tolerance.points_merge(&nodes[id], p) && best.map_or(true, |b| id < b) {
                        best = Some(id);
                    }
                }
            }
        }
        best
    }

    fn insert(&mut self, p: &Point2, id: usize) {
        let key = self.key(p);
        self.cells.entry(key).or_default().push(id);
    }
}

/// Undirected graph over merged stroke samples.
///
/// A node keeps the coordinate of the first sample that reached its
/// neighbourhood; later samples within tolerance resolve to it without
/// moving it. Consecutive samples of a stroke become edges unless both
/// resolve to the same node.
#[derive(Debug, Clone, Default)]
pub struct StrokeGraph {
    nodes: Vec<Point2>,
    adjacency: Vec<BTreeSet<usize>>,
    members: Vec<BTreeSet<usize>>,
    sample_count: usize,
}

impl StrokeGraph {
    /// Build with the default one-unit merge tolerance.
    pub fn build(strokes: &[Stroke]) -> Self {
        Self::build_with_tolerance(strokes, Tolerance::DEFAULT)
    }

    /// Build with a custom merge tolerance.
    pub fn build_with_tolerance(strokes: &[Stroke], tolerance: Tolerance) -> Self {
        let mut graph = Self::default();
        let mut grid = MergeGrid::new(tolerance);

        for (stroke_idx, stroke) in strokes.iter().enumerate() {
            let mut prev: Option<usize> = None;
            for p in stroke.path() {
                let id = graph.resolve(p, &mut grid, tolerance);
                graph.members[id].insert(stroke_idx);
                graph.sample_count += 1;
                if let Some(prev_id) = prev {
                    if prev_id != id {
                        graph.adjacency[prev_id].insert(id);
                        graph.adjacency[id].insert(prev_id);
                    }
                }
                prev = Some(id);
            }
        }

        debug!(
            strokes = strokes.len(),
            samples = graph.sample_count,
            nodes = graph.nodes.len(),
            edges = graph.edge_count(),
            "built stroke graph"
        );
        graph
    }

    fn resolve(&mut self, p: &Point2, grid: &mut MergeGrid, tolerance: Tolerance) -> usize {
        if let Some(id) = grid.find(p, &self.nodes, tolerance) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(*p);
        self.adjacency.push(BTreeSet::new());
        self.members.push(BTreeSet::new());
        grid.insert(p, id);
        id
    }

    /// Node coordinates, indexed by node id.
    pub fn nodes(&self) -> &[Point2] {
        &self.nodes
    }

    /// Coordinate of one node.
    pub fn node(&self, id: usize) -> Point2 {
        self.nodes[id]
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of stroke samples the graph was built from.
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Neighbours of a node in ascending id order.
    pub fn neighbors(&self, id: usize) -> &BTreeSet<usize> {
        &self.adjacency[id]
    }

    /// Number of distinct neighbours.
    pub fn degree(&self, id: usize) -> usize {
        self.adjacency[id].len()
    }

    /// Indices of strokes that have a sample merged into this node.
    pub fn strokes_at(&self, id: usize) -> &BTreeSet<usize> {
        &self.members[id]
    }

    /// Every undirected edge once, as `(u, v)` with `u < v`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(u, adj)| adj.range(u + 1..).map(move |&v| (u, v)))
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(BTreeSet::len).sum::<usize>() / 2
    }
}
