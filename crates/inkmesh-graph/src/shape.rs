//! Connected components ("shapes") of a stroke graph.

use std::collections::BTreeSet;

use inkmesh_math::{centroid, contains_point, Point2, Segment, Tolerance};
use tracing::debug;

use crate::{Stroke, StrokeGraph};

/// A maximal set of nodes connected through edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    nodes: Vec<usize>,
    endpoints: Vec<usize>,
}

impl Shape {
    /// Node ids in discovery order.
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Degree-1 nodes, the loose ends of an open shape.
    pub fn endpoints(&self) -> &[usize] {
        &self.endpoints
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; a shape holds at least its seed node.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// A lone node with no edges. Neither open nor closed.
    pub fn is_degenerate(&self) -> bool {
        self.nodes.len() < 2
    }

    /// Every node has degree >= 2.
    pub fn is_closed(&self) -> bool {
        !self.is_degenerate() && self.endpoints.is_empty()
    }

    /// At least one loose end.
    pub fn is_open(&self) -> bool {
        !self.endpoints.is_empty()
    }

    /// First node whose degree is not exactly 2. `None` for a closed shape
    /// means it is a simple cycle.
    pub fn branch_node(&self, graph: &StrokeGraph) -> Option<usize> {
        self.nodes.iter().copied().find(|&n| graph.degree(n) != 2)
    }

    /// Mean of the node coordinates.
    pub fn centroid(&self, graph: &StrokeGraph) -> Option<Point2> {
        centroid(self.nodes.iter().map(|&n| &graph.nodes()[n]))
    }

    /// Node coordinates in discovery order.
    pub fn points<'g>(&'g self, graph: &'g StrokeGraph) -> impl Iterator<Item = Point2> + 'g {
        self.nodes.iter().map(|&n| graph.node(n))
    }

    /// The shape's edges, each listed once (`u < v`).
    pub fn segments(&self, graph: &StrokeGraph) -> Vec<Segment> {
        let mut segments = Vec::new();
        for &u in &self.nodes {
            for &v in graph.neighbors(u).range(u + 1..) {
                segments.push(Segment::new(graph.node(u), graph.node(v)));
            }
        }
        segments
    }

    /// Indices of the strokes that contributed samples to this shape.
    pub fn stroke_indices(&self, graph: &StrokeGraph) -> BTreeSet<usize> {
        self.nodes
            .iter()
            .flat_map(|&n| graph.strokes_at(n).iter().copied())
            .collect()
    }

    /// Raw polylines of the strokes that contributed to this shape, as segments.
    pub fn stroke_segments(&self, graph: &StrokeGraph, strokes: &[Stroke]) -> Vec<Segment> {
        self.stroke_indices(graph)
            .into_iter()
            .filter_map(|i| strokes.get(i))
            .flat_map(|s| s.segments().map(|(a, b)| Segment::new(a, b)))
            .collect()
    }
}

/// Split a graph into shapes.
///
/// Iterative depth-first search with an explicit stack; nodes are marked on
/// push. Shapes come out ordered by their lowest node id.
pub fn find_shapes(graph: &StrokeGraph) -> Vec<Shape> {
    let mut visited = vec![false; graph.len()];
    let mut shapes = Vec::new();

    for start in 0..graph.len() {
        if visited[start] {
            continue;
        }

        let mut nodes = Vec::new();
        let mut stack = vec![start];
        visited[start] = true;

        while let Some(node) = stack.pop() {
            nodes.push(node);
            for &neighbor in graph.neighbors(node) {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    stack.push(neighbor);
                }
            }
        }

        let endpoints = nodes
            .iter()
            .copied()
            .filter(|&n| graph.degree(n) == 1)
            .collect();
        shapes.push(Shape { nodes, endpoints });
    }

    shapes
}

/// A graph, its shapes, and the edge sets of its closed shapes.
#[derive(Debug, Clone)]
pub struct ShapeSet {
    graph: StrokeGraph,
    shapes: Vec<Shape>,
    closed_polygons: Vec<Vec<Segment>>,
}

impl ShapeSet {
    /// Build the graph and its shapes from strokes.
    pub fn build(strokes: &[Stroke], tolerance: Tolerance) -> Self {
        Self::from_graph(StrokeGraph::build_with_tolerance(strokes, tolerance))
    }

    /// Split an existing graph into shapes.
    pub fn from_graph(graph: StrokeGraph) -> Self {
        let shapes = find_shapes(&graph);
        let closed_polygons = shapes
            .iter()
            .filter(|s| s.is_closed())
            .map(|s| s.segments(&graph))
            .collect();

        let set = Self {
            graph,
            shapes,
            closed_polygons,
        };
        debug!(
            shapes = set.shapes.len(),
            closed = set.closed_polygons.len(),
            "split stroke graph into shapes"
        );
        set
    }

    /// The underlying graph.
    pub fn graph(&self) -> &StrokeGraph {
        &self.graph
    }

    /// All shapes, degenerate ones included.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Closed shapes in discovery order.
    pub fn closed(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(|s| s.is_closed())
    }

    /// Open shapes in discovery order.
    pub fn open(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(|s| s.is_open())
    }

    /// Edge sets of the closed shapes, parallel to [`ShapeSet::closed`].
    pub fn closed_polygons(&self) -> &[Vec<Segment>] {
        &self.closed_polygons
    }

    /// Check if `p` lies inside any closed shape's polygon.
    pub fn inside_any_closed(&self, p: &Point2) -> bool {
        self.closed_polygons
            .iter()
            .any(|polygon| contains_point(p, polygon))
    }

    /// An open shape counts as nested when any of its nodes lies inside a
    /// closed polygon.
    pub fn is_nested(&self, shape: &Shape) -> bool {
        shape.points(&self.graph).any(|p| self.inside_any_closed(&p))
    }
}
