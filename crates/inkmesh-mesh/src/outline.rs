//! Choosing the outline to extrude and ordering it into a ring.

use inkmesh_graph::{Shape, ShapeSet};
use inkmesh_math::Point2;
use tracing::{debug, warn};

use crate::{MeshError, Result};

/// Ordered boundary of the chosen closed shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    /// Graph node ids in walk order.
    pub nodes: Vec<usize>,
    /// Ring points on the extrusion plane: y flipped from drawing space
    /// and wound counter-clockwise.
    pub ring: Vec<Point2>,
}

/// Signed area of a closed polygon, positive when counter-clockwise.
pub(crate) fn signed_area(ring: &[Point2]) -> f64 {
    let n = ring.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let (a, b) = (ring[i], ring[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice / 2.0
}

/// Largest closed shape with at least three nodes. Ties go to the shape
/// found first.
fn largest_closed(set: &ShapeSet) -> Result<&Shape> {
    let mut best: Option<&Shape> = None;
    for shape in set.closed() {
        if best.map_or(true, |b| shape.len() > b.len()) {
            best = Some(shape);
        }
    }
    let shape = best.ok_or(MeshError::NoClosedShape)?;
    if shape.len() < 3 {
        return Err(MeshError::TooFewRingPoints(shape.len()));
    }
    Ok(shape)
}

/// Walk from the shape's first node, always stepping to the lowest-numbered
/// unvisited neighbor, until no unvisited neighbor is left.
fn walk(set: &ShapeSet, shape: &Shape) -> Vec<usize> {
    let graph = set.graph();
    let mut visited = vec![false; graph.len()];
    let mut order = Vec::with_capacity(shape.len());

    let mut current = Some(shape.nodes()[0]);
    while let Some(node) = current {
        visited[node] = true;
        order.push(node);
        current = graph.neighbors(node).iter().copied().find(|&n| !visited[n]);
    }
    order
}

/// Pick and order the outline of a drawing's shapes.
///
/// With `strict` set, an outline containing any node whose degree is not
/// exactly 2 is rejected with [`MeshError::BranchingOutline`]. Without it,
/// the walk simply stops at the first dead end, which can leave part of a
/// branching outline behind.
///
/// # Errors
///
/// Validation errors when the graph is too small or has no usable closed
/// shape; [`MeshError::DegenerateRing`] when the ring encloses no area.
pub fn select_outline(set: &ShapeSet, strict: bool) -> Result<Outline> {
    let graph = set.graph();
    if graph.len() < 2 {
        return Err(MeshError::TooFewNodes(graph.len()));
    }

    let shape = largest_closed(set)?;
    if strict {
        if let Some(node) = shape.branch_node(graph) {
            return Err(MeshError::BranchingOutline {
                node,
                degree: graph.degree(node),
            });
        }
    }

    let mut nodes = walk(set, shape);
    if nodes.len() < 3 {
        return Err(MeshError::TooFewRingPoints(nodes.len()));
    }
    if nodes.len() < shape.len() {
        warn!(
            walked = nodes.len(),
            shape = shape.len(),
            "outline walk stopped early at a branch"
        );
    }

    let mut ring: Vec<Point2> = nodes
        .iter()
        .map(|&n| {
            let p = graph.node(n);
            Point2::new(p.x, -p.y)
        })
        .collect();

    let area = signed_area(&ring);
    if area.abs() <= f64::EPSILON {
        return Err(MeshError::DegenerateRing);
    }
    if area < 0.0 {
        ring.reverse();
        nodes.reverse();
    }

    debug!(points = ring.len(), area = area.abs(), "selected outline");
    Ok(Outline { nodes, ring })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{polygon, stroke};
    use inkmesh_math::Tolerance;

    fn set_of(strokes: &[inkmesh_graph::Stroke]) -> ShapeSet {
        ShapeSet::build(strokes, Tolerance::DEFAULT)
    }

    #[test]
    fn test_square_ring_is_ccw() {
        let square = stroke(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]);
        let outline = select_outline(&set_of(&[square]), true).unwrap();
        assert_eq!(outline.ring.len(), 4);
        assert!(signed_area(&outline.ring) > 0.0);
        // y is flipped
        assert!(outline.ring.iter().all(|p| p.y <= 0.0));
    }

    #[test]
    fn test_picks_largest_closed_shape() {
        let strokes = [polygon(5, 10.0), {
            let big: Vec<(f64, f64)> = (0..9)
                .map(|i| {
                    let a = std::f64::consts::TAU * i as f64 / 8.0;
                    (200.0 + 30.0 * a.cos(), 200.0 + 30.0 * a.sin())
                })
                .collect();
            stroke(&big)
        }];
        let outline = select_outline(&set_of(&strokes), true).unwrap();
        assert_eq!(outline.ring.len(), 8);
    }

    #[test]
    fn test_open_drawing_has_no_outline() {
        let strokes = [stroke(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)])];
        assert_eq!(
            select_outline(&set_of(&strokes), true),
            Err(MeshError::NoClosedShape)
        );
    }

    #[test]
    fn test_single_node_drawing() {
        let strokes = [stroke(&[(0.0, 0.0), (0.2, 0.2)])];
        assert_eq!(
            select_outline(&set_of(&strokes), true),
            Err(MeshError::TooFewNodes(1))
        );
    }

    #[test]
    fn test_branching_outline() {
        // Square with a diagonal: two corners have degree 3.
        let strokes = [
            stroke(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]),
            stroke(&[(0.0, 0.0), (10.0, 10.0)]),
        ];
        let err = select_outline(&set_of(&strokes), true).unwrap_err();
        assert!(matches!(err, MeshError::BranchingOutline { degree: 3, .. }));
        assert!(err.is_validation());

        // Lenient walk: 0 -> 1 -> 2 -> 3, all four corners.
        let outline = select_outline(&set_of(&strokes), false).unwrap();
        assert_eq!(outline.ring.len(), 4);
    }

    #[test]
    fn test_collinear_ring_is_degenerate() {
        let strokes = [stroke(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0), (0.0, 0.0)])];
        assert_eq!(
            select_outline(&set_of(&strokes), true),
            Err(MeshError::DegenerateRing)
        );
    }
}
