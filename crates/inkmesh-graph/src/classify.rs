//! Open/closed shape tally and centroid queries.

use std::fmt;

use inkmesh_math::{centroid, Point2, Tolerance};
use tracing::{debug, info};

use crate::{GraphError, Result, Shape, ShapeSet, Stroke};

/// Classification of one analyzed shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeStatus {
    /// Nodes in the shape.
    pub node_count: usize,
    /// Degree-1 nodes in the shape.
    pub endpoint_count: usize,
    /// True iff the shape has no endpoints.
    pub is_closed: bool,
}

impl ShapeStatus {
    fn of(shape: &Shape) -> Self {
        Self {
            node_count: shape.len(),
            endpoint_count: shape.endpoints().len(),
            is_closed: shape.is_closed(),
        }
    }
}

/// Result of classifying a drawing's shapes.
///
/// Open shapes with any node inside a closed outline are treated as detail
/// of that outline and left out of the tally; closed shapes always count.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShapeReport {
    /// Analyzed shapes: free-standing open shapes first, then closed shapes.
    pub shapes: Vec<ShapeStatus>,
    /// Open shapes excluded because they sit inside a closed shape.
    pub nested_open: usize,
}

impl ShapeReport {
    /// Number of closed shapes.
    pub fn closed_count(&self) -> usize {
        self.shapes.iter().filter(|s| s.is_closed).count()
    }

    /// Number of analyzed open shapes.
    pub fn open_count(&self) -> usize {
        self.shapes.len() - self.closed_count()
    }

    /// Number of shapes that made it into the tally.
    pub fn analyzed_count(&self) -> usize {
        self.shapes.len()
    }

    /// True when every analyzed shape is closed.
    pub fn all_closed(&self) -> bool {
        self.open_count() == 0
    }
}

impl fmt::Display for ShapeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.shapes.is_empty() {
            return writeln!(
                f,
                "No shapes to analyze ({} open shape(s) lie inside closed shapes)",
                self.nested_open
            );
        }
        for (i, shape) in self.shapes.iter().enumerate() {
            let kind = if shape.is_closed { "closed" } else { "open" };
            writeln!(f, "Shape {}: {}", i + 1, kind)?;
        }
        writeln!(
            f,
            "Total: {} closed shape(s) out of {} analyzed",
            self.closed_count(),
            self.analyzed_count()
        )
    }
}

/// Classify every shape in a drawing as open or closed.
///
/// # Errors
///
/// Returns [`GraphError::EmptyDrawing`] when there are no strokes and
/// [`GraphError::TooFewNodes`] when merging leaves fewer than two nodes.
pub fn classify(strokes: &[Stroke], tolerance: Tolerance) -> Result<ShapeReport> {
    if strokes.is_empty() {
        return Err(GraphError::EmptyDrawing);
    }
    let set = ShapeSet::build(strokes, tolerance);
    if set.graph().len() < 2 {
        return Err(GraphError::TooFewNodes(set.graph().len()));
    }

    let mut report = ShapeReport::default();
    for shape in set.open() {
        if set.is_nested(shape) {
            report.nested_open += 1;
        } else {
            report.shapes.push(ShapeStatus::of(shape));
        }
    }
    report.shapes.extend(set.closed().map(ShapeStatus::of));

    info!(
        closed = report.closed_count(),
        analyzed = report.analyzed_count(),
        nested_open = report.nested_open,
        "classified shapes"
    );
    Ok(report)
}

/// Mean of every sample of every stroke, `None` for an empty drawing.
pub fn drawing_centroid(strokes: &[Stroke]) -> Option<Point2> {
    centroid(strokes.iter().flat_map(|s| s.path()))
}

/// Centroid of each closed shape, in discovery order.
pub fn shape_centroids(strokes: &[Stroke], tolerance: Tolerance) -> Vec<Point2> {
    let set = ShapeSet::build(strokes, tolerance);
    let centroids: Vec<Point2> = set
        .closed()
        .filter_map(|s| s.centroid(set.graph()))
        .collect();
    debug!(count = centroids.len(), "computed shape centroids");
    centroids
}
