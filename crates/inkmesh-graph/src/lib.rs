#![warn(missing_docs)]

//! Stroke analysis for the inkmesh engine.
//!
//! Turns a drawing (an ordered list of polyline strokes) into an undirected
//! point graph, splits it into connected shapes, and answers the questions
//! the rest of the engine asks about them: which shapes are closed, which
//! open shapes sit inside a closed outline, where the centroids are, and
//! which gaps can be bridged to close an outline.
//!
//! Every structure here is rebuilt from the strokes on each call and thrown
//! away afterwards.
//!
//! # Example
//!
//! ```
//! use inkmesh_graph::{classify, Stroke};
//! use inkmesh_math::{Point2, Rgb, Tolerance};
//!
//! let square = Stroke::new(
//!     vec![
//!         Point2::new(0.0, 0.0),
//!         Point2::new(10.0, 0.0),
//!         Point2::new(10.0, 10.0),
//!         Point2::new(0.0, 10.0),
//!         Point2::new(0.0, 0.0),
//!     ],
//!     2.0,
//!     Rgb::BLACK,
//! )
//! .unwrap();
//!
//! let report = classify(&[square], Tolerance::DEFAULT).unwrap();
//! assert_eq!(report.closed_count(), 1);
//! assert_eq!(report.analyzed_count(), 1);
//! ```

mod classify;
mod graph;
mod repair;
mod shape;
mod stroke;

pub use classify::{classify, drawing_centroid, shape_centroids, ShapeReport, ShapeStatus};
pub use graph::StrokeGraph;
pub use repair::{bridge_path, repair, BRIDGE_SPACING};
pub use shape::{find_shapes, Shape, ShapeSet};
pub use stroke::{Brush, Stroke};

use thiserror::Error;

/// Errors from stroke analysis.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// A stroke needs at least two samples.
    #[error("stroke has {0} samples, at least 2 are required")]
    TooFewSamples(usize),

    /// Stroke width must be positive and finite.
    #[error("invalid stroke width: {0}")]
    InvalidWidth(f64),

    /// The drawing has no strokes.
    #[error("drawing is empty")]
    EmptyDrawing,

    /// After merging, the graph has too few nodes to hold a shape.
    #[error("graph has {0} node(s), at least 2 are required")]
    TooFewNodes(usize),
}

/// Result type for stroke analysis.
pub type Result<T> = std::result::Result<T, GraphError>;
