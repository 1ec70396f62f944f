//! Finalized strokes and the brush used to synthesize new ones.

use inkmesh_math::{Point2, Rgb};
use serde::{Deserialize, Serialize};

use crate::GraphError;

/// One continuous polyline drawn with a fixed width and color.
///
/// Immutable once built; the path always holds at least two samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStroke")]
pub struct Stroke {
    path: Vec<Point2>,
    width: f64,
    color: Rgb,
}

#[derive(Deserialize)]
struct RawStroke {
    path: Vec<Point2>,
    width: f64,
    color: Rgb,
}

impl TryFrom<RawStroke> for Stroke {
    type Error = GraphError;

    fn try_from(raw: RawStroke) -> Result<Self, Self::Error> {
        Stroke::new(raw.path, raw.width, raw.color)
    }
}

impl Stroke {
    /// Create a stroke from its sampled path.
    pub fn new(path: Vec<Point2>, width: f64, color: Rgb) -> Result<Self, GraphError> {
        if path.len() < 2 {
            return Err(GraphError::TooFewSamples(path.len()));
        }
        if !(width.is_finite() && width > 0.0) {
            return Err(GraphError::InvalidWidth(width));
        }
        Ok(Self { path, width, color })
    }

    /// Create a stroke painted with `brush`.
    pub fn with_brush(path: Vec<Point2>, brush: &Brush) -> Result<Self, GraphError> {
        Self::new(path, brush.width, brush.color)
    }

    /// The sampled points in drawing order.
    pub fn path(&self) -> &[Point2] {
        &self.path
    }

    /// Stroke width in drawing units.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Stroke color.
    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Consecutive sample pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        self.path.windows(2).map(|w| (w[0], w[1]))
    }
}

/// Width and color applied to strokes the engine synthesizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Brush {
    /// Stroke width in drawing units.
    pub width: f64,
    /// Stroke color.
    pub color: Rgb,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            width: 10.0,
            color: Rgb::BLACK,
        }
    }
}
