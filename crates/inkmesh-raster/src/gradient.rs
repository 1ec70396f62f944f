//! Distance-based grayscale shading of enclosed regions.
//!
//! Every shader walks a bounding box row-major and, for each integer pixel
//! that lies inside its edge set, computes a ramp position from the pixel's
//! distance to the nearest edge. The gray written is
//! `round((min + (max - min) * pos) * 255)` on R, G and B with alpha 255.

use inkmesh_graph::{ShapeSet, Stroke};
use inkmesh_math::{
    centroid, contains_point, distance_to_nearest, BoundingBox2, Point2, Segment, Tolerance,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{PixelBuffer, RasterError, Result};

/// Gray levels at the edge (`min`) and deep inside (`max`) of a region.
///
/// Both ends lie in [0, 1]; `min > max` flips the ramp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientRamp {
    /// Gray at ramp position 0.
    pub min: f64,
    /// Gray at ramp position 1.
    pub max: f64,
}

impl Default for GradientRamp {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

impl GradientRamp {
    /// Create a ramp.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Check that both ends lie in [0, 1].
    pub fn validate(&self) -> Result<()> {
        let in_range = |v: f64| (0.0..=1.0).contains(&v);
        if !in_range(self.min) || !in_range(self.max) {
            return Err(RasterError::InvalidRamp {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Gray byte at ramp position `pos`.
    pub fn gray(&self, pos: f64) -> u8 {
        let value = (self.min + (self.max - self.min) * pos) * 255.0;
        value.round().clamp(0.0, 255.0) as u8
    }
}

/// What a shader touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShadeSummary {
    /// Regions shaded.
    pub regions: usize,
    /// Pixels written.
    pub pixels: usize,
}

/// Ramp position from the distances to the nearest edge and to the center.
fn center_position(to_edge: f64, to_center: f64) -> f64 {
    let total = to_edge + to_center;
    if total > 0.0 {
        to_edge / total
    } else {
        0.0
    }
}

fn write_gray(buffer: &mut PixelBuffer<'_>, x: usize, y: usize, gray: u8) {
    buffer.set_rgba(x as i64, y as i64, [gray, gray, gray, 255]);
}

/// Pixels of `bbox` inside `segments`, row-major, with their edge distance.
fn interior_pixels(
    buffer: &PixelBuffer<'_>,
    bbox: &BoundingBox2,
    segments: &[Segment],
) -> Vec<(usize, usize, f64)> {
    let Some((xs, ys)) = bbox.pixel_span(buffer.width(), buffer.height()) else {
        return Vec::new();
    };
    let mut pixels = Vec::new();
    for y in ys {
        for x in xs.clone() {
            let p = Point2::new(x as f64, y as f64);
            if contains_point(&p, segments) {
                pixels.push((x, y, distance_to_nearest(&p, segments)));
            }
        }
    }
    pixels
}

/// Shade one region against a fixed center. Returns pixels written.
fn shade_toward_center(
    buffer: &mut PixelBuffer<'_>,
    bbox: &BoundingBox2,
    segments: &[Segment],
    center: Point2,
    ramp: &GradientRamp,
) -> usize {
    let pixels = interior_pixels(buffer, bbox, segments);
    for &(x, y, to_edge) in &pixels {
        let to_center = (Point2::new(x as f64, y as f64) - center).norm();
        write_gray(buffer, x, y, ramp.gray(center_position(to_edge, to_center)));
    }
    pixels.len()
}

fn segment_bbox(segments: &[Segment]) -> Option<BoundingBox2> {
    BoundingBox2::from_points(segments.iter().flat_map(|s| [&s.p1, &s.p2]))
}

/// Shade the whole drawing as one region.
///
/// The center is the mean of every sample, the box spans every sample, and
/// a pixel is shaded when it lies inside the union of all stroke segments.
pub fn shade_global(
    buffer: &mut PixelBuffer<'_>,
    strokes: &[Stroke],
    ramp: &GradientRamp,
) -> Result<ShadeSummary> {
    ramp.validate()?;
    let samples = || strokes.iter().flat_map(|s| s.path());
    let (Some(center), Some(bbox)) = (centroid(samples()), BoundingBox2::from_points(samples()))
    else {
        return Err(RasterError::EmptyDrawing);
    };

    let segments: Vec<Segment> = strokes
        .iter()
        .flat_map(|s| s.segments().map(|(a, b)| Segment::new(a, b)))
        .collect();

    let pixels = shade_toward_center(buffer, &bbox, &segments, center, ramp);
    debug!(pixels, "global gradient");
    Ok(ShadeSummary { regions: 1, pixels })
}

/// Shade every closed shape on its own.
///
/// Each shape's center is the mean of its node coordinates and its edges are
/// the raw polylines of the strokes that merged into it.
pub fn shade_shapes(
    buffer: &mut PixelBuffer<'_>,
    strokes: &[Stroke],
    ramp: &GradientRamp,
    tolerance: Tolerance,
) -> Result<ShadeSummary> {
    ramp.validate()?;
    if strokes.is_empty() {
        return Err(RasterError::EmptyDrawing);
    }

    let set = ShapeSet::build(strokes, tolerance);
    let mut summary = ShadeSummary::default();
    for shape in set.closed() {
        let segments = shape.stroke_segments(set.graph(), strokes);
        let (Some(center), Some(bbox)) = (shape.centroid(set.graph()), segment_bbox(&segments))
        else {
            continue;
        };
        summary.pixels += shade_toward_center(buffer, &bbox, &segments, center, ramp);
        summary.regions += 1;
    }

    debug!(regions = summary.regions, pixels = summary.pixels, "per-shape gradient");
    Ok(summary)
}

/// Shade every closed shape relative to its widest interior point.
///
/// A pixel's ramp position is `min(1, (d / max_d) / threshold)` where `d`
/// is its edge distance and `max_d` the largest edge distance inside the
/// shape, so a smaller `threshold` saturates more of the interior to the
/// ramp's `max`. `threshold` must lie in (0, 1].
pub fn shade_edges(
    buffer: &mut PixelBuffer<'_>,
    strokes: &[Stroke],
    ramp: &GradientRamp,
    threshold: f64,
    tolerance: Tolerance,
) -> Result<ShadeSummary> {
    ramp.validate()?;
    if !(threshold > 0.0 && threshold <= 1.0) {
        return Err(RasterError::InvalidThreshold(threshold));
    }
    if strokes.is_empty() {
        return Err(RasterError::EmptyDrawing);
    }

    let set = ShapeSet::build(strokes, tolerance);
    let mut summary = ShadeSummary::default();
    for shape in set.closed() {
        let segments = shape.stroke_segments(set.graph(), strokes);
        let Some(bbox) = segment_bbox(&segments) else {
            continue;
        };

        let pixels = interior_pixels(buffer, &bbox, &segments);
        let widest = pixels.iter().map(|&(_, _, d)| d).fold(0.0, f64::max);
        if widest <= 0.0 {
            continue;
        }
        for &(x, y, d) in &pixels {
            let pos = ((d / widest) / threshold).min(1.0);
            write_gray(buffer, x, y, ramp.gray(pos));
        }
        summary.pixels += pixels.len();
        summary.regions += 1;
    }

    debug!(regions = summary.regions, pixels = summary.pixels, threshold, "edge gradient");
    Ok(summary)
}
