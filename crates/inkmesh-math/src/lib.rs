#![warn(missing_docs)]

//! Math types for the inkmesh stroke engine.
//!
//! Thin wrappers around nalgebra providing the planar types the stroke
//! analysis works in (points, segments, boxes), the 3D aliases used by the
//! mesh pipeline, the spatial merge tolerance, and a typed RGB color.

mod color;
mod containment;

pub use color::{ColorError, Rgb};
pub use containment::contains_point;

use nalgebra::{Vector2, Vector3};

/// A point on the drawing plane.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector on the drawing plane.
pub type Vec2 = Vector2<f64>;

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// Spatial merge tolerance for stroke samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Two samples closer than this (strictly) collapse into one node.
    pub merge: f64,
}

impl Tolerance {
    /// One drawing unit, the tolerance strokes are analyzed with by default.
    pub const DEFAULT: Self = Self { merge: 1.0 };

    /// Tolerance with a custom merge distance.
    pub fn new(merge: f64) -> Self {
        Self { merge }
    }

    /// Check if two samples fall into the same node.
    pub fn points_merge(&self, a: &Point2, b: &Point2) -> bool {
        (a - b).norm() < self.merge
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A straight edge between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// First endpoint.
    pub p1: Point2,
    /// Second endpoint.
    pub p2: Point2,
}

impl Segment {
    /// Create a segment.
    pub fn new(p1: Point2, p2: Point2) -> Self {
        Self { p1, p2 }
    }

    /// Euclidean distance from `p` to the closest point of this segment.
    pub fn distance_to(&self, p: &Point2) -> f64 {
        point_to_segment_distance(p, &self.p1, &self.p2)
    }

    /// Length of the segment.
    pub fn length(&self) -> f64 {
        (self.p2 - self.p1).norm()
    }
}

/// Distance from `p` to segment `ab`.
///
/// Projects `p` onto the segment with the parameter clamped to `[0, 1]`.
/// A zero-length segment degrades to point-to-point distance.
pub fn point_to_segment_distance(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq == 0.0 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

/// Minimum distance from `p` to any segment, or `f64::INFINITY` if there are none.
pub fn distance_to_nearest(p: &Point2, segments: &[Segment]) -> f64 {
    segments
        .iter()
        .map(|s| s.distance_to(p))
        .fold(f64::INFINITY, f64::min)
}

/// Arithmetic mean of a point set, `None` when the set is empty.
pub fn centroid<'a, I>(points: I) -> Option<Point2>
where
    I: IntoIterator<Item = &'a Point2>,
{
    let mut sum = Vec2::zeros();
    let mut count = 0usize;
    for p in points {
        sum += p.coords;
        count += 1;
    }
    if count == 0 {
        return None;
    }
    Some(Point2::from(sum / count as f64))
}

/// Axis-aligned bounding box on the drawing plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox2 {
    /// Minimum corner.
    pub min: Point2,
    /// Maximum corner.
    pub max: Point2,
}

impl BoundingBox2 {
    /// Bounding box of a point set, `None` when the set is empty.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point2>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bbox = Self {
            min: first,
            max: first,
        };
        for p in iter {
            bbox.include(p);
        }
        Some(bbox)
    }

    /// Grow the box to contain `p`.
    pub fn include(&mut self, p: &Point2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// Center of the box.
    pub fn center(&self) -> Point2 {
        nalgebra::center(&self.min, &self.max)
    }

    /// Integer pixel rows and columns covered by the box, clipped to a
    /// `width` x `height` grid. Returns `None` when nothing overlaps.
    pub fn pixel_span(
        &self,
        width: usize,
        height: usize,
    ) -> Option<(std::ops::RangeInclusive<usize>, std::ops::RangeInclusive<usize>)> {
        if width == 0 || height == 0 {
            return None;
        }
        let x0 = self.min.x.floor().max(0.0);
        let y0 = self.min.y.floor().max(0.0);
        let x1 = self.max.x.ceil().min((width - 1) as f64);
        let y1 = self.max.y.ceil().min((height - 1) as f64);
        if x0 > x1 || y0 > y1 || !x0.is_finite() || !y0.is_finite() {
            return None;
        }
        Some((x0 as usize..=x1 as usize, y0 as usize..=y1 as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_distance_projects_inside_segment() {
        let d = point_to_segment_distance(
            &Point2::new(5.0, 3.0),
            &Point2::new(0.0, 0.0),
            &Point2::new(10.0, 0.0),
        );
        assert_relative_eq!(d, 3.0);
    }

    #[test]
    fn test_distance_clamps_to_endpoint() {
        let d = point_to_segment_distance(
            &Point2::new(13.0, 4.0),
            &Point2::new(0.0, 0.0),
            &Point2::new(10.0, 0.0),
        );
        assert_relative_eq!(d, 5.0);
    }

    #[test]
    fn test_distance_degenerate_segment() {
        let a = Point2::new(1.0, 1.0);
        let d = point_to_segment_distance(&Point2::new(4.0, 5.0), &a, &a);
        assert_relative_eq!(d, 5.0);
    }

    #[test]
    fn test_distance_to_nearest_picks_minimum() {
        let segs = [
            Segment::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)),
            Segment::new(Point2::new(0.0, 10.0), Point2::new(10.0, 10.0)),
        ];
        assert_relative_eq!(distance_to_nearest(&Point2::new(5.0, 8.0), &segs), 2.0);
        assert!(distance_to_nearest(&Point2::origin(), &[]).is_infinite());
    }

    #[test]
    fn test_centroid_of_square_is_exact() {
        let pts = [
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ];
        let c = centroid(&pts).unwrap();
        assert_eq!(c, Point2::new(5.0, 5.0));
        assert!(centroid(&[] as &[Point2]).is_none());
    }

    #[test]
    fn test_bbox_pixel_span_clips() {
        let bbox = BoundingBox2::from_points(&[Point2::new(-3.2, 2.5), Point2::new(7.4, 40.0)])
            .unwrap();
        let (xs, ys) = bbox.pixel_span(5, 20).unwrap();
        assert_eq!(xs, 0..=4);
        assert_eq!(ys, 2..=19);
    }

    #[test]
    fn test_bbox_outside_grid() {
        let bbox =
            BoundingBox2::from_points(&[Point2::new(50.0, 50.0), Point2::new(60.0, 60.0)]).unwrap();
        assert!(bbox.pixel_span(10, 10).is_none());
    }

    #[test]
    fn test_tolerance_merge_is_strict() {
        let tol = Tolerance::DEFAULT;
        assert!(tol.points_merge(&Point2::new(0.0, 0.0), &Point2::new(0.5, 0.5)));
        assert!(!tol.points_merge(&Point2::new(0.0, 0.0), &Point2::new(1.0, 0.0)));
    }
}
