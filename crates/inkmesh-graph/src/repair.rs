//! Bridging the gap of accidentally unclosed outlines.

use std::borrow::Cow;

use inkmesh_math::{Point2, Tolerance};
use tracing::{debug, info};

use crate::{Brush, ShapeSet, Stroke};

/// Target arc length between samples of a synthesized bridge stroke.
pub const BRIDGE_SPACING: f64 = 5.0;

/// Straight path from `a` to `b`, sampled every ~[`BRIDGE_SPACING`] units.
///
/// Always has at least one intermediate sample, and ends exactly on `a` and `b`.
pub fn bridge_path(a: Point2, b: Point2) -> Vec<Point2> {
    let distance = (b - a).norm();
    let steps = ((distance / BRIDGE_SPACING).floor() as usize).max(2);
    let mut path = Vec::with_capacity(steps + 1);
    path.push(a);
    for i in 1..steps {
        let t = i as f64 / steps as f64;
        path.push(a + (b - a) * t);
    }
    path.push(b);
    path
}

/// Close every free-standing open shape that has exactly two loose ends.
///
/// A shape qualifies when it has exactly two endpoints and its first
/// endpoint is not inside any closed shape. Branching shapes (more than two
/// endpoints) are left alone.
///
/// Returns `Cow::Borrowed(strokes)` when nothing qualifies, so callers can
/// skip a state update; otherwise the original strokes, untouched and in
/// order, followed by one bridge stroke per repaired shape.
pub fn repair<'a>(strokes: &'a [Stroke], brush: &Brush, tolerance: Tolerance) -> Cow<'a, [Stroke]> {
    if strokes.is_empty() {
        return Cow::Borrowed(strokes);
    }
    let set = ShapeSet::build(strokes, tolerance);
    if set.graph().len() < 2 {
        return Cow::Borrowed(strokes);
    }

    let mut bridges = Vec::new();
    for shape in set.open() {
        let &[start, end] = shape.endpoints() else {
            debug!(
                endpoints = shape.endpoints().len(),
                "skipping shape that is not a simple open path"
            );
            continue;
        };
        let (a, b) = (set.graph().node(start), set.graph().node(end));
        if set.inside_any_closed(&a) {
            continue;
        }
        match Stroke::with_brush(bridge_path(a, b), brush) {
            Ok(bridge) => bridges.push(bridge),
            Err(err) => debug!(%err, "cannot synthesize bridge stroke"),
        }
    }

    if bridges.is_empty() {
        info!("no shape could be repaired");
        return Cow::Borrowed(strokes);
    }

    info!(bridges = bridges.len(), "closed open shapes");
    let mut repaired = strokes.to_vec();
    repaired.extend(bridges);
    Cow::Owned(repaired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify;
    use crate::fixtures::{open_square, square, stroke};

    #[test]
    fn test_bridge_path_has_intermediate_sample() {
        let path = bridge_path(Point2::new(0.0, 0.0), Point2::new(3.0, 0.0));
        assert_eq!(path.len(), 3);
        assert_eq!(path[1], Point2::new(1.5, 0.0));
    }

    #[test]
    fn test_bridge_path_spacing() {
        let path = bridge_path(Point2::new(0.0, 0.0), Point2::new(0.0, 22.0));
        // floor(22 / 5) = 4 steps
        assert_eq!(path.len(), 5);
        assert_eq!(path[0], Point2::new(0.0, 0.0));
        assert_eq!(*path.last().unwrap(), Point2::new(0.0, 22.0));
    }

    #[test]
    fn test_nothing_to_repair_returns_input() {
        let strokes = vec![square(0.0, 0.0, 10.0)];
        let out = repair(&strokes, &Brush::default(), Tolerance::DEFAULT);
        assert!(matches!(out, Cow::Borrowed(_)));
        assert!(std::ptr::eq(out.as_ptr(), strokes.as_ptr()));
    }

    #[test]
    fn test_repair_closes_gap_and_appends() {
        let strokes = vec![open_square(0.0, 0.0, 20.0)];
        let out = repair(&strokes, &Brush::default(), Tolerance::DEFAULT);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], strokes[0]);
        assert_eq!(out[1].width(), Brush::default().width);

        let report = classify(&out, Tolerance::DEFAULT).unwrap();
        assert_eq!(report.closed_count(), 1);
        assert!(report.all_closed());
    }

    #[test]
    fn test_repair_is_idempotent() {
        let strokes = vec![open_square(0.0, 0.0, 20.0), open_square(100.0, 0.0, 30.0)];
        let once = repair(&strokes, &Brush::default(), Tolerance::DEFAULT).into_owned();
        assert_eq!(once.len(), 4);
        let twice = repair(&once, &Brush::default(), Tolerance::DEFAULT);
        assert!(matches!(twice, Cow::Borrowed(_)));
        assert_eq!(twice.as_ref(), once.as_slice());
    }

    #[test]
    fn test_branching_shape_left_alone() {
        let strokes = vec![
            stroke(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]),
            stroke(&[(10.0, 0.0), (10.0, 10.0)]),
        ];
        let out = repair(&strokes, &Brush::default(), Tolerance::DEFAULT);
        assert!(matches!(out, Cow::Borrowed(_)));
    }

    #[test]
    fn test_nested_open_shape_not_repaired() {
        let strokes = vec![square(0.0, 0.0, 100.0), open_square(40.0, 40.0, 10.0)];
        let out = repair(&strokes, &Brush::default(), Tolerance::DEFAULT);
        assert!(matches!(out, Cow::Borrowed(_)));
    }
}
