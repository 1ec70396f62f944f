//! Even-odd point containment against an unordered segment soup.

use crate::{Point2, Segment};

/// Even-odd ray cast to the right of `point`.
///
/// The segments need not be ordered or oriented; each one is tested on its
/// own. A segment is skipped when both ends lie strictly above or strictly
/// below the test row, or when it lies entirely to the left of the point.
/// Survivors count only if they cross the row under the half-open rule
/// (one end `<= py`, the other `> py`), so a horizontal segment lying on the
/// row never reaches the interpolation and never divides by zero.
pub fn contains_point(point: &Point2, segments: &[Segment]) -> bool {
    let (px, py) = (point.x, point.y);
    let mut crossings = 0usize;

    for seg in segments {
        let (p1, p2) = (seg.p1, seg.p2);
        if (p1.y > py && p2.y > py) || (p1.y < py && p2.y < py) || p1.x.max(p2.x) < px {
            continue;
        }
        if (p1.y <= py) == (p2.y <= py) {
            continue;
        }
        let t = (py - p1.y) / (p2.y - p1.y);
        let x = p1.x + t * (p2.x - p1.x);
        if x > px {
            crossings += 1;
        }
    }

    crossings % 2 == 1
}
