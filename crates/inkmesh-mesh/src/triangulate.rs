//! Ear-clipping triangulation of a simple ring.

use inkmesh_math::Point2;

use crate::{MeshError, Result};

/// Relative tolerance on the sine of a corner angle below which the corner
/// counts as straight.
const STRAIGHT_EPS: f64 = 1e-9;

fn cross(a: Point2, b: Point2, c: Point2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Twice the signed area of a ring, positive when counter-clockwise.
fn twice_signed_area(ring: &[Point2]) -> f64 {
    let n = ring.len();
    (0..n)
        .map(|i| {
            let (p, q) = (ring[i], ring[(i + 1) % n]);
            p.x * q.y - q.x * p.y
        })
        .sum()
}

/// `a -> b -> c` continues in the same direction: removing `b` leaves the
/// outline unchanged.
fn is_straight(a: Point2, b: Point2, c: Point2) -> bool {
    let (u, v) = (b - a, c - b);
    cross(a, b, c).abs() <= STRAIGHT_EPS * u.norm() * v.norm() && u.dot(&v) > 0.0
}

fn is_convex(a: Point2, b: Point2, c: Point2) -> bool {
    cross(a, b, c) > STRAIGHT_EPS * (b - a).norm() * (c - b).norm()
}

/// `p` is left of or on the directed line `a -> b`.
fn left_or_on(a: Point2, b: Point2, p: Point2) -> bool {
    cross(a, b, p) >= -STRAIGHT_EPS * (b - a).norm() * (p - a).norm()
}

/// Check if a point lies inside or on the boundary of a counter-clockwise
/// triangle.
fn point_in_triangle(p: Point2, a: Point2, b: Point2, c: Point2) -> bool {
    left_or_on(a, b, p) && left_or_on(b, c, p) && left_or_on(c, a, p)
}

fn corner(ring: &[Point2], remaining: &[usize], i: usize) -> (usize, usize, usize) {
    let n = remaining.len();
    (remaining[(i + n - 1) % n], remaining[i], remaining[(i + 1) % n])
}

/// Find the next vertex to clip. Straight vertices go first; otherwise a
/// convex corner whose closed triangle holds no other ring vertex, so the
/// diagonal never touches the rest of the outline.
fn find_ear(ring: &[Point2], remaining: &[usize]) -> Option<usize> {
    let n = remaining.len();
    let straight = (0..n).find(|&i| {
        let (a, b, c) = corner(ring, remaining, i);
        is_straight(ring[a], ring[b], ring[c])
    });
    straight.or_else(|| {
        (0..n).find(|&i| {
            let (ia, ib, ic) = corner(ring, remaining, i);
            let (a, b, c) = (ring[ia], ring[ib], ring[ic]);
            if !is_convex(a, b, c) {
                return false;
            }
            remaining
                .iter()
                .filter(|&&j| j != ia && j != ib && j != ic)
                .map(|&j| ring[j])
                .all(|p| p == a || p == b || p == c || !point_in_triangle(p, a, b, c))
        })
    })
}

/// Triangulate a counter-clockwise simple ring.
///
/// Returns index triples into `ring`, each wound counter-clockwise. An
/// R-point ring always yields exactly R - 2 triangles covering its interior
/// once: runs of collinear points are clipped as zero-area triangles.
///
/// # Errors
///
/// [`MeshError::TriangulationFailed`] if the ring encloses no area, is wound
/// clockwise, or is not simple (no ear can be found, or the triangles do not
/// add up to the ring's area).
pub fn triangulate_ring(ring: &[Point2]) -> Result<Vec<[u32; 3]>> {
    let area = twice_signed_area(ring);
    if ring.len() < 3 || area <= 0.0 {
        return Err(MeshError::TriangulationFailed);
    }

    let mut remaining: Vec<usize> = (0..ring.len()).collect();
    let mut triangles = Vec::with_capacity(ring.len() - 2);

    while remaining.len() > 3 {
        let i = find_ear(ring, &remaining).ok_or(MeshError::TriangulationFailed)?;
        let (a, b, c) = corner(ring, &remaining, i);
        triangles.push([a as u32, b as u32, c as u32]);
        remaining.remove(i);
    }
    if let [a, b, c] = remaining[..] {
        triangles.push([a as u32, b as u32, c as u32]);
    }

    let covered: f64 = triangles
        .iter()
        .map(|t| cross(ring[t[0] as usize], ring[t[1] as usize], ring[t[2] as usize]).abs())
        .sum();
    if (covered - area).abs() > 1e-6 * area {
        return Err(MeshError::TriangulationFailed);
    }
    Ok(triangles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn area(ring: &[Point2], tris: &[[u32; 3]]) -> f64 {
        tris.iter()
            .map(|t| cross(ring[t[0] as usize], ring[t[1] as usize], ring[t[2] as usize]) / 2.0)
            .sum()
    }

    fn pts(coords: &[(f64, f64)]) -> Vec<Point2> {
        coords.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    /// Closed outline through `corners` with every edge split into pieces
    /// no longer than `step`, the way a hand-drawn stroke samples it.
    fn resample(corners: &[(f64, f64)], step: f64) -> Vec<Point2> {
        let corners = pts(corners);
        let n = corners.len();
        let mut ring = Vec::new();
        for i in 0..n {
            let (a, b) = (corners[i], corners[(i + 1) % n]);
            let parts = ((b - a).norm() / step).ceil().max(1.0) as usize;
            ring.extend((0..parts).map(|k| a + (b - a) * (k as f64 / parts as f64)));
        }
        ring
    }

    /// R - 2 non-inverted triangles that add up to the ring's area.
    fn assert_covers(ring: &[Point2], tris: &[[u32; 3]]) {
        assert_eq!(tris.len(), ring.len() - 2);
        let twice: Vec<f64> = tris
            .iter()
            .map(|t| cross(ring[t[0] as usize], ring[t[1] as usize], ring[t[2] as usize]))
            .collect();
        assert!(twice.iter().all(|&a| a >= -1e-9), "inverted triangle");
        let covered: f64 = twice.iter().map(|a| a.abs()).sum();
        assert_relative_eq!(covered, twice_signed_area(ring), max_relative = 1e-9);
    }

    fn star(points: usize, outer: f64, inner: f64) -> Vec<(f64, f64)> {
        (0..2 * points)
            .map(|i| {
                let r = if i % 2 == 0 { outer } else { inner };
                let a = std::f64::consts::PI * i as f64 / points as f64;
                (r * a.cos(), r * a.sin())
            })
            .collect()
    }

    #[test]
    fn test_square() {
        let ring = pts(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
        let tris = triangulate_ring(&ring).unwrap();
        assert_eq!(tris.len(), 2);
        assert_relative_eq!(area(&ring, &tris), 16.0);
    }

    #[test]
    fn test_concave_l_shape() {
        let ring = pts(&[
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 4.0),
            (4.0, 4.0),
            (4.0, 10.0),
            (0.0, 10.0),
        ]);
        let tris = triangulate_ring(&ring).unwrap();
        assert_eq!(tris.len(), 4);
        assert_relative_eq!(area(&ring, &tris), 64.0);
        for t in &tris {
            assert!(cross(ring[t[0] as usize], ring[t[1] as usize], ring[t[2] as usize]) > 0.0);
        }
    }

    #[test]
    fn test_collinear_points_are_clipped() {
        let ring = pts(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let tris = triangulate_ring(&ring).unwrap();
        assert_eq!(tris.len(), 3);
        assert_relative_eq!(area(&ring, &tris), 100.0);
    }

    #[test]
    fn test_long_collinear_side_keeps_count() {
        // Rectangle whose left side was bridged with evenly spaced samples.
        let mut coords = vec![(0.0, 0.0), (60.0, 0.0), (60.0, 60.0), (0.0, 60.0)];
        coords.extend((1..12).rev().map(|i| (0.0, 5.0 * i as f64)));
        let ring = pts(&coords);
        let tris = triangulate_ring(&ring).unwrap();
        assert_eq!(tris.len(), ring.len() - 2);
        assert_relative_eq!(area(&ring, &tris), 3600.0);
    }

    #[test]
    fn test_diagonal_through_reflex_vertex() {
        // The diagonal (0, 10)-(10, 0) of corner (0, 0) runs through the
        // reflex vertex (5, 5), so that corner is not an ear.
        let ring = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (5.0, 5.0), (0.0, 10.0)]);
        let tris = triangulate_ring(&ring).unwrap();
        assert_covers(&ring, &tris);
        assert_relative_eq!(area(&ring, &tris), 75.0);
    }

    #[test]
    fn test_sampled_star() {
        let ring = resample(&star(5, 50.0, 20.0), 2.5);
        assert!(ring.len() > 100);
        let tris = triangulate_ring(&ring).unwrap();
        assert_covers(&ring, &tris);
    }

    #[test]
    fn test_sampled_spiral() {
        let corners = [
            (0.0, 0.0),
            (20.0, 0.0),
            (20.0, 20.0),
            (0.0, 20.0),
            (0.0, 8.0),
            (12.0, 8.0),
            (12.0, 12.0),
            (4.0, 12.0),
            (4.0, 16.0),
            (16.0, 16.0),
            (16.0, 4.0),
            (0.0, 4.0),
        ];
        let ring = resample(&corners, 1.0);
        let tris = triangulate_ring(&ring).unwrap();
        assert_covers(&ring, &tris);
        // 400 minus the 4-wide channel winding in from the left edge.
        assert_relative_eq!(
            area(&ring, &tris),
            400.0 - 16.0 * 4.0 - 4.0 * 4.0 - 12.0 * 4.0,
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_sampled_comb() {
        let mut corners = vec![(0.0, 0.0), (50.0, 0.0)];
        for tooth in (0..5).rev() {
            let x = 10.0 * tooth as f64;
            corners.extend([(x + 10.0, 30.0), (x + 5.0, 30.0), (x + 5.0, 10.0), (x, 10.0)]);
        }
        let ring = resample(&corners, 2.5);
        let tris = triangulate_ring(&ring).unwrap();
        assert_covers(&ring, &tris);
        assert_relative_eq!(
            area(&ring, &tris),
            50.0 * 10.0 + 5.0 * 5.0 * 20.0,
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_sampled_circle() {
        let ring: Vec<Point2> = (0..3000)
            .map(|i| {
                let a = std::f64::consts::TAU * i as f64 / 3000.0;
                Point2::new(100.0 * a.cos(), 100.0 * a.sin())
            })
            .collect();
        let tris = triangulate_ring(&ring).unwrap();
        assert_covers(&ring, &tris);
    }

    #[test]
    fn test_clockwise_ring_is_rejected() {
        let ring = pts(&[(0.0, 0.0), (0.0, 4.0), (4.0, 4.0), (4.0, 0.0)]);
        assert_eq!(triangulate_ring(&ring), Err(MeshError::TriangulationFailed));
    }

    #[test]
    fn test_self_intersecting_ring_is_rejected() {
        // Bow tie: the two halves cancel out.
        let ring = pts(&[(0.0, 0.0), (4.0, 4.0), (4.0, 0.0), (0.0, 4.0), (-1.0, 2.0)]);
        assert!(triangulate_ring(&ring).is_err());
    }

    #[test]
    fn test_degenerate_input() {
        let flat = pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        assert_eq!(triangulate_ring(&flat), Err(MeshError::TriangulationFailed));
        assert!(triangulate_ring(&flat[..2]).is_err());
    }
}
