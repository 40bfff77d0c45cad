//! Stateless geometric primitives over the integer domain.
//!
//! Orientation-style predicates that feed branching decisions inside
//! the sweep (collinearity, point-in-polygon) are evaluated exactly in
//! `i128`; the `f64` variants mirror the quantities the sweep compares
//! against tolerances.
use std::cmp::Ordering;

use itertools::Itertools;

use crate::{
    point::{Path64, Point64, XY},
    rect::Rect64,
};

/// Result of a point-in-polygon query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointInPolygon {
    Inside,
    Outside,
    On,
}

/// Cross product of `pt2 - pt1` and `pt3 - pt2`.
///
/// Positive when `pt1 -> pt2 -> pt3` turns counter-clockwise in a
/// y-up frame.
#[inline]
pub fn cross_product(pt1: Point64, pt2: Point64, pt3: Point64) -> f64 {
    (pt2.x - pt1.x) as f64 * (pt3.y - pt2.y) as f64
        - (pt2.y - pt1.y) as f64 * (pt3.x - pt2.x) as f64
}

/// Exact sign of [`cross_product`].
#[inline]
pub fn cross_product_sign(pt1: Point64, pt2: Point64, pt3: Point64) -> Ordering {
    let a = (pt2.x - pt1.x) as i128 * (pt3.y - pt2.y) as i128;
    let b = (pt2.y - pt1.y) as i128 * (pt3.x - pt2.x) as i128;
    a.cmp(&b)
}

/// Dot product of `pt2 - pt1` and `pt3 - pt2`; negative when the path
/// doubles back at `pt2`.
#[inline]
pub fn dot_product(pt1: Point64, pt2: Point64, pt3: Point64) -> f64 {
    (pt2.x - pt1.x) as f64 * (pt3.x - pt2.x) as f64
        + (pt2.y - pt1.y) as f64 * (pt3.y - pt2.y) as f64
}

/// Exact test whether `pt1`, `shared` and `pt2` lie on one line.
#[inline]
pub fn is_collinear(pt1: Point64, shared: Point64, pt2: Point64) -> bool {
    cross_product_sign(pt1, shared, pt2) == Ordering::Equal
}

/// Squared perpendicular distance of `pt` from the infinite line
/// through `line1` and `line2`.
pub fn perpendicular_distance_sqrd(pt: Point64, line1: Point64, line2: Point64) -> f64 {
    let a = (pt.x - line1.x) as f64;
    let b = (pt.y - line1.y) as f64;
    let c = (line2.x - line1.x) as f64;
    let d = (line2.y - line1.y) as f64;
    if c == 0. && d == 0. {
        return 0.;
    }
    let cross = a * d - c * b;
    cross * cross / (c * c + d * d)
}

/// Intersection of the lines through `ln1a, ln1b` and `ln2a, ln2b`,
/// clamped onto the first segment.
///
/// Returns `None` for parallel lines.
pub fn segment_intersect_point(
    ln1a: Point64,
    ln1b: Point64,
    ln2a: Point64,
    ln2b: Point64,
) -> Option<Point64> {
    let dx1 = (ln1b.x - ln1a.x) as f64;
    let dy1 = (ln1b.y - ln1a.y) as f64;
    let dx2 = (ln2b.x - ln2a.x) as f64;
    let dy2 = (ln2b.y - ln2a.y) as f64;
    let det = dy1 * dx2 - dy2 * dx1;
    if det == 0. {
        return None;
    }
    let t = ((ln1a.x - ln2a.x) as f64 * dy2 - (ln1a.y - ln2a.y) as f64 * dx2) / det;
    Some(if t <= 0. {
        ln1a
    } else if t >= 1. {
        ln1b
    } else {
        Point64::new(
            ln1a.x + (t * dx1).round() as i64,
            ln1a.y + (t * dy1).round() as i64,
        )
    })
}

/// Checks whether two segments cross.
///
/// When `inclusive` is `false` only proper crossings count; otherwise
/// touching end points count as well (but collinear overlaps do not).
pub fn segments_intersect(
    seg1a: Point64,
    seg1b: Point64,
    seg2a: Point64,
    seg2b: Point64,
    inclusive: bool,
) -> bool {
    let sign = |o: Ordering| match o {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    };
    let res1 = sign(cross_product_sign(seg1a, seg2a, seg2b));
    let res2 = sign(cross_product_sign(seg1b, seg2a, seg2b));
    let res3 = sign(cross_product_sign(seg2a, seg1a, seg1b));
    let res4 = sign(cross_product_sign(seg2b, seg1a, seg1b));
    if inclusive {
        if res1 * res2 > 0 || res3 * res4 > 0 {
            return false;
        }
        res1 != 0 || res2 != 0 || res3 != 0 || res4 != 0
    } else {
        res1 * res2 < 0 && res3 * res4 < 0
    }
}

/// Point on segment `seg1, seg2` closest to `off_pt`.
pub fn closest_point_on_segment(off_pt: Point64, seg1: Point64, seg2: Point64) -> Point64 {
    if seg1 == seg2 {
        return seg1;
    }
    let dx = (seg2.x - seg1.x) as f64;
    let dy = (seg2.y - seg1.y) as f64;
    let q = ((off_pt.x - seg1.x) as f64 * dx + (off_pt.y - seg1.y) as f64 * dy)
        / (dx * dx + dy * dy);
    let q = q.clamp(0., 1.);
    Point64::new(
        seg1.x + (q * dx).round() as i64,
        seg1.y + (q * dy).round() as i64,
    )
}

#[inline]
fn on_segment(pt: Point64, a: Point64, b: Point64) -> bool {
    is_collinear(a, b, pt)
        && pt.x >= a.x.min(b.x)
        && pt.x <= a.x.max(b.x)
        && pt.y >= a.y.min(b.y)
        && pt.y <= a.y.max(b.y)
}

/// Crossing-number point-in-polygon test over the closed ring formed by
/// consecutive `edges`.
pub(crate) fn point_in_edges<I>(pt: Point64, edges: I) -> PointInPolygon
where
    I: IntoIterator<Item = (Point64, Point64)>,
{
    let mut inside = false;
    for (a, b) in edges {
        if on_segment(pt, a, b) {
            return PointInPolygon::On;
        }
        if (a.y > pt.y) != (b.y > pt.y) {
            // The edge crosses the horizontal through `pt`; count it if
            // the crossing lies right of `pt`.
            let left_of_edge = cross_product_sign(a, b, pt) == Ordering::Greater;
            if left_of_edge == (b.y > a.y) {
                inside = !inside;
            }
        }
    }
    if inside {
        PointInPolygon::Inside
    } else {
        PointInPolygon::Outside
    }
}

/// Locate `pt` relative to the closed `polygon`.
pub fn point_in_polygon(pt: Point64, polygon: &[Point64]) -> PointInPolygon {
    if polygon.len() < 3 {
        return PointInPolygon::Outside;
    }
    point_in_edges(pt, polygon.iter().copied().circular_tuple_windows())
}

/// Signed area of a closed path (shoelace formula).
///
/// Positive for counter-clockwise rings in a y-up frame.
pub fn area<P: XY>(path: &[P]) -> f64 {
    if path.len() < 3 {
        return 0.;
    }
    let twice: f64 = path
        .iter()
        .circular_tuple_windows()
        .map(|(prev, curr)| (prev.y() + curr.y()) * (prev.x() - curr.x()))
        .sum();
    twice * 0.5
}

/// Sum of the signed areas of all `paths`.
pub fn area_of_paths<P: XY>(paths: &[Vec<P>]) -> f64 {
    paths.iter().map(|p| area(p)).sum()
}

/// Checks if the path has a positive orientation.
#[inline]
pub fn is_positive<P: XY>(path: &[P]) -> bool {
    area(path) >= 0.
}

/// Bounding rectangle of a path; the default (empty) rectangle for an
/// empty path.
pub fn bounds(path: &[Point64]) -> Rect64 {
    if path.is_empty() {
        return Rect64::default();
    }
    let mut rec = Rect64::inverted();
    path.iter().for_each(|&pt| rec.grow(pt));
    rec
}

/// Bounding rectangle of all points of `paths`.
pub fn bounds_of_paths(paths: &[Path64]) -> Rect64 {
    let mut rec = Rect64::inverted();
    paths.iter().flatten().for_each(|&pt| rec.grow(pt));
    if rec.left > rec.right {
        Rect64::default()
    } else {
        rec
    }
}

/// Points that differ by less than 2 units on both axes.
#[inline]
pub(crate) fn pts_really_close(pt1: Point64, pt2: Point64) -> bool {
    (pt1.x - pt2.x).abs() < 2 && (pt1.y - pt2.y).abs() < 2
}

/// Reverse the vertex order (and hence orientation) of a path.
pub fn reverse_path<P: Clone>(path: &[P]) -> Vec<P> {
    path.iter().rev().cloned().collect()
}

/// Reverse every path in `paths`.
pub fn reverse_paths<P: Clone>(paths: &[Vec<P>]) -> Vec<Vec<P>> {
    paths.iter().map(|p| reverse_path(p)).collect()
}
