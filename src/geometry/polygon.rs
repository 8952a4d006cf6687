//! Polygon and segment predicates.
//!
//! # Algorithms
//!
//! - Point-in-polygon: horizontal ray casting, counting edge crossings to the
//!   right of the point. An odd count means inside. O(vertices).
//! - Segment intersection: signs of the four orientation determinants, with
//!   collinear on-segment fallbacks for touching and overlapping cases.
//!
//! # Reference
//!
//! O'Rourke, J. (1998). *Computational Geometry in C*, 2nd ed., Ch. 1 and 7.

use super::Point;

/// Returns `true` if `point` lies strictly inside `polygon`.
///
/// The polygon is given as an ordered vertex list and is closed implicitly
/// (last vertex connects back to the first). Points exactly on the boundary
/// may report either value. Polygons with fewer than three vertices contain
/// nothing.
///
/// # Examples
///
/// ```
/// use u_delivery::geometry::{point_in_polygon, Point};
///
/// let square = [
///     Point::new(0.0, 0.0),
///     Point::new(10.0, 0.0),
///     Point::new(10.0, 10.0),
///     Point::new(0.0, 10.0),
/// ];
/// assert!(point_in_polygon(Point::new(5.0, 5.0), &square));
/// assert!(!point_in_polygon(Point::new(15.0, 5.0), &square));
/// ```
pub fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }
    }
    inside
}

/// Returns `true` if segment `p1-p2` and segment `q1-q2` share at least one point.
///
/// # Examples
///
/// ```
/// use u_delivery::geometry::{segments_intersect, Point};
///
/// let hit = segments_intersect(
///     Point::new(0.0, 0.0),
///     Point::new(2.0, 2.0),
///     Point::new(0.0, 2.0),
///     Point::new(2.0, 0.0),
/// );
/// assert!(hit);
/// ```
pub fn segments_intersect(p1: Point, p2: Point, q1: Point, q2: Point) -> bool {
    let o1 = orientation(p1, p2, q1);
    let o2 = orientation(p1, p2, q2);
    let o3 = orientation(q1, q2, p1);
    let o4 = orientation(q1, q2, p2);

    if o1 * o2 < 0.0 && o3 * o4 < 0.0 {
        return true;
    }

    // Collinear cases: an endpoint lying on the other segment.
    (o1 == 0.0 && on_segment(p1, q1, p2))
        || (o2 == 0.0 && on_segment(p1, q2, p2))
        || (o3 == 0.0 && on_segment(q1, p1, q2))
        || (o4 == 0.0 && on_segment(q1, p2, q2))
}

/// Returns `true` if the straight segment `a-b` enters `polygon`.
///
/// Either endpoint lying inside the polygon counts, as does any intersection
/// with a polygon edge (including touching).
///
/// # Examples
///
/// ```
/// use u_delivery::geometry::{segment_crosses_polygon, Point};
///
/// let zone = [
///     Point::new(4.0, -1.0),
///     Point::new(6.0, -1.0),
///     Point::new(6.0, 1.0),
///     Point::new(4.0, 1.0),
/// ];
/// assert!(segment_crosses_polygon(Point::new(0.0, 0.0), Point::new(10.0, 0.0), &zone));
/// assert!(!segment_crosses_polygon(Point::new(0.0, 5.0), Point::new(10.0, 5.0), &zone));
/// ```
pub fn segment_crosses_polygon(a: Point, b: Point, polygon: &[Point]) -> bool {
    if point_in_polygon(a, polygon) || point_in_polygon(b, polygon) {
        return true;
    }
    let n = polygon.len();
    (0..n).any(|i| segments_intersect(a, b, polygon[i], polygon[(i + 1) % n]))
}

/// Orientation determinant of the ordered triple (a, b, c).
///
/// Zero when collinear; the sign distinguishes clockwise from
/// counter-clockwise turns.
fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b.y - a.y) * (c.x - b.x) - (b.x - a.x) * (c.y - b.y)
}

/// Whether `b` lies within the bounding box of `a` and `c`.
fn on_segment(a: Point, b: Point, c: Point) -> bool {
    a.x.min(c.x) <= b.x && b.x <= a.x.max(c.x) && a.y.min(c.y) <= b.y && b.y <= a.y.max(c.y)
}
