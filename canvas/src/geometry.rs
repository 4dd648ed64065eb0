//! Pure geometry helpers used by hit-testing and animation.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use crate::camera::Point;

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: Point, b: Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Whether `p` lies inside or on the circle at `center` with `radius`.
#[must_use]
pub fn point_in_circle(p: Point, center: Point, radius: f64) -> bool {
    distance(p, center) <= radius
}

/// Whether `p` lies within `threshold` of the segment `a`-`b`.
///
/// Projections falling outside the segment are measured against the nearer
/// endpoint. A degenerate segment behaves like a point.
#[must_use]
pub fn point_near_segment(p: Point, a: Point, b: Point, threshold: f64) -> bool {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return distance(p, a) <= threshold;
    }

    let t = ((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq;
    if t < 0.0 {
        return distance(p, a) <= threshold;
    }
    if t > 1.0 {
        return distance(p, b) <= threshold;
    }

    let perpendicular = ((p.x - a.x) * dy - (p.y - a.y) * dx).abs() / len_sq.sqrt();
    perpendicular <= threshold
}

/// Whether `p` lies inside or on the axis-aligned box with top-left `origin`.
#[must_use]
pub fn point_in_rect(p: Point, origin: Point, width: f64, height: f64) -> bool {
    p.x >= origin.x && p.x <= origin.x + width && p.y >= origin.y && p.y <= origin.y + height
}

/// Linear interpolation from `a` to `b`; `t = 0` yields `a`, `t = 1` yields `b`.
#[must_use]
pub fn lerp_point(a: Point, b: Point, t: f64) -> Point {
    Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}
