//! Comparisons between 2D points and directions.

use crate::{Point2, Vector2};

/// Whether two points coincide within `tolerance` (Euclidean distance).
pub fn points_eq(a: Point2, b: Point2, tolerance: f64) -> bool {
    a.distance(b) <= tolerance
}

/// Unsigned angle between two vectors in radians, `0.0` if either is zero.
pub fn angle_between(a: Vector2, b: Vector2) -> f64 {
    let la = a.length();
    let lb = b.length();
    if la == 0.0 || lb == 0.0 {
        return 0.0;
    }
    // atan2 keeps precision for nearly parallel vectors where acos does not
    a.perp_dot(b).abs().atan2(a.dot(b))
}

/// Whether `a` and `b` point the same way within `angular` radians.
///
/// Opposite directions are not parallel here: a tangent flip at a join is a cusp.
pub fn are_parallel(a: Vector2, b: Vector2, angular: f64) -> bool {
    a.dot(b) > 0.0 && angle_between(a, b) <= angular
}
