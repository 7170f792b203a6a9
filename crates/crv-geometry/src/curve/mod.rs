//! Curve traits and implementations.

mod bezier;
mod bspline;
mod polygon;
mod segment;

use crv_core::{CurveError, Result};
use crv_math::{Point2, Vector2};

pub use bezier::{de_casteljau_levels, evaluate_bezier, evaluate_bezier_bernstein, BezierCurve};
pub use bspline::{evaluate_bspline, evaluate_bspline_with, BSplineCurve};
pub use polygon::ControlPolygon;
pub use segment::CurveSegment;

/// Trait for parametric curves in the plane.
pub trait Curve2: Send + Sync {
    /// Evaluate the curve at parameter `t`.
    ///
    /// B-spline curves clamp `t` into their domain; Bézier curves extrapolate.
    fn point_at(&self, t: f64) -> Point2;

    /// Evaluate the tangent vector (first derivative) at parameter `t`.
    fn tangent_at(&self, t: f64) -> Vector2;

    /// Return the parameter domain `(t_min, t_max)`.
    fn domain(&self) -> (f64, f64);

    /// Evaluate at `t`, failing when `t` lies outside the domain.
    fn evaluate(&self, t: f64) -> Result<Point2> {
        let (min, max) = self.domain();
        if !(min..=max).contains(&t) {
            return Err(CurveError::ParameterOutOfDomain { value: t, min, max });
        }
        Ok(self.point_at(t))
    }

    /// Whether the curve is closed (start == end).
    fn is_closed(&self) -> bool {
        let (t0, t1) = self.domain();
        self.point_at(t0) == self.point_at(t1)
    }
}
