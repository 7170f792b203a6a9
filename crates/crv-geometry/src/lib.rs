//! CurveLab geometry: Bézier and B-spline curves, sampling, and joining.

pub mod curve;
pub mod join;
pub mod nurbs;
pub mod sample;

pub use curve::{BSplineCurve, BezierCurve, ControlPolygon, Curve2, CurveSegment};
pub use join::{join_bezier, join_bezier_pair, join_bspline, CompositeCurve, Continuity};
pub use sample::{curve_to_polyline, sample_curve, sample_curve_par, Samples};
