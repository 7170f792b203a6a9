//! Stitching curve segments into one C⁰/C¹-continuous composite curve.
//!
//! Joining never edits its inputs: the corrected control points and knots
//! belong to the returned [`CompositeCurve`], which also keeps the original
//! segments.

use crv_core::{CurveError, Result, Tolerance};
use crv_math::{are_parallel, points_eq, Point2, Vector2};
use serde::Serialize;
use tracing::{debug, trace};

use crate::curve::{BSplineCurve, BezierCurve, ControlPolygon, Curve2, CurveSegment};
use crate::nurbs::knot::KnotVector;

/// Continuity class observed at a junction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Continuity {
    /// The two sides do not meet.
    None,
    /// Positions agree.
    C0,
    /// Positions agree and tangent directions are parallel.
    C1,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
enum Merged {
    BSpline(BSplineCurve),
    Bezier(Vec<BezierCurve>),
}

/// Segments joined into one curve, plus the merged representation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeCurve {
    sources: Vec<CurveSegment>,
    merged: Merged,
    joins: Vec<f64>,
}

impl CompositeCurve {
    /// The segments as they were passed in, before any correction.
    pub fn sources(&self) -> &[CurveSegment] {
        &self.sources
    }

    /// The merged control polygon. For a Bézier chain the shared endpoint of
    /// consecutive segments appears once.
    pub fn control_polygon(&self) -> ControlPolygon {
        match &self.merged {
            Merged::BSpline(curve) => curve.control_points().clone(),
            Merged::Bezier(segments) => {
                let mut points: Vec<Point2> = Vec::new();
                for (i, segment) in segments.iter().enumerate() {
                    let skip = usize::from(i > 0);
                    points.extend_from_slice(&segment.control_points()[skip..]);
                }
                points.into()
            }
        }
    }

    /// The merged knot vector; `None` for a Bézier chain.
    pub fn knots(&self) -> Option<&KnotVector> {
        self.as_bspline().map(BSplineCurve::knots)
    }

    pub fn as_bspline(&self) -> Option<&BSplineCurve> {
        match &self.merged {
            Merged::BSpline(curve) => Some(curve),
            Merged::Bezier(_) => None,
        }
    }

    /// The corrected Bézier segments; `None` for a merged B-spline.
    pub fn bezier_segments(&self) -> Option<&[BezierCurve]> {
        match &self.merged {
            Merged::BSpline(_) => None,
            Merged::Bezier(segments) => Some(segments),
        }
    }

    /// Parameters of the junctions, in order.
    pub fn join_parameters(&self) -> &[f64] {
        &self.joins
    }

    /// Check position and tangent direction on both sides of junction `index`.
    ///
    /// Diagnostic only: the join algorithms enforce continuity by construction.
    pub fn continuity_at(&self, index: usize, tolerance: Tolerance) -> Option<Continuity> {
        let (left_point, left_tangent, right_point, right_tangent) = self.one_sided(index)?;
        if !points_eq(left_point, right_point, tolerance.linear) {
            return Some(Continuity::None);
        }
        let both_flat =
            tolerance.is_zero(left_tangent.length()) && tolerance.is_zero(right_tangent.length());
        if both_flat || are_parallel(left_tangent, right_tangent, tolerance.angular) {
            Some(Continuity::C1)
        } else {
            Some(Continuity::C0)
        }
    }

    fn one_sided(&self, index: usize) -> Option<(Point2, Vector2, Point2, Vector2)> {
        let u = *self.joins.get(index)?;
        match &self.merged {
            Merged::BSpline(curve) => Some((
                curve.point_before(u),
                curve.tangent_before(u),
                curve.point_at(u),
                curve.tangent_at(u),
            )),
            Merged::Bezier(segments) => {
                let left = &segments[index];
                let right = &segments[index + 1];
                Some((
                    left.point_at(1.0),
                    left.tangent_at(1.0),
                    right.point_at(0.0),
                    right.tangent_at(0.0),
                ))
            }
        }
    }

    /// Map a chain parameter to (segment index, local parameter).
    fn locate(segments: &[BezierCurve], t: f64) -> (usize, f64) {
        let last = segments.len() - 1;
        let t = t.clamp(0.0, segments.len() as f64);
        let index = (t.floor() as usize).min(last);
        (index, t - index as f64)
    }
}

impl Curve2 for CompositeCurve {
    fn point_at(&self, t: f64) -> Point2 {
        match &self.merged {
            Merged::BSpline(curve) => curve.point_at(t),
            Merged::Bezier(segments) => {
                let (i, local) = Self::locate(segments, t);
                segments[i].point_at(local)
            }
        }
    }

    fn tangent_at(&self, t: f64) -> Vector2 {
        match &self.merged {
            Merged::BSpline(curve) => curve.tangent_at(t),
            Merged::Bezier(segments) => {
                let (i, local) = Self::locate(segments, t);
                segments[i].tangent_at(local)
            }
        }
    }

    /// A Bézier chain of `m` segments runs over `[0, m]`, segment `i` on `[i, i + 1]`.
    fn domain(&self) -> (f64, f64) {
        match &self.merged {
            Merged::BSpline(curve) => curve.domain(),
            Merged::Bezier(segments) => (0.0, segments.len() as f64),
        }
    }
}

/// Merge two B-spline segments into one curve that is C⁰ and C¹ at the junction.
///
/// B's first control point is moved onto A's last, and B's second control
/// point becomes the reflection of A's penultimate point through the junction.
/// The control points are concatenated as `A ++ B[1..]` and the knots as
/// `A[..len - k] ++ (B + A.last)[k - 1..]`.
///
/// The reflection gives exact C¹ only when the knot spacing is uniform on both
/// sides of the junction; otherwise the tangents are parallel but may differ
/// in magnitude. The knot concatenation only has the required
/// `control points + k + 1` length for cubic segments; other degrees fail
/// with `InconsistentKnotVector`.
pub fn join_bspline(a: &BSplineCurve, b: &BSplineCurve) -> Result<CompositeCurve> {
    let degree = a.degree();
    if b.degree() != degree {
        return Err(CurveError::DegreeMismatch {
            left: degree,
            right: b.degree(),
        });
    }
    if degree == 0 {
        return Err(CurveError::InvalidDegree {
            degree,
            points: a.control_points().len(),
        });
    }

    let p = a.control_points();
    let mut q = b.control_points().to_vec();
    let junction = p[p.len() - 1];

    // C0: B starts where A ends
    if !points_eq(q[0], junction, Tolerance::default().linear) {
        debug!(from = ?q[0], to = ?junction, "moving first control point of joined B-spline");
    }
    q[0] = junction;
    // C1: continue A's last leg into B
    q[1] = 2.0 * q[0] - p[p.len() - 2];

    let points: Vec<Point2> = p.iter().chain(&q[1..]).copied().collect();

    let u = a.knots();
    let offset = u.last().unwrap_or(0.0);
    let v = b.knots().shifted(offset);
    let knots: Vec<f64> = u[..u.len() - degree]
        .iter()
        .chain(&v[degree - 1..])
        .copied()
        .collect();

    let expected = points.len() + degree + 1;
    if knots.len() != expected {
        return Err(CurveError::InconsistentKnotVector {
            expected,
            actual: knots.len(),
        });
    }

    let (_, join) = a.domain();
    let merged = BSplineCurve::new(degree, KnotVector::from_vec(knots)?, points.into())?;
    trace!(
        control_points = merged.control_points().len(),
        knots = merged.knots().len(),
        join,
        "joined B-spline segments"
    );

    Ok(CompositeCurve {
        sources: vec![a.clone().into(), b.clone().into()],
        merged: Merged::BSpline(merged),
        joins: vec![join],
    })
}

/// Join two Bézier segments; see [`join_bezier`].
pub fn join_bezier_pair(a: &BezierCurve, b: &BezierCurve) -> Result<CompositeCurve> {
    join_bezier(&[a.clone(), b.clone()])
}

/// Chain Bézier segments with C⁰ and C¹ continuity at every internal junction.
///
/// Junctions are processed in order. At each one the previous segment's last
/// point moves onto the next segment's first point, then the next segment's
/// second point is placed at `shared + (last - second_to_last)` of the
/// previous segment. A later junction therefore sees the earlier correction.
///
/// Tangent magnitudes match only between segments of equal degree. Interior
/// segments need at least three control points so that the two corrections
/// touching them do not overwrite each other.
pub fn join_bezier(segments: &[BezierCurve]) -> Result<CompositeCurve> {
    if segments.is_empty() {
        return Err(CurveError::DegenerateControlPolygon {
            required: 2,
            actual: 0,
        });
    }
    let interior = segments.len().saturating_sub(1);
    for segment in segments.iter().take(interior).skip(1) {
        segment.control_points().require(3)?;
    }

    let mut chain: Vec<Vec<Point2>> = segments
        .iter()
        .map(|s| s.control_points().to_vec())
        .collect();

    for i in 1..chain.len() {
        let (done, rest) = chain.split_at_mut(i);
        let prev = &mut done[i - 1];
        let next = &mut rest[0];

        let shared = next[0];
        let last = prev.len() - 1;
        if !points_eq(prev[last], shared, Tolerance::default().linear) {
            debug!(
                junction = i,
                from = ?prev[last],
                to = ?shared,
                "moving end point of Bezier segment"
            );
        }
        prev[last] = shared;
        next[1] = shared + (prev[last] - prev[last - 1]);
    }

    let merged = chain
        .into_iter()
        .map(|points| BezierCurve::new(points.into()))
        .collect::<Result<Vec<_>>>()?;
    trace!(segments = merged.len(), "joined Bezier chain");

    Ok(CompositeCurve {
        sources: segments.iter().cloned().map(CurveSegment::from).collect(),
        joins: (1..merged.len()).map(|i| i as f64).collect(),
        merged: Merged::Bezier(merged),
    })
}
