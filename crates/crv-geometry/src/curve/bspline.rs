//! B-spline curve.

use crv_core::traits::Validate;
use crv_core::{CurveError, Result};
use crv_math::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use super::{ControlPolygon, Curve2};
use crate::nurbs::basis::BasisStrategy;
use crate::nurbs::deboor;
use crate::nurbs::knot::{KnotKind, KnotVector};

/// A B-spline curve defined by degree, knot vector, and control points.
///
/// Construction checks `knots.len() == control_points.len() + degree + 1`
/// and a non-empty domain; the fields are immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBSpline", into = "RawBSpline")]
pub struct BSplineCurve {
    degree: usize,
    knots: KnotVector,
    control_points: ControlPolygon,
}

impl BSplineCurve {
    pub fn new(degree: usize, knots: KnotVector, control_points: ControlPolygon) -> Result<Self> {
        let curve = Self {
            degree,
            knots,
            control_points,
        };
        curve.validate()?;
        Ok(curve)
    }

    /// Build a curve with a generated knot vector of the given flavor.
    pub fn with_kind(
        degree: usize,
        kind: KnotKind,
        control_points: ControlPolygon,
    ) -> Result<Self> {
        control_points.require(degree + 1)?;
        let knots = KnotVector::build(kind, control_points.len(), degree)?;
        Self::new(degree, knots, control_points)
    }

    pub fn open_uniform(degree: usize, control_points: ControlPolygon) -> Result<Self> {
        Self::with_kind(degree, KnotKind::OpenUniform, control_points)
    }

    pub fn periodic(degree: usize, control_points: ControlPolygon) -> Result<Self> {
        Self::with_kind(degree, KnotKind::Periodic, control_points)
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn knots(&self) -> &KnotVector {
        &self.knots
    }

    pub fn control_points(&self) -> &ControlPolygon {
        &self.control_points
    }

    /// Evaluate at `u` with an explicit basis strategy, failing outside the domain.
    pub fn evaluate_with(&self, strategy: BasisStrategy, u: f64) -> Result<Point2> {
        self.check_parameter(u)?;
        Ok(deboor::curve_point_with(
            strategy,
            self.degree,
            &self.knots,
            &self.control_points,
            u,
        ))
    }

    /// Curve point as the limit from the left of `u` (clamped into the domain).
    pub fn point_before(&self, u: f64) -> Point2 {
        let u = self.clamp(u);
        deboor::curve_point_left(self.degree, &self.knots, &self.control_points, u)
    }

    /// Derivative from the left of `u` (clamped into the domain).
    pub fn tangent_before(&self, u: f64) -> Vector2 {
        let u = self.clamp(u);
        deboor::curve_tangent_left(self.degree, &self.knots, &self.control_points, u)
    }

    fn check_parameter(&self, u: f64) -> Result<()> {
        let (min, max) = self.domain();
        if !(min..=max).contains(&u) {
            return Err(CurveError::ParameterOutOfDomain { value: u, min, max });
        }
        Ok(())
    }

    fn clamp(&self, u: f64) -> f64 {
        let (min, max) = self.domain();
        u.clamp(min, max)
    }
}

impl Validate for BSplineCurve {
    fn validate(&self) -> Result<()> {
        self.control_points.require(self.degree + 1)?;
        self.knots.check_len(self.control_points.len(), self.degree)?;
        let (min, max) = self.knots.domain(self.degree).ok_or(
            CurveError::InconsistentKnotVector {
                expected: self.control_points.len() + self.degree + 1,
                actual: self.knots.len(),
            },
        )?;
        if min >= max {
            return Err(CurveError::EmptyDomain(min));
        }
        Ok(())
    }
}

impl Curve2 for BSplineCurve {
    fn point_at(&self, t: f64) -> Point2 {
        deboor::curve_point(self.degree, &self.knots, &self.control_points, self.clamp(t))
    }

    fn tangent_at(&self, t: f64) -> Vector2 {
        deboor::curve_tangent(self.degree, &self.knots, &self.control_points, self.clamp(t))
    }

    fn domain(&self) -> (f64, f64) {
        let p = self.degree;
        (self.knots[p], self.knots[self.knots.len() - p - 1])
    }
}

#[derive(Serialize, Deserialize)]
struct RawBSpline {
    degree: usize,
    knots: KnotVector,
    control_points: ControlPolygon,
}

impl TryFrom<RawBSpline> for BSplineCurve {
    type Error = CurveError;

    fn try_from(raw: RawBSpline) -> Result<Self> {
        Self::new(raw.degree, raw.knots, raw.control_points)
    }
}

impl From<BSplineCurve> for RawBSpline {
    fn from(curve: BSplineCurve) -> Self {
        Self {
            degree: curve.degree,
            knots: curve.knots,
            control_points: curve.control_points,
        }
    }
}

/// Evaluate `Σ N_{i,k}(u) P_i` for raw control points and knots.
///
/// Fails with `DegenerateControlPolygon`, `InconsistentKnotVector` or
/// `ParameterOutOfDomain` instead of returning a meaningless point.
pub fn evaluate_bspline(
    control_points: &[Point2],
    knots: &[f64],
    k: usize,
    u: f64,
) -> Result<Point2> {
    evaluate_bspline_with(BasisStrategy::default(), control_points, knots, k, u)
}

/// [`evaluate_bspline`] with an explicit basis strategy.
pub fn evaluate_bspline_with(
    strategy: BasisStrategy,
    control_points: &[Point2],
    knots: &[f64],
    k: usize,
    u: f64,
) -> Result<Point2> {
    let curve = BSplineCurve::new(
        k,
        KnotVector::from_vec(knots.to_vec())?,
        ControlPolygon::from(control_points.to_vec()),
    )?;
    curve.evaluate_with(strategy, u)
}
