//! A single independently evaluable curve piece of either family.

use crv_core::traits::Validate;
use crv_core::Result;
use crv_math::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use super::{BSplineCurve, BezierCurve, ControlPolygon, Curve2};
use crate::nurbs::knot::KnotVector;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "curve", rename_all = "snake_case")]
pub enum CurveSegment {
    BSpline(BSplineCurve),
    Bezier(BezierCurve),
}

impl CurveSegment {
    pub fn control_points(&self) -> &ControlPolygon {
        match self {
            Self::BSpline(c) => c.control_points(),
            Self::Bezier(c) => c.control_points(),
        }
    }

    pub fn degree(&self) -> usize {
        match self {
            Self::BSpline(c) => c.degree(),
            Self::Bezier(c) => c.degree(),
        }
    }

    /// The knot vector, `None` for the implicit Bernstein basis.
    pub fn knots(&self) -> Option<&KnotVector> {
        match self {
            Self::BSpline(c) => Some(c.knots()),
            Self::Bezier(_) => None,
        }
    }

    pub fn first_point(&self) -> Point2 {
        let (t0, _) = self.domain();
        self.point_at(t0)
    }

    pub fn last_point(&self) -> Point2 {
        let (_, t1) = self.domain();
        self.point_at(t1)
    }
}

impl Validate for CurveSegment {
    fn validate(&self) -> Result<()> {
        match self {
            Self::BSpline(c) => c.validate(),
            Self::Bezier(c) => c.validate(),
        }
    }
}

impl Curve2 for CurveSegment {
    fn point_at(&self, t: f64) -> Point2 {
        match self {
            Self::BSpline(c) => c.point_at(t),
            Self::Bezier(c) => c.point_at(t),
        }
    }

    fn tangent_at(&self, t: f64) -> Vector2 {
        match self {
            Self::BSpline(c) => c.tangent_at(t),
            Self::Bezier(c) => c.tangent_at(t),
        }
    }

    fn domain(&self) -> (f64, f64) {
        match self {
            Self::BSpline(c) => c.domain(),
            Self::Bezier(c) => c.domain(),
        }
    }
}

impl From<BSplineCurve> for CurveSegment {
    fn from(curve: BSplineCurve) -> Self {
        Self::BSpline(curve)
    }
}

impl From<BezierCurve> for CurveSegment {
    fn from(curve: BezierCurve) -> Self {
        Self::Bezier(curve)
    }
}
