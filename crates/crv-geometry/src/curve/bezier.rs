//! Bézier curve, evaluated with De Casteljau's algorithm.

use crv_core::traits::Validate;
use crv_core::{CurveError, Result};
use crv_math::{DVec2, Point2, Vector2};
use serde::{Deserialize, Serialize};

use super::{ControlPolygon, Curve2};
use crate::nurbs::basis::bernstein_values;

/// A Bézier curve of degree `n - 1` over `n >= 2` control points,
/// parameterized over `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ControlPolygon", into = "ControlPolygon")]
pub struct BezierCurve {
    control_points: ControlPolygon,
}

impl BezierCurve {
    pub fn new(control_points: ControlPolygon) -> Result<Self> {
        let curve = Self { control_points };
        curve.validate()?;
        Ok(curve)
    }

    pub fn degree(&self) -> usize {
        self.control_points.len() - 1
    }

    pub fn control_points(&self) -> &ControlPolygon {
        &self.control_points
    }

    /// Control points of the derivative curve, `n (P_{i+1} - P_i)`.
    pub fn hodograph(&self) -> Vec<Vector2> {
        let n = self.degree() as f64;
        self.control_points
            .windows(2)
            .map(|w| n * (w[1] - w[0]))
            .collect()
    }
}

impl Validate for BezierCurve {
    fn validate(&self) -> Result<()> {
        self.control_points.require(2)
    }
}

impl Curve2 for BezierCurve {
    fn point_at(&self, t: f64) -> Point2 {
        de_casteljau(&self.control_points, t)
    }

    fn tangent_at(&self, t: f64) -> Vector2 {
        de_casteljau(&self.hodograph(), t)
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }
}

impl TryFrom<ControlPolygon> for BezierCurve {
    type Error = CurveError;

    fn try_from(control_points: ControlPolygon) -> Result<Self> {
        Self::new(control_points)
    }
}

impl From<BezierCurve> for ControlPolygon {
    fn from(curve: BezierCurve) -> Self {
        curve.control_points
    }
}

fn de_casteljau(points: &[DVec2], t: f64) -> DVec2 {
    let mut work = points.to_vec();
    for level in (1..work.len()).rev() {
        for i in 0..level {
            work[i] = work[i].lerp(work[i + 1], t);
        }
    }
    work.first().copied().unwrap_or(DVec2::ZERO)
}

fn construct(points: &[Point2], t: f64) -> Vec<Vec<Point2>> {
    let mut levels = vec![points.to_vec()];
    while let Some(prev) = levels.last().filter(|l| l.len() > 1) {
        let next = prev.windows(2).map(|w| w[0].lerp(w[1], t)).collect();
        levels.push(next);
    }
    levels
}

fn require_points(points: &[Point2]) -> Result<()> {
    if points.len() < 2 {
        return Err(CurveError::DegenerateControlPolygon {
            required: 2,
            actual: points.len(),
        });
    }
    Ok(())
}

/// Evaluate a Bézier curve at `t` with De Casteljau's algorithm.
///
/// `t` outside `[0, 1]` extrapolates.
pub fn evaluate_bezier(control_points: &[Point2], t: f64) -> Result<Point2> {
    require_points(control_points)?;
    Ok(de_casteljau(control_points, t))
}

/// Evaluate a Bézier curve at `t` as the Bernstein-weighted sum of its control points.
pub fn evaluate_bezier_bernstein(control_points: &[Point2], t: f64) -> Result<Point2> {
    require_points(control_points)?;
    let weights = bernstein_values(control_points.len() - 1, t);
    Ok(weights
        .iter()
        .zip(control_points)
        .fold(DVec2::ZERO, |acc, (&w, &p)| acc + w * p))
}

/// Every level of De Casteljau's construction at `t`: the control points,
/// then each round of linear interpolation, ending with the single curve point.
pub fn de_casteljau_levels(control_points: &[Point2], t: f64) -> Result<Vec<Vec<Point2>>> {
    require_points(control_points)?;
    Ok(construct(control_points, t))
}
