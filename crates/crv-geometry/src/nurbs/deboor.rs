//! De Boor evaluation of B-spline curve points and tangents.
//!
//! These functions trust their inputs: `knots.len() == control_points.len() + degree + 1`
//! and `t` inside the domain. The checked entry points live in [`crate::curve`].

use crv_math::{DVec2, Point2, Vector2};

use super::basis::{domain_basis, BasisStrategy};
use super::knot::{basis_functions, basis_functions_derivs, find_span, find_span_left};

/// Evaluate a B-spline curve point at parameter `t` using the De Boor algorithm.
pub fn curve_point(degree: usize, knots: &[f64], control_points: &[Point2], t: f64) -> Point2 {
    let n = control_points.len() - 1;
    let span = find_span(degree, knots, n, t);
    blend(degree, knots, control_points, span, t)
}

/// Evaluate a curve point with the given basis strategy.
pub fn curve_point_with(
    strategy: BasisStrategy,
    degree: usize,
    knots: &[f64],
    control_points: &[Point2],
    t: f64,
) -> Point2 {
    match strategy {
        BasisStrategy::Triangular => curve_point(degree, knots, control_points, t),
        BasisStrategy::Recursive => control_points
            .iter()
            .enumerate()
            .fold(DVec2::ZERO, |acc, (i, &p)| {
                acc + domain_basis(i, degree, t, knots) * p
            }),
    }
}

/// Evaluate the curve point as the limit from the left of `t`.
///
/// Equal to [`curve_point`] everywhere the curve is continuous.
pub fn curve_point_left(degree: usize, knots: &[f64], control_points: &[Point2], t: f64) -> Point2 {
    let n = control_points.len() - 1;
    let span = find_span_left(degree, knots, n, t);
    blend(degree, knots, control_points, span, t)
}

fn blend(degree: usize, knots: &[f64], control_points: &[Point2], span: usize, t: f64) -> Point2 {
    let basis = basis_functions(degree, knots, span, t);
    basis
        .iter()
        .zip(&control_points[span - degree..=span])
        .fold(DVec2::ZERO, |acc, (&b, &p)| acc + b * p)
}

/// Evaluate the tangent (first derivative) of a B-spline curve at parameter `t`.
///
/// At interior knots this is the derivative from the right.
pub fn curve_tangent(degree: usize, knots: &[f64], control_points: &[Point2], t: f64) -> Vector2 {
    let n = control_points.len() - 1;
    let span = find_span(degree, knots, n, t);
    blend_derivative(degree, knots, control_points, span, t)
}

/// Evaluate the derivative from the left of `t`.
pub fn curve_tangent_left(
    degree: usize,
    knots: &[f64],
    control_points: &[Point2],
    t: f64,
) -> Vector2 {
    let n = control_points.len() - 1;
    let span = find_span_left(degree, knots, n, t);
    blend_derivative(degree, knots, control_points, span, t)
}

fn blend_derivative(
    degree: usize,
    knots: &[f64],
    control_points: &[Point2],
    span: usize,
    t: f64,
) -> Vector2 {
    let (_, dn) = basis_functions_derivs(degree, knots, span, t);
    dn.iter()
        .zip(&control_points[span - degree..=span])
        .fold(DVec2::ZERO, |acc, (&d, &p)| acc + d * p)
}
