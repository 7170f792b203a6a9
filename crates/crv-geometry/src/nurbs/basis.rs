//! Basis functions: Cox–de Boor recursion for B-splines and Bernstein
//! polynomials for Bézier curves.

use serde::{Deserialize, Serialize};

use super::knot::{basis_functions, find_span, last_nondegenerate_span};

/// How B-spline basis values are computed.
///
/// Both strategies produce the same numbers within floating-point tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BasisStrategy {
    /// Direct Cox–de Boor recursion; exponential in the degree.
    Recursive,
    /// Triangular table over the non-vanishing functions of one span.
    #[default]
    Triangular,
}

/// Evaluate the B-spline basis function `N_{i,k}(u)` by Cox–de Boor recursion.
///
/// The zero-degree functions use half-open intervals `[t_i, t_{i+1})`, except
/// that `u` equal to the final knot belongs to the last non-degenerate
/// interval, closed on both ends. Without that rule every basis function
/// vanishes at the right end of a clamped domain.
///
/// Returns `0.0` when `i + k + 1` is past the end of `knots`.
pub fn b_spline_basis(i: usize, k: usize, u: f64, knots: &[f64]) -> f64 {
    if i + k + 1 >= knots.len() {
        return 0.0;
    }
    let closing_span = match knots.last() {
        Some(&last) if u == last => last_nondegenerate_span(knots),
        _ => None,
    };
    cox_de_boor(i, k, u, knots, closing_span)
}

/// `N_{i,k}(u)` for `u` inside the curve domain `[t_k, t_n]`.
///
/// Unlike [`b_spline_basis`], `u == t_n` takes the piece to the left of
/// `t_n` even when knots follow it, matching the triangular table.
pub(crate) fn domain_basis(i: usize, k: usize, u: f64, knots: &[f64]) -> f64 {
    if i + k + 1 >= knots.len() {
        return 0.0;
    }
    cox_de_boor(i, k, u, knots, domain_closing_span(k, u, knots))
}

/// The last non-degenerate span before `t_n` when `u` sits exactly on `t_n`.
fn domain_closing_span(k: usize, u: f64, knots: &[f64]) -> Option<usize> {
    let n = knots.len().checked_sub(k + 1)?;
    if n == 0 || u != knots[n] {
        return None;
    }
    last_nondegenerate_span(&knots[..=n])
}

fn cox_de_boor(i: usize, k: usize, u: f64, knots: &[f64], closing_span: Option<usize>) -> f64 {
    if k == 0 {
        // A closing span replaces the half-open rule at that parameter
        let inside = match closing_span {
            Some(span) => span == i,
            None => knots[i] <= u && u < knots[i + 1],
        };
        return if inside { 1.0 } else { 0.0 };
    }

    // Zero-length spans carry no weight
    let span1 = knots[i + k] - knots[i];
    let term1 = if span1 == 0.0 { 0.0 } else { (u - knots[i]) / span1 };
    let span2 = knots[i + k + 1] - knots[i + 1];
    let term2 = if span2 == 0.0 { 0.0 } else { (knots[i + k + 1] - u) / span2 };

    let mut value = 0.0;
    if term1 != 0.0 {
        value += term1 * cox_de_boor(i, k - 1, u, knots, closing_span);
    }
    if term2 != 0.0 {
        value += term2 * cox_de_boor(i + 1, k - 1, u, knots, closing_span);
    }
    value
}

/// All `n` basis values `N_{0,k}(u) .. N_{n-1,k}(u)` for a knot vector of
/// length `n + k + 1`.
///
/// Outside the curve domain `[t_k, t_n]` every value is zero. Returns an
/// empty vector when the knot vector is too short for degree `k`.
pub fn basis_values(strategy: BasisStrategy, k: usize, u: f64, knots: &[f64]) -> Vec<f64> {
    let Some(n) = knots.len().checked_sub(k + 1) else {
        return Vec::new();
    };
    let mut values = vec![0.0; n];
    if n <= k || u.is_nan() || u < knots[k] || u > knots[n] {
        return values;
    }

    match strategy {
        BasisStrategy::Recursive => {
            for (i, v) in values.iter_mut().enumerate() {
                *v = domain_basis(i, k, u, knots);
            }
        }
        BasisStrategy::Triangular => {
            let span = find_span(k, knots, n - 1, u);
            let local = basis_functions(k, knots, span, u);
            values[span - k..=span].copy_from_slice(&local);
        }
    }
    values
}

/// Binomial coefficient `C(n, i)` as a float.
pub fn binomial(n: usize, i: usize) -> f64 {
    if i > n {
        return 0.0;
    }
    let i = i.min(n - i);
    (0..i).fold(1.0, |acc, j| acc * (n - j) as f64 / (j + 1) as f64)
}

/// Bernstein polynomial `B_{i,n}(t) = C(n, i) t^i (1 - t)^(n - i)`.
///
/// `t` outside `[0, 1]` extrapolates; `i > n` yields zero.
pub fn bernstein_basis(n: usize, i: usize, t: f64) -> f64 {
    if i > n {
        return 0.0;
    }
    binomial(n, i) * t.powi(i as i32) * (1.0 - t).powi((n - i) as i32)
}

/// All `n + 1` Bernstein values of degree `n` at `t`, via the triangular
/// recurrence `B_{i,n} = (1 - t) B_{i,n-1} + t B_{i-1,n-1}`.
pub fn bernstein_values(n: usize, t: f64) -> Vec<f64> {
    let mut b = vec![0.0; n + 1];
    b[0] = 1.0;
    let s = 1.0 - t;
    for j in 1..=n {
        let mut saved = 0.0;
        for value in b.iter_mut().take(j) {
            let temp = *value;
            *value = saved + s * temp;
            saved = t * temp;
        }
        b[j] = saved;
    }
    b
}
