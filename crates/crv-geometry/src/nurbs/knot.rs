//! Knot vectors: construction, validation, span lookup and the triangular
//! basis-function table.

use crv_core::{CurveError, Result};
use serde::{Deserialize, Serialize};

/// Flavor of a generated knot vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnotKind {
    /// Clamped: multiplicity `k + 1` at both ends, the curve interpolates
    /// its first and last control points.
    OpenUniform,
    /// Unit-spaced with `t_i = i - k`, no clamping.
    Periodic,
}

/// A non-decreasing sequence of knots.
///
/// Knot vectors are never edited in place; shifting or rescaling returns a
/// new vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct KnotVector(Vec<f64>);

impl KnotVector {
    /// Wrap caller-supplied knots, rejecting decreasing or NaN entries.
    pub fn from_vec(knots: Vec<f64>) -> Result<Self> {
        for (index, pair) in knots.windows(2).enumerate() {
            // written negated so NaN fails too
            if !(pair[0] <= pair[1]) {
                return Err(CurveError::DecreasingKnots {
                    index: index + 1,
                    prev: pair[0],
                    next: pair[1],
                });
            }
        }
        Ok(Self(knots))
    }

    /// Build a knot vector of the given flavor for `n` control points of degree `k`.
    pub fn build(kind: KnotKind, n: usize, k: usize) -> Result<Self> {
        match kind {
            KnotKind::OpenUniform => build_open_uniform(n, k),
            KnotKind::Periodic => build_periodic(n, k),
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<f64> {
        self.0.first().copied()
    }

    pub fn last(&self) -> Option<f64> {
        self.0.last().copied()
    }

    /// Valid parameter range `(t_k, t_n)` for a curve of degree `k`,
    /// where `n = len - k - 1` is the control point count.
    pub fn domain(&self, degree: usize) -> Option<(f64, f64)> {
        let end = self.0.len().checked_sub(degree + 1)?;
        if end < degree {
            return None;
        }
        Some((self.0[degree], self.0[end]))
    }

    /// Check that this vector fits `n` control points of degree `k`.
    pub fn check_len(&self, n: usize, k: usize) -> Result<()> {
        let expected = n + k + 1;
        if self.0.len() != expected {
            return Err(CurveError::InconsistentKnotVector {
                expected,
                actual: self.0.len(),
            });
        }
        Ok(())
    }

    /// A copy with every knot moved by `offset`.
    pub fn shifted(&self, offset: f64) -> Self {
        Self(self.0.iter().map(|&t| t + offset).collect())
    }

    /// A copy rescaled affinely onto `[0, 1]`.
    ///
    /// A vector whose knots are all equal is returned unchanged.
    pub fn normalized(&self) -> Self {
        let (Some(lo), Some(hi)) = (self.first(), self.last()) else {
            return self.clone();
        };
        let range = hi - lo;
        if range <= 0.0 {
            return self.clone();
        }
        Self(self.0.iter().map(|&t| (t - lo) / range).collect())
    }

    /// Index of the last span `[t_i, t_{i+1})` with non-zero length.
    pub fn last_nondegenerate_span(&self) -> Option<usize> {
        last_nondegenerate_span(&self.0)
    }
}

impl std::ops::Deref for KnotVector {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl TryFrom<Vec<f64>> for KnotVector {
    type Error = CurveError;

    fn try_from(knots: Vec<f64>) -> Result<Self> {
        Self::from_vec(knots)
    }
}

impl From<KnotVector> for Vec<f64> {
    fn from(knots: KnotVector) -> Self {
        knots.0
    }
}

fn check_degree(n: usize, k: usize) -> Result<()> {
    if k >= n {
        return Err(CurveError::InvalidDegree { degree: k, points: n });
    }
    Ok(())
}

/// Build a clamped (open-uniform) knot vector for `n` control points of degree `k`.
///
/// The first `k + 1` knots are `0`, the last `k + 1` are `n - k`, and the
/// interior knots run `1, 2, ..., n - k - 1`.
pub fn build_open_uniform(n: usize, k: usize) -> Result<KnotVector> {
    check_degree(n, k)?;
    let end = (n - k) as f64;
    let knots: Vec<f64> = (0..n + k + 1)
        .map(|j| {
            if j <= k {
                0.0
            } else if j >= n {
                end
            } else {
                (j - k) as f64
            }
        })
        .collect();

    let knots = KnotVector(knots);
    knots.check_len(n, k)?;
    Ok(knots)
}

/// Build a periodic (uniform) knot vector for `n` control points of degree `k`,
/// with `t_i = i - k`.
pub fn build_periodic(n: usize, k: usize) -> Result<KnotVector> {
    check_degree(n, k)?;
    let knots = KnotVector(
        (0..n + k + 1)
            .map(|j| j as f64 - k as f64)
            .collect(),
    );
    knots.check_len(n, k)?;
    Ok(knots)
}

pub(crate) fn last_nondegenerate_span(knots: &[f64]) -> Option<usize> {
    (0..knots.len().saturating_sub(1))
        .rev()
        .find(|&i| knots[i] < knots[i + 1])
}

/// Find the knot span index for parameter `t` in the knot vector.
///
/// Returns the index `i` such that `knots[i] <= t < knots[i+1]`. At or past
/// the upper boundary the last non-degenerate span is returned, so the
/// right end of the domain evaluates the closing polynomial piece.
///
/// # Arguments
/// * `degree` - Degree of the B-spline
/// * `knots` - The knot vector
/// * `n` - Number of control points minus 1
/// * `t` - Parameter value
pub fn find_span(degree: usize, knots: &[f64], n: usize, t: f64) -> usize {
    if t >= knots[n + 1] {
        let mut span = n;
        while span > degree && knots[span] >= knots[span + 1] {
            span -= 1;
        }
        return span;
    }
    if t <= knots[degree] {
        let mut span = degree;
        while span < n && knots[span] >= knots[span + 1] {
            span += 1;
        }
        return span;
    }

    // Binary search
    let mut low = degree;
    let mut high = n + 1;
    let mut mid = (low + high) / 2;

    while t < knots[mid] || t >= knots[mid + 1] {
        if t < knots[mid] {
            high = mid;
        } else {
            low = mid;
        }
        mid = (low + high) / 2;
    }

    mid
}

/// Like [`find_span`] but for the left limit: returns `i` with
/// `knots[i] < t <= knots[i+1]`.
///
/// Used for one-sided derivatives at interior knots.
pub fn find_span_left(degree: usize, knots: &[f64], n: usize, t: f64) -> usize {
    if t <= knots[degree] {
        return find_span(degree, knots, n, t);
    }
    let mut span = find_span(degree, knots, n, t);
    while span > degree && knots[span] >= t {
        span -= 1;
    }
    span
}

/// Compute the non-vanishing basis functions at parameter `t`.
///
/// Returns a vector of `degree + 1` basis function values N_{span-degree,degree}(t)
/// through N_{span,degree}(t), built with the triangular table so the cost is
/// quadratic in the degree.
///
/// # Arguments
/// * `degree` - Degree of the B-spline
/// * `knots` - The knot vector
/// * `span` - The knot span index (from `find_span`)
/// * `t` - Parameter value
pub fn basis_functions(degree: usize, knots: &[f64], span: usize, t: f64) -> Vec<f64> {
    let mut n = vec![0.0; degree + 1];
    let mut left = vec![0.0; degree + 1];
    let mut right = vec![0.0; degree + 1];

    n[0] = 1.0;

    for j in 1..=degree {
        left[j] = t - knots[span + 1 - j];
        right[j] = knots[span + j] - t;
        let mut saved = 0.0;

        for r in 0..j {
            let temp = n[r] / (right[r + 1] + left[j - r]);
            n[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }

        n[j] = saved;
    }

    n
}

/// Compute basis functions and their first derivatives at parameter `t`.
///
/// Returns `(N, dN)`, both of length `degree + 1` and indexed like
/// [`basis_functions`]. The derivative follows
/// `N'_{i,p} = p / (t_{i+p} - t_i) N_{i,p-1} - p / (t_{i+p+1} - t_{i+1}) N_{i+1,p-1}`.
pub fn basis_functions_derivs(
    degree: usize,
    knots: &[f64],
    span: usize,
    t: f64,
) -> (Vec<f64>, Vec<f64>) {
    let values = basis_functions(degree, knots, span, t);
    let mut derivs = vec![0.0; degree + 1];
    if degree == 0 {
        return (values, derivs);
    }

    let p = degree;
    // N_{span-p+1, p-1} ..= N_{span, p-1}
    let lower = basis_functions(p - 1, knots, span, t);
    let factor = p as f64;

    for (j, d) in derivs.iter_mut().enumerate() {
        let i = span - p + j;
        let mut value = 0.0;
        if j >= 1 {
            let denom = knots[i + p] - knots[i];
            if denom > 0.0 {
                value += factor * lower[j - 1] / denom;
            }
        }
        if j < p {
            let denom = knots[i + p + 1] - knots[i + 1];
            if denom > 0.0 {
                value -= factor * lower[j] / denom;
            }
        }
        *d = value;
    }

    (values, derivs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_uniform_layout() {
        let knots = build_open_uniform(7, 2).unwrap();
        assert_eq!(
            knots.as_slice(),
            &[0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 5.0, 5.0]
        );
        assert_eq!(knots.domain(2), Some((0.0, 5.0)));
    }

    #[test]
    fn test_open_uniform_cubic_single_span() {
        let knots = build_open_uniform(4, 3).unwrap();
        assert_eq!(knots.as_slice(), &[0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_periodic_layout() {
        let knots = build_periodic(5, 2).unwrap();
        assert_eq!(
            knots.as_slice(),
            &[-2.0, -1.0, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0]
        );
        assert_eq!(knots.domain(2), Some((0.0, 3.0)));
    }

    #[test]
    fn test_knot_length_invariant() {
        for n in 1..12 {
            for k in 0..n {
                let open = build_open_uniform(n, k).unwrap();
                let periodic = build_periodic(n, k).unwrap();
                assert_eq!(open.len(), n + k + 1);
                assert_eq!(periodic.len(), n + k + 1);
                assert!(open.windows(2).all(|w| w[0] <= w[1]));
                assert!(periodic.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }

    #[test]
    fn test_invalid_degree() {
        assert!(matches!(
            build_open_uniform(3, 3),
            Err(CurveError::InvalidDegree { degree: 3, points: 3 })
        ));
        assert!(matches!(
            build_periodic(2, 5),
            Err(CurveError::InvalidDegree { .. })
        ));
        assert!(KnotVector::build(KnotKind::OpenUniform, 0, 0).is_err());
    }

    #[test]
    fn test_from_vec_rejects_decreasing() {
        let err = KnotVector::from_vec(vec![0.0, 1.0, 0.5]).unwrap_err();
        assert!(matches!(err, CurveError::DecreasingKnots { index: 2, .. }));
        assert!(KnotVector::from_vec(vec![0.0, f64::NAN]).is_err());
        assert!(KnotVector::from_vec(vec![0.0, 0.0, 1.0]).is_ok());
    }

    #[test]
    fn test_serde_validates() {
        let knots: KnotVector = serde_json::from_str("[0.0, 0.0, 1.0, 1.0]").unwrap();
        assert_eq!(knots.len(), 4);
        assert!(serde_json::from_str::<KnotVector>("[1.0, 0.0]").is_err());
        assert_eq!(serde_json::to_string(&knots).unwrap(), "[0.0,0.0,1.0,1.0]");
    }

    #[test]
    fn test_shifted_and_normalized() {
        let knots = build_open_uniform(5, 2).unwrap();
        let shifted = knots.shifted(2.0);
        assert_eq!(shifted.first(), Some(2.0));
        assert_eq!(shifted.last(), Some(5.0));
        assert_eq!(knots.len(), shifted.len());

        let unit = shifted.normalized();
        assert_eq!(unit.first(), Some(0.0));
        assert_eq!(unit.last(), Some(1.0));
        assert!((unit[3] - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_find_span_uniform() {
        // Degree 2, 5 control points, uniform knot vector
        let knots = vec![0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 3.0, 3.0];
        let n = 4; // 5 control points - 1
        let degree = 2;

        assert_eq!(find_span(degree, &knots, n, 0.0), 2);
        assert_eq!(find_span(degree, &knots, n, 0.5), 2);
        assert_eq!(find_span(degree, &knots, n, 1.0), 3);
        assert_eq!(find_span(degree, &knots, n, 1.5), 3);
        assert_eq!(find_span(degree, &knots, n, 2.5), 4);
        assert_eq!(find_span(degree, &knots, n, 3.0), 4);
    }

    #[test]
    fn test_find_span_left_at_interior_knot() {
        let knots = vec![0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 3.0, 3.0];
        assert_eq!(find_span(2, &knots, 4, 1.0), 3);
        assert_eq!(find_span_left(2, &knots, 4, 1.0), 2);
        assert_eq!(find_span_left(2, &knots, 4, 0.0), 2);
        assert_eq!(find_span_left(2, &knots, 4, 3.0), 4);
    }

    #[test]
    fn test_basis_functions_partition_of_unity() {
        let knots = vec![0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 3.0, 3.0];
        let degree = 2;
        let n = 4;

        for &t in &[0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0] {
            let span = find_span(degree, &knots, n, t);
            let basis = basis_functions(degree, &knots, span, t);
            let sum: f64 = basis.iter().sum();
            assert!(
                (sum - 1.0).abs() < 1e-12,
                "Partition of unity failed at t={}: sum={}",
                t,
                sum
            );
        }
    }

    #[test]
    fn test_basis_derivs_sum_to_zero() {
        let knots = build_open_uniform(6, 3).unwrap();
        for i in 0..=30 {
            let t = 3.0 * i as f64 / 30.0;
            let span = find_span(3, &knots, 5, t);
            let (_, dn) = basis_functions_derivs(3, &knots, span, t);
            let sum: f64 = dn.iter().sum();
            assert!(sum.abs() < 1e-10, "derivative sum at t={}: {}", t, sum);
        }
    }

    #[test]
    fn test_basis_derivs_linear() {
        // Degree 1 on [0, 1]: N0 = 1 - t, N1 = t
        let knots = vec![0.0, 0.0, 1.0, 1.0];
        let (n, dn) = basis_functions_derivs(1, &knots, 1, 0.25);
        assert!((n[0] - 0.75).abs() < 1e-12);
        assert!((dn[0] + 1.0).abs() < 1e-12);
        assert!((dn[1] - 1.0).abs() < 1e-12);
    }
}
