//! Sampling curves into polylines.

use crv_core::{CurveError, Result};
use crv_math::Point2;
use rayon::prelude::*;

use crate::curve::Curve2;

/// Uniform samples of a curve over its domain, evaluated lazily.
///
/// Cloning restarts the sequence; the curve is only borrowed.
#[derive(Debug)]
pub struct Samples<'a, C: Curve2 + ?Sized> {
    curve: &'a C,
    params: SampleParams,
    front: usize,
    back: usize,
}

impl<C: Curve2 + ?Sized> Clone for Samples<'_, C> {
    fn clone(&self) -> Self {
        Self {
            curve: self.curve,
            params: self.params,
            front: self.front,
            back: self.back,
        }
    }
}

impl<'a, C: Curve2 + ?Sized> Samples<'a, C> {
    /// The parameter of sample `index`, independent of iteration state.
    pub fn parameter(&self, index: usize) -> f64 {
        self.params.at(index)
    }
}

impl<C: Curve2 + ?Sized> Iterator for Samples<'_, C> {
    type Item = Point2;

    fn next(&mut self) -> Option<Point2> {
        if self.front >= self.back {
            return None;
        }
        let t = self.params.at(self.front);
        self.front += 1;
        Some(self.curve.point_at(t))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<C: Curve2 + ?Sized> DoubleEndedIterator for Samples<'_, C> {
    fn next_back(&mut self) -> Option<Point2> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(self.curve.point_at(self.params.at(self.back)))
    }
}

impl<C: Curve2 + ?Sized> ExactSizeIterator for Samples<'_, C> {}

impl<C: Curve2 + ?Sized> std::iter::FusedIterator for Samples<'_, C> {}

/// `count` linearly spaced parameters over `[start, end]`, both ends included.
#[derive(Debug, Clone, Copy)]
struct SampleParams {
    start: f64,
    end: f64,
    count: usize,
}

impl SampleParams {
    fn new(domain: (f64, f64), count: usize) -> Result<Self> {
        if count < 1 {
            return Err(CurveError::InvalidSampleCount(count));
        }
        Ok(Self {
            start: domain.0,
            end: domain.1,
            count,
        })
    }

    fn at(&self, index: usize) -> f64 {
        if self.count == 1 || index == 0 {
            return self.start;
        }
        // Hit the end exactly rather than through rounding
        if index + 1 >= self.count {
            return self.end;
        }
        self.start + (self.end - self.start) * index as f64 / (self.count - 1) as f64
    }
}

/// Sample `num_samples` points of `curve` at linearly spaced parameters over
/// its domain, inclusive of both ends when `num_samples > 1`.
///
/// A single sample is taken at the start of the domain. Fails with
/// `InvalidSampleCount` when `num_samples` is zero.
pub fn sample_curve<C: Curve2 + ?Sized>(curve: &C, num_samples: usize) -> Result<Samples<'_, C>> {
    let params = SampleParams::new(curve.domain(), num_samples)?;
    Ok(Samples {
        curve,
        params,
        front: 0,
        back: num_samples,
    })
}

/// Like [`sample_curve`], evaluated on the rayon thread pool.
///
/// The returned points are in parameter order.
pub fn sample_curve_par<C: Curve2 + ?Sized>(curve: &C, num_samples: usize) -> Result<Vec<Point2>> {
    let params = SampleParams::new(curve.domain(), num_samples)?;
    Ok((0..num_samples)
        .into_par_iter()
        .map(|i| curve.point_at(params.at(i)))
        .collect())
}

/// Convert a curve to a polyline using adaptive subdivision.
///
/// The algorithm recursively subdivides segments where the midpoint deviation
/// from the chord exceeds the given `tolerance`.
///
/// # Arguments
/// * `curve` - The curve to tessellate
/// * `tolerance` - Maximum allowed deviation from the true curve
///
/// # Returns
/// A vector of points approximating the curve.
pub fn curve_to_polyline(curve: &dyn Curve2, tolerance: f64) -> Vec<Point2> {
    let (t_min, t_max) = curve.domain();
    let mut points = vec![curve.point_at(t_min)];
    // Split once up front so symmetric curves whose midpoint lies on the
    // end-to-end chord are still refined.
    let t_mid = (t_min + t_max) * 0.5;
    subdivide_curve(curve, t_min, t_mid, tolerance, &mut points, 1);
    subdivide_curve(curve, t_mid, t_max, tolerance, &mut points, 1);
    points
}

/// Maximum recursion depth for adaptive subdivision.
const MAX_DEPTH: u32 = 12;

fn subdivide_curve(
    curve: &dyn Curve2,
    t0: f64,
    t1: f64,
    tolerance: f64,
    points: &mut Vec<Point2>,
    depth: u32,
) {
    let p1 = curve.point_at(t1);
    if depth >= MAX_DEPTH {
        points.push(p1);
        return;
    }

    let t_mid = (t0 + t1) * 0.5;
    let p0 = curve.point_at(t0);
    let p_mid = curve.point_at(t_mid);

    // Chord midpoint
    let chord_mid = (p0 + p1) * 0.5;
    let deviation = (p_mid - chord_mid).length();

    if deviation > tolerance {
        subdivide_curve(curve, t0, t_mid, tolerance, points, depth + 1);
        subdivide_curve(curve, t_mid, t1, tolerance, points, depth + 1);
    } else {
        points.push(p1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{BSplineCurve, BezierCurve, ControlPolygon};
    use crv_math::dvec2;

    fn bspline() -> BSplineCurve {
        BSplineCurve::open_uniform(
            2,
            ControlPolygon::from(
                &[
                    (0.0, 0.0),
                    (1.0, 2.0),
                    (3.0, 5.0),
                    (4.0, 4.0),
                    (5.0, 0.0),
                    (6.0, -3.0),
                    (7.0, 0.0),
                ][..],
            ),
        )
        .unwrap()
    }

    #[test]
    fn test_sample_includes_both_ends() {
        let curve = bspline();
        let points: Vec<_> = sample_curve(&curve, 11).unwrap().collect();
        assert_eq!(points.len(), 11);
        assert!((points[0] - dvec2(0.0, 0.0)).length() < 1e-12);
        assert!((points[10] - dvec2(7.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_single_sample_is_domain_start() {
        let curve = bspline();
        let points: Vec<_> = sample_curve(&curve, 1).unwrap().collect();
        assert_eq!(points.len(), 1);
        assert!((points[0] - dvec2(0.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_zero_samples_rejected() {
        let curve = bspline();
        assert!(matches!(
            sample_curve(&curve, 0),
            Err(CurveError::InvalidSampleCount(0))
        ));
        assert!(sample_curve_par(&curve, 0).is_err());
    }

    #[test]
    fn test_restartable() {
        let curve = bspline();
        let samples = sample_curve(&curve, 25).unwrap();
        assert_eq!(samples.len(), 25);
        assert_eq!(samples.parameter(24), 5.0);

        let first: Vec<_> = samples.clone().collect();
        let second: Vec<_> = samples.collect();
        assert_eq!(first, second);

        let coarse: Vec<_> = sample_curve(&curve, 3).unwrap().collect();
        assert_eq!(coarse[1], first[12]);
    }

    #[test]
    fn test_reverse_iteration() {
        let curve = bspline();
        let forward: Vec<_> = sample_curve(&curve, 9).unwrap().collect();
        let mut backward: Vec<_> = sample_curve(&curve, 9).unwrap().rev().collect();
        backward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let curve = bspline();
        let sequential: Vec<_> = sample_curve(&curve, 500).unwrap().collect();
        let parallel = sample_curve_par(&curve, 500).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_sample_through_trait_object() {
        let curve = BezierCurve::new(vec![dvec2(0.0, 0.0), dvec2(2.0, 0.0)].into()).unwrap();
        let dyn_curve: &dyn Curve2 = &curve;
        let points: Vec<_> = sample_curve(dyn_curve, 5).unwrap().collect();
        assert_eq!(points[2], dvec2(1.0, 0.0));
    }

    #[test]
    fn test_curve_to_polyline_line() {
        let line = BezierCurve::new(vec![dvec2(0.0, 0.0), dvec2(10.0, 0.0)].into()).unwrap();
        let points = curve_to_polyline(&line, 0.01);
        // A line should produce exactly 3 points (start, forced midpoint, end)
        assert_eq!(points.len(), 3);
        assert!((points[0] - dvec2(0.0, 0.0)).length() < 1e-10);
        assert!((points[2] - dvec2(10.0, 0.0)).length() < 1e-10);
    }

    #[test]
    fn test_curve_to_polyline_within_tolerance() {
        let curve = bspline();
        let tolerance = 0.01;
        let points = curve_to_polyline(&curve, tolerance);
        assert!(
            points.len() > 10,
            "Curved spline should produce many points, got {}",
            points.len()
        );
        assert!((points[points.len() - 1] - dvec2(7.0, 0.0)).length() < 1e-12);

        // Every chord midpoint stays close to the curve
        let dense: Vec<_> = sample_curve(&curve, 2000).unwrap().collect();
        for w in points.windows(2) {
            let mid = (w[0] + w[1]) * 0.5;
            let nearest = dense
                .iter()
                .map(|p| p.distance(mid))
                .fold(f64::INFINITY, f64::min);
            assert!(nearest < 4.0 * tolerance, "chord deviates by {}", nearest);
        }
    }
}
