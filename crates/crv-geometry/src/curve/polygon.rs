//! Ordered control points.

use crv_core::traits::BoundingBox;
use crv_core::{CurveError, Result};
use crv_math::{Aabb2, Point2};
use serde::{Deserialize, Serialize};

/// An ordered sequence of control points; the index is the point's identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlPolygon(Vec<Point2>);

impl ControlPolygon {
    pub fn new(points: Vec<Point2>) -> Self {
        Self(points)
    }

    /// Fail with `DegenerateControlPolygon` when fewer than `required` points exist.
    pub fn require(&self, required: usize) -> Result<()> {
        if self.0.len() < required {
            return Err(CurveError::DegenerateControlPolygon {
                required,
                actual: self.0.len(),
            });
        }
        Ok(())
    }

    pub fn points(&self) -> &[Point2] {
        &self.0
    }

    pub fn into_points(self) -> Vec<Point2> {
        self.0
    }

    /// Total length of the polyline through the control points.
    pub fn length(&self) -> f64 {
        self.0.windows(2).map(|w| w[0].distance(w[1])).sum()
    }
}

impl std::ops::Deref for ControlPolygon {
    type Target = [Point2];

    fn deref(&self) -> &[Point2] {
        &self.0
    }
}

impl From<Vec<Point2>> for ControlPolygon {
    fn from(points: Vec<Point2>) -> Self {
        Self(points)
    }
}

impl From<&[(f64, f64)]> for ControlPolygon {
    fn from(coords: &[(f64, f64)]) -> Self {
        Self(coords.iter().map(|&(x, y)| Point2::new(x, y)).collect())
    }
}

impl FromIterator<Point2> for ControlPolygon {
    fn from_iter<I: IntoIterator<Item = Point2>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl BoundingBox for ControlPolygon {
    type Point = Point2;

    fn bounding_box(&self) -> Option<(Point2, Point2)> {
        Aabb2::from_points(&self.0).map(|b| (b.min, b.max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crv_math::dvec2;

    #[test]
    fn test_require() {
        let polygon = ControlPolygon::from(&[(0.0, 0.0)][..]);
        assert!(matches!(
            polygon.require(2),
            Err(CurveError::DegenerateControlPolygon { required: 2, actual: 1 })
        ));
        assert!(polygon.require(1).is_ok());
    }

    #[test]
    fn test_length_and_bounds() {
        let polygon: ControlPolygon =
            vec![dvec2(0.0, 0.0), dvec2(3.0, 4.0), dvec2(3.0, 0.0)].into();
        assert!((polygon.length() - 9.0).abs() < 1e-12);
        let (min, max) = polygon.bounding_box().unwrap();
        assert_eq!(min, dvec2(0.0, 0.0));
        assert_eq!(max, dvec2(3.0, 4.0));
        assert!(ControlPolygon::default().bounding_box().is_none());
    }

    #[test]
    fn test_serde_is_a_plain_list() {
        let polygon = ControlPolygon::from(&[(1.0, 2.0), (3.0, 4.0)][..]);
        let json = serde_json::to_string(&polygon).unwrap();
        assert_eq!(json, "[[1.0,2.0],[3.0,4.0]]");
        let back: ControlPolygon = serde_json::from_str(&json).unwrap();
        assert_eq!(back, polygon);
    }
}
