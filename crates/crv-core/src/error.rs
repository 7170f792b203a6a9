use thiserror::Error;

#[derive(Debug, Error)]
pub enum CurveError {
    #[error("Invalid degree {degree} for {points} control points")]
    InvalidDegree { degree: usize, points: usize },

    #[error("Degree mismatch between joined segments: {left} and {right}")]
    DegreeMismatch { left: usize, right: usize },

    #[error("Parameter {value} is outside the curve domain [{min}, {max}]")]
    ParameterOutOfDomain { value: f64, min: f64, max: f64 },

    #[error("Invalid sample count: {0} (at least one sample is required)")]
    InvalidSampleCount(usize),

    #[error("Inconsistent knot vector: expected {expected} knots, got {actual}")]
    InconsistentKnotVector { expected: usize, actual: usize },

    #[error("Knot vector is decreasing at index {index}: {prev} > {next}")]
    DecreasingKnots { index: usize, prev: f64, next: f64 },

    #[error("Knot vector has an empty parameter domain at {0}")]
    EmptyDomain(f64),

    #[error("Degenerate control polygon: need at least {required} points, got {actual}")]
    DegenerateControlPolygon { required: usize, actual: usize },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CurveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = CurveError::ParameterOutOfDomain {
            value: 5.0,
            min: 0.0,
            max: 4.0,
        };
        assert_eq!(
            err.to_string(),
            "Parameter 5 is outside the curve domain [0, 4]"
        );

        let err = CurveError::InvalidDegree {
            degree: 3,
            points: 3,
        };
        assert_eq!(err.to_string(), "Invalid degree 3 for 3 control points");
    }

    #[test]
    fn test_io_conversion() {
        fn open_missing() -> Result<()> {
            std::fs::File::open("/nonexistent/curvelab/points.txt")?;
            Ok(())
        }
        assert!(matches!(open_missing(), Err(CurveError::Io(_))));
    }
}
