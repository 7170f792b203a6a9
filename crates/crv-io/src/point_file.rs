//! Point-group files: runs of `x y` lines, one group per control polygon,
//! groups separated by blank lines.
//!
//! ```text
//! 0 0
//! 1 2
//! 3 5
//!
//! 4 0
//! 4 -1
//! ```

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crv_core::{CurveError, Result};
use crv_math::{dvec2, Point2};
use tracing::debug;

/// Fewest points a group may hold.
const MIN_GROUP_POINTS: usize = 2;

/// Read every point group from the file at `path`.
pub fn read_point_groups(path: &Path) -> Result<Vec<Vec<Point2>>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut parser = GroupParser::default();
    for line in reader.lines() {
        parser.push_line(&line?)?;
    }
    let groups = parser.finish()?;
    debug!(path = %path.display(), groups = groups.len(), "read point groups");
    Ok(groups)
}

/// Parse point groups from text.
///
/// Every non-blank line must hold exactly two real numbers and every group
/// at least two points. Errors name the 1-based group and line.
pub fn parse_point_groups(text: &str) -> Result<Vec<Vec<Point2>>> {
    let mut parser = GroupParser::default();
    for line in text.lines() {
        parser.push_line(line)?;
    }
    parser.finish()
}

/// Write `groups` to `path`, replacing any existing file.
pub fn write_point_groups(path: &Path, groups: &[Vec<Point2>]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(format_point_groups(groups).as_bytes())?;
    writer.flush()?;
    debug!(path = %path.display(), groups = groups.len(), "wrote point groups");
    Ok(())
}

/// Render `groups` as text: one `x y` line per point, a blank line after each group.
pub fn format_point_groups(groups: &[Vec<Point2>]) -> String {
    let mut out = String::new();
    for group in groups {
        for p in group {
            // Writing into a String cannot fail
            let _ = writeln!(out, "{} {}", p.x, p.y);
        }
        out.push('\n');
    }
    out
}

#[derive(Default)]
struct GroupParser {
    groups: Vec<Vec<Point2>>,
    current: Vec<Point2>,
    line_no: usize,
}

impl GroupParser {
    fn push_line(&mut self, line: &str) -> Result<()> {
        self.line_no += 1;
        let line = line.trim();
        if line.is_empty() {
            return self.close_group();
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 2 {
            return Err(self.error(format!(
                "expected 2 coordinates, found {}",
                fields.len()
            )));
        }
        let x = self.coordinate(fields[0])?;
        let y = self.coordinate(fields[1])?;
        self.current.push(dvec2(x, y));
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<Vec<Point2>>> {
        self.close_group()?;
        Ok(self.groups)
    }

    fn close_group(&mut self) -> Result<()> {
        if self.current.is_empty() {
            return Ok(());
        }
        if self.current.len() < MIN_GROUP_POINTS {
            return Err(CurveError::Parse(format!(
                "group {} ending before line {}: need at least {} points, got {}",
                self.groups.len() + 1,
                self.line_no,
                MIN_GROUP_POINTS,
                self.current.len()
            )));
        }
        self.groups.push(std::mem::take(&mut self.current));
        Ok(())
    }

    fn coordinate(&self, field: &str) -> Result<f64> {
        match field.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(self.error(format!("invalid coordinate '{}'", field))),
        }
    }

    fn error(&self, message: String) -> CurveError {
        CurveError::Parse(format!(
            "group {}, line {}: {}",
            self.groups.len() + 1,
            self.line_no,
            message
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_groups() {
        let text = "0 0\n1 2\n3 5\n\n\n4 0\n4 -1\n5.5   -2e0\n";
        let groups = parse_point_groups(text).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0], vec![dvec2(0.0, 0.0), dvec2(1.0, 2.0), dvec2(3.0, 5.0)]);
        assert_eq!(groups[1][2], dvec2(5.5, -2.0));
    }

    #[test]
    fn test_parse_ignores_surrounding_blank_lines() {
        let groups = parse_point_groups("\n  \n0 0\n1 1\n\n").unwrap();
        assert_eq!(groups.len(), 1);
        assert!(parse_point_groups("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_field_count_error() {
        let err = parse_point_groups("0 0\n1 1\n\n2 2\n3 3 3\n").unwrap_err();
        match err {
            CurveError::Parse(msg) => {
                assert!(msg.contains("group 2"), "{}", msg);
                assert!(msg.contains("line 5"), "{}", msg);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_bad_number() {
        let err = parse_point_groups("0 zero\n").unwrap_err();
        assert!(matches!(err, CurveError::Parse(ref msg) if msg.contains("'zero'")));
        assert!(parse_point_groups("0 NaN\n1 1\n").is_err());
    }

    #[test]
    fn test_parse_short_group() {
        let err = parse_point_groups("0 0\n1 1\n\n2 2\n").unwrap_err();
        assert!(matches!(err, CurveError::Parse(ref msg) if msg.contains("group 2")));
    }

    #[test]
    fn test_format_round_trip() {
        let groups = vec![
            vec![dvec2(0.0, 0.0), dvec2(1.5, -2.0)],
            vec![dvec2(3.0, 4.0), dvec2(0.1, 0.2), dvec2(-7.0, 1e-3)],
        ];
        let text = format_point_groups(&groups);
        assert!(text.starts_with("0 0\n1.5 -2\n\n"));
        assert_eq!(parse_point_groups(&text).unwrap(), groups);
    }

    #[test]
    fn test_file_round_trip() {
        let groups = vec![vec![dvec2(0.0, 0.0), dvec2(1.0, 2.0), dvec2(3.0, 5.0)]];
        let temp_file = NamedTempFile::new().unwrap();
        write_point_groups(temp_file.path(), &groups).unwrap();
        assert_eq!(read_point_groups(temp_file.path()).unwrap(), groups);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_point_groups(&dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, CurveError::Io(_)));
    }
}
