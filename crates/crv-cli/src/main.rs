//! CurveLab CLI
//!
//! Reads control polygons from a point-group file, builds curves and prints
//! sampled points as `x y` lines, one blank line between curves.
//!
//! # Usage
//!
//! ```bash
//! # Sample every group as a Bézier curve
//! curvelab bezier points.txt 100
//!
//! # Quadratic B-splines over periodic knots
//! curvelab bspline points.txt 2 periodic
//!
//! # Join consecutive cubic B-spline groups into one curve
//! curvelab join-bspline points.txt 3
//!
//! # Basis values N_{i,2}(1.5) for five control points
//! curvelab basis 5 2 1.5
//!
//! # De Casteljau construction of the first group at t = 0.3
//! curvelab casteljau points.txt 0.3
//! ```

use std::path::Path;
use std::process;

use crv_core::traits::BoundingBox;
use crv_core::{CurveError, Result};
use crv_geometry::curve::de_casteljau_levels;
use crv_geometry::nurbs::{basis_values, bernstein_values, BasisStrategy, KnotKind, KnotVector};
use crv_geometry::{
    join_bezier, join_bspline, sample_curve_par, BSplineCurve, BezierCurve, CompositeCurve,
    Curve2,
};
use crv_math::Point2;
use tracing::{debug, info};

const DEFAULT_SAMPLES: usize = 50;

fn print_usage() {
    eprintln!(
        r#"CurveLab: Bézier and B-spline curves from point files

USAGE:
    curvelab bezier <points> [samples]
    curvelab bspline <points> <degree> [open|periodic] [samples]
    curvelab join-bezier <points> [samples]
    curvelab join-bspline <points> <degree> [samples]
    curvelab basis <n> <degree> <u> [open|periodic]
    curvelab casteljau <points> <t>

ARGS:
    <points>        Point-group file: "x y" lines, groups separated by blank lines
    <degree>        Polynomial degree of each B-spline
    [samples]       Points printed per curve (default 50)

OPTIONS:
    --help          Show this help message

Set RUST_LOG=curvelab=debug,crv_geometry=debug for diagnostics on stderr.
"#
    );
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Error: Missing command\n");
        print_usage();
        process::exit(1);
    }

    if args[1] == "--help" || args[1] == "-h" {
        print_usage();
        process::exit(0);
    }

    let rest = &args[2..];
    let result = match args[1].as_str() {
        "bezier" => handle_bezier(rest),
        "bspline" => handle_bspline(rest),
        "join-bezier" => handle_join_bezier(rest),
        "join-bspline" => handle_join_bspline(rest),
        "basis" => handle_basis(rest),
        "casteljau" => handle_casteljau(rest),
        other => {
            eprintln!("Error: Unknown command '{}'\n", other);
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn handle_bezier(args: &[String]) -> Result<()> {
    let path = required(args, 0, "<points>")?;
    let samples = optional_count(args.get(1))?;

    let groups = read_groups(path)?;
    let curves = groups
        .into_iter()
        .map(|points| BezierCurve::new(points.into()))
        .collect::<Result<Vec<_>>>()?;
    for curve in &curves {
        debug!(
            degree = curve.degree(),
            bounds = ?curve.control_points().bounding_box(),
            "built Bezier curve"
        );
        print_curve(curve, samples)?;
    }
    Ok(())
}

fn handle_bspline(args: &[String]) -> Result<()> {
    let path = required(args, 0, "<points>")?;
    let degree = parse_usize(required(args, 1, "<degree>")?, "degree")?;
    // The knot flavor is optional; a bare number after the degree is the sample count
    let (kind, samples) = match args.get(2).map(String::as_str) {
        Some(word) if word.parse::<usize>().is_err() => {
            (parse_kind(word)?, optional_count(args.get(3))?)
        }
        _ => (KnotKind::OpenUniform, optional_count(args.get(2))?),
    };

    for points in read_groups(path)? {
        let curve = BSplineCurve::with_kind(degree, kind, points.into())?;
        debug!(knots = ?curve.knots().as_slice(), "built B-spline");
        print_curve(&curve, samples)?;
    }
    Ok(())
}

fn handle_join_bezier(args: &[String]) -> Result<()> {
    let path = required(args, 0, "<points>")?;
    let samples = optional_count(args.get(1))?;

    let segments = read_groups(path)?
        .into_iter()
        .map(|points| BezierCurve::new(points.into()))
        .collect::<Result<Vec<_>>>()?;
    let joined = join_bezier(&segments)?;
    report_joins(&joined);
    // Same density per segment as the unjoined curves
    print_curve(&joined, samples.saturating_mul(segments.len()))
}

fn handle_join_bspline(args: &[String]) -> Result<()> {
    let path = required(args, 0, "<points>")?;
    let degree = parse_usize(required(args, 1, "<degree>")?, "degree")?;
    let samples = optional_count(args.get(2))?;

    let mut curves = read_groups(path)?
        .into_iter()
        .map(|points| BSplineCurve::open_uniform(degree, points.into()));
    let first = match curves.next() {
        Some(curve) => curve?,
        None => return Err(CurveError::Parse("point file holds no groups".into())),
    };

    let mut count = 1;
    let mut merged = first;
    for next in curves {
        let joined = join_bspline(&merged, &next?)?;
        report_joins(&joined);
        merged = joined
            .as_bspline()
            .cloned()
            .ok_or_else(|| CurveError::Parse("join produced no B-spline".into()))?;
        count += 1;
    }
    info!(
        segments = count,
        control_points = merged.control_points().len(),
        "joined B-splines"
    );
    print_curve(&merged, samples.saturating_mul(count))
}

fn handle_basis(args: &[String]) -> Result<()> {
    let n = parse_usize(required(args, 0, "<n>")?, "n")?;
    let degree = parse_usize(required(args, 1, "<degree>")?, "degree")?;
    let u = parse_f64(required(args, 2, "<u>")?, "u")?;
    let kind = match args.get(3) {
        Some(word) => parse_kind(word)?,
        None => KnotKind::OpenUniform,
    };

    let knots = KnotVector::build(kind, n, degree)?;
    let (min, max) = knots
        .domain(degree)
        .ok_or(CurveError::InvalidDegree { degree, points: n })?;
    if !(min..=max).contains(&u) {
        return Err(CurveError::ParameterOutOfDomain { value: u, min, max });
    }

    for (i, value) in basis_values(BasisStrategy::default(), degree, u, &knots)
        .iter()
        .enumerate()
    {
        println!("{} {}", i, value);
    }
    Ok(())
}

/// Print each level of De Casteljau's construction for the first group,
/// one line of points per level, then the Bernstein weights at `t`.
fn handle_casteljau(args: &[String]) -> Result<()> {
    let path = required(args, 0, "<points>")?;
    let t = parse_f64(required(args, 1, "<t>")?, "t")?;

    let points = read_groups(path)?
        .into_iter()
        .next()
        .ok_or_else(|| CurveError::Parse("point file holds no groups".into()))?;
    let levels = de_casteljau_levels(&points, t)?;

    for level in &levels {
        let line: Vec<String> = level.iter().map(|p| format!("{} {}", p.x, p.y)).collect();
        println!("{}", line.join("  "));
    }
    println!();
    for (i, weight) in bernstein_values(points.len() - 1, t).iter().enumerate() {
        println!("{} {}", i, weight);
    }
    Ok(())
}

fn report_joins(joined: &CompositeCurve) {
    for (i, u) in joined.join_parameters().iter().enumerate() {
        let continuity = joined.continuity_at(i, Default::default());
        debug!(junction = i, parameter = u, ?continuity, "junction");
    }
}

fn print_curve(curve: &dyn Curve2, samples: usize) -> Result<()> {
    let points = sample_curve_par(curve, samples)?;
    debug!(samples, closed = curve.is_closed(), "sampled curve");
    for p in &points {
        println!("{} {}", p.x, p.y);
    }
    println!();
    Ok(())
}

fn read_groups(path: &str) -> Result<Vec<Vec<Point2>>> {
    let groups = crv_io::read_point_groups(Path::new(path))?;
    info!(path, groups = groups.len(), "loaded control polygons");
    Ok(groups)
}

fn required<'a>(args: &'a [String], index: usize, name: &str) -> Result<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| CurveError::Parse(format!("missing argument {}", name)))
}

fn optional_count(arg: Option<&String>) -> Result<usize> {
    match arg {
        Some(text) => parse_usize(text, "samples"),
        None => Ok(DEFAULT_SAMPLES),
    }
}

fn parse_usize(text: &str, name: &str) -> Result<usize> {
    text.parse().map_err(|_| {
        CurveError::Parse(format!(
            "{} must be a non-negative integer, got '{}'",
            name, text
        ))
    })
}

fn parse_f64(text: &str, name: &str) -> Result<f64> {
    text.parse()
        .map_err(|_| CurveError::Parse(format!("{} must be a number, got '{}'", name, text)))
}

fn parse_kind(text: &str) -> Result<KnotKind> {
    match text {
        "open" | "open-uniform" => Ok(KnotKind::OpenUniform),
        "periodic" => Ok(KnotKind::Periodic),
        other => Err(CurveError::Parse(format!(
            "knot kind must be 'open' or 'periodic', got '{}'",
            other
        ))),
    }
}
