//! CurveLab I/O: plain-text point-group files.

pub mod point_file;

pub use point_file::{
    format_point_groups, parse_point_groups, read_point_groups, write_point_groups,
};
