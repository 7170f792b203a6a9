//! B-spline core algorithms: knot vectors, basis functions, and De Boor evaluation.

pub mod basis;
pub mod deboor;
pub mod knot;

pub use basis::{
    b_spline_basis, basis_values, bernstein_basis, bernstein_values, binomial, BasisStrategy,
};
pub use deboor::*;
pub use knot::{
    basis_functions, basis_functions_derivs, build_open_uniform, build_periodic, find_span,
    find_span_left, KnotKind, KnotVector,
};
