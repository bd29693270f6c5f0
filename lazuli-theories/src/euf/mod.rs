//! Equality with uninterpreted functions.
//!
//! - **flatten**: rewriting of arbitrary cubes into flat cubes
//! - **union_find**: partition of terms into equivalence classes
//! - **solver**: congruence closure over flat cubes

mod flatten;
mod solver;
mod union_find;

pub use flatten::{Flattener, flatten, is_flat_cube, is_flat_literal};
pub use solver::{EufSolver, EufStats, uf_theory_check};
pub use union_find::UnionFind;
