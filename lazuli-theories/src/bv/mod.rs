//! BitVector theory solver
//!
//! Fixed-width bit-blasting: bit-vector cubes become propositional formulas
//! that are encoded to clauses and decided by the CDCL engine.

mod blaster;
mod solver;

pub use blaster::{BitBlaster, Bits};
pub use solver::{BvSolver, BvStats, bitvector_theory_check};
