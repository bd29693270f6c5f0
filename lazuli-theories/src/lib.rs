//! Lazuli theories - theory solvers for the DPLL(T) loop
//!
//! - [`bv`]: fixed-width bit-vectors decided by bit-blasting into the CDCL engine
//! - [`euf`]: equality and uninterpreted functions decided by congruence closure,
//!   with flattening of nested terms
//!
//! Both solvers implement [`Theory`], which decides a cube of theory literals.
//!
//! # Examples
//!
//! ```
//! use lazuli_core::TermManager;
//! use lazuli_theories::euf::uf_theory_check;
//!
//! let mut tm = TermManager::new();
//! let u = tm.uninterpreted_sort("U");
//! let x = tm.mk_var("x", u);
//! let y = tm.mk_var("y", u);
//! let a = tm.mk_var("a", u);
//! let b = tm.mk_var("b", u);
//! let fx = tm.mk_apply("f", [x], u);
//! let fy = tm.mk_apply("f", [y], u);
//! let ab = tm.mk_eq(a, b);
//! let cube = [tm.mk_eq(x, y), tm.mk_eq(a, fx), tm.mk_eq(b, fy), tm.mk_not(ab)];
//!
//! assert!(!uf_theory_check(&tm, &cube).unwrap());
//! ```

#![warn(missing_docs)]

pub mod bv;
mod config;
pub mod euf;
mod theory;

pub use bv::{BvSolver, bitvector_theory_check};
pub use config::BvConfig;
pub use euf::{EufSolver, flatten, uf_theory_check};
pub use theory::{Theory, TheoryCheckResult, TheoryModel, TheoryValue};
