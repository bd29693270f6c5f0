//! Lazuli Solver - DPLL(T) over the lazuli SAT engine and theory solvers
//!
//! A query is abstracted into a Boolean skeleton, decided by the CDCL engine,
//! and each propositional model is checked by the theory the query uses.
//! Rejected models are blocked and the search resumes.
//!
//! # Examples
//!
//! ```
//! use lazuli_core::TermManager;
//! use lazuli_solver::{SolverResult, dpll_t_solve};
//!
//! let mut tm = TermManager::new();
//! let u = tm.uninterpreted_sort("U");
//! let x = tm.mk_var("x", u);
//! let y = tm.mk_var("y", u);
//! let fx = tm.mk_apply("f", [x], u);
//! let fy = tm.mk_apply("f", [y], u);
//! let xy = tm.mk_eq(x, y);
//! let f_eq = tm.mk_eq(fx, fy);
//! let f_neq = tm.mk_not(f_eq);
//! let formula = tm.mk_and([xy, f_neq]);
//!
//! assert_eq!(dpll_t_solve(&mut tm, formula).unwrap(), SolverResult::Unsat);
//! ```

#![warn(missing_docs)]

mod config;
mod model;
mod skeleton;
mod solver;

pub use config::{SolverConfig, TheoryKind};
pub use model::{Model, ModelDisplay};
pub use skeleton::BooleanSkeleton;
pub use solver::{SolveOutcome, Solver, SolverResult, Statistics, dpll_t_solve};
