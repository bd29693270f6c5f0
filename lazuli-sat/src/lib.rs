//! Lazuli SAT - CNF encoding and CDCL search
//!
//! This crate turns propositional terms into clauses and decides them:
//! - [`TseitinEncoder`]: structural CNF transformation with one proxy per sub-formula
//! - [`Solver`]: conflict-driven clause learning with first-UIP analysis,
//!   non-chronological backjumping, literal activity, restarts and clause forgetting
//! - [`invariants`]: checkers for trail and clause database invariants
//!
//! # Examples
//!
//! ```
//! use lazuli_sat::{Lit, Solver, SolverResult};
//!
//! let mut sat = Solver::new();
//! let a = sat.new_var();
//! let b = sat.new_var();
//!
//! sat.add_clause([Lit::pos(a), Lit::pos(b)]);
//! sat.add_clause([Lit::neg(a)]);
//!
//! assert_eq!(sat.solve(), SolverResult::Sat);
//! assert!(sat.model()[b.index()].is_true());
//! ```

#![warn(missing_docs)]

mod activity;
mod clause;
mod cnf;
mod config;
pub mod invariants;
mod solver;
mod trail;
mod tseitin;

pub use activity::LitActivity;
pub use clause::{Clause, ClauseDb, ClauseRef};
pub use cnf::{ClauseLits, Cnf};
pub use config::SolverConfig;
pub use lazuli_core::{Lit, Var};
pub use solver::{Solver, SolverResult, Statistics, cdcl_solve};
pub use trail::{LBool, Trail};
pub use tseitin::{TseitinEncoder, encode_cnf};
