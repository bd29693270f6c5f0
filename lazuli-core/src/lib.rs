//! Lazuli Core - terms, literals and errors for the lazuli DPLL(T) solver
//!
//! This crate provides the types every other lazuli crate speaks:
//! - Arena-allocated, hash-consed terms with [`TermId`] references
//! - Sorts for Booleans, fixed-width bit-vectors and uninterpreted domains
//! - Boolean [`Var`] and [`Lit`] shared by the encoder, the SAT engine and theories
//! - [`LazuliError`], the error type for malformed input
//!
//! # Examples
//!
//! ```
//! use lazuli_core::ast::{Sort, TermManager};
//!
//! let mut tm = TermManager::new();
//!
//! let p = tm.mk_var("p", Sort::Bool);
//! let q = tm.mk_var("q", Sort::Bool);
//! let and_pq = tm.mk_and([p, q]);
//!
//! let u = tm.uninterpreted_sort("U");
//! let x = tm.mk_var("x", u);
//! let fx = tm.mk_apply("f", [x], u);
//! let eq = tm.mk_eq(fx, x);
//!
//! assert_eq!(tm.display(eq).to_string(), "(= (f x) x)");
//! assert_eq!(and_pq, tm.mk_and([p, q]));
//! ```

#![warn(missing_docs)]

pub mod ast;
pub mod error;
pub mod literal;

pub use ast::{Sort, Symbol, Term, TermId, TermKind, TermManager};
pub use error::{LazuliError, Result};
pub use literal::{Lit, Var};
