//! Formula and term AST.
//!
//! Terms live in an arena owned by [`TermManager`] and are referenced by
//! [`TermId`]. Structural sharing is guaranteed by hash-consing.

mod manager;
mod term;

pub use manager::{TermDisplay, TermManager};
pub use term::{Sort, Symbol, Term, TermArgs, TermId, TermKind};
