//! Theory solver interface used by the DPLL(T) loop.
//!
//! A theory receives a cube (a conjunction of theory literals reconstructed
//! from a propositional model) and decides whether it is consistent.

use lazuli_core::ast::{TermId, TermManager};
use lazuli_core::error::Result;
use rustc_hash::FxHashMap;

/// Result of a theory check operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TheoryCheckResult {
    /// The cube is consistent in the theory.
    Sat,
    /// The cube is inconsistent.
    Unsat,
    /// Unable to determine (resource limit reached).
    Unknown,
}

/// Value assigned to a term by a theory model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TheoryValue {
    /// A bit-vector value.
    BitVec {
        /// Value, bit 0 least significant.
        value: u64,
        /// Width in bits.
        width: u32,
    },
    /// Representative of the term's equivalence class.
    Class(TermId),
}

/// Model produced by a theory solver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TheoryModel {
    /// Term assignments.
    pub assignments: FxHashMap<TermId, TheoryValue>,
}

impl TheoryModel {
    /// Value of a term.
    #[must_use]
    pub fn get(&self, term: TermId) -> Option<TheoryValue> {
        self.assignments.get(&term).copied()
    }

    /// Bit-vector value of a term.
    #[must_use]
    pub fn bitvec_value(&self, term: TermId) -> Option<u64> {
        match self.get(term)? {
            TheoryValue::BitVec { value, .. } => Some(value),
            TheoryValue::Class(_) => None,
        }
    }

    /// Class representative of a term.
    #[must_use]
    pub fn class_of(&self, term: TermId) -> Option<TermId> {
        match self.get(term)? {
            TheoryValue::Class(rep) => Some(rep),
            TheoryValue::BitVec { .. } => None,
        }
    }

    /// Record a value.
    pub fn insert(&mut self, term: TermId, value: TheoryValue) {
        self.assignments.insert(term, value);
    }

    /// Number of assigned terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether nothing is assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

/// Core trait for theory solvers in DPLL(T).
pub trait Theory {
    /// Name of this theory (e.g. "EUF", "BV").
    fn name(&self) -> &str;

    /// Drop all state from previous checks.
    fn reset(&mut self);

    /// Decide a cube of theory literals.
    ///
    /// Malformed cubes are errors, never `Unsat`.
    fn check_cube(&mut self, tm: &mut TermManager, cube: &[TermId]) -> Result<TheoryCheckResult>;

    /// Model of the last cube that checked `Sat`.
    fn model(&self) -> &TheoryModel;
}
