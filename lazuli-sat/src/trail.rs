//! Assignment trail with decision levels and reasons.

use crate::clause::ClauseRef;
use lazuli_core::{Lit, Var};

/// Three-valued Boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LBool {
    /// Assigned true.
    True,
    /// Assigned false.
    False,
    /// Not assigned.
    #[default]
    Undef,
}

impl LBool {
    /// Check if true.
    #[must_use]
    pub const fn is_true(self) -> bool {
        matches!(self, Self::True)
    }

    /// Check if false.
    #[must_use]
    pub const fn is_false(self) -> bool {
        matches!(self, Self::False)
    }

    /// Check if unassigned.
    #[must_use]
    pub const fn is_undef(self) -> bool {
        matches!(self, Self::Undef)
    }

    /// Negation; `Undef` stays `Undef`.
    #[must_use]
    pub const fn negate(self) -> Self {
        match self {
            Self::True => Self::False,
            Self::False => Self::True,
            Self::Undef => Self::Undef,
        }
    }

    /// Lift a Boolean.
    #[must_use]
    pub const fn from_bool(b: bool) -> Self {
        if b { Self::True } else { Self::False }
    }
}

/// The partial assignment, in assertion order.
///
/// A literal is a decision iff it opens a decision level; every other literal
/// was propagated and carries its reason clause.
#[derive(Debug, Default)]
pub struct Trail {
    lits: Vec<Lit>,
    level_starts: Vec<usize>,
    values: Vec<LBool>,
    levels: Vec<u32>,
    reasons: Vec<Option<ClauseRef>>,
}

impl Trail {
    /// Create an empty trail.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grow per-variable tables to cover `num_vars` variables.
    pub fn resize(&mut self, num_vars: usize) {
        if num_vars > self.values.len() {
            self.values.resize(num_vars, LBool::Undef);
            self.levels.resize(num_vars, 0);
            self.reasons.resize(num_vars, None);
        }
    }

    /// Number of variables covered.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.values.len()
    }

    /// Current decision level.
    #[must_use]
    pub fn decision_level(&self) -> u32 {
        self.level_starts.len() as u32
    }

    /// Value of a variable.
    #[must_use]
    pub fn var_value(&self, var: Var) -> LBool {
        self.values[var.index()]
    }

    /// Value of a literal.
    #[must_use]
    pub fn value(&self, lit: Lit) -> LBool {
        let v = self.values[lit.var().index()];
        if lit.is_negative() { v.negate() } else { v }
    }

    /// Level at which a variable was assigned.
    #[must_use]
    pub fn level(&self, var: Var) -> u32 {
        self.levels[var.index()]
    }

    /// Reason clause of a propagated variable.
    #[must_use]
    pub fn reason(&self, var: Var) -> Option<ClauseRef> {
        self.reasons[var.index()]
    }

    /// Assigned literals in order.
    #[must_use]
    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }

    /// Number of assigned literals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lits.len()
    }

    /// Whether nothing is assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    /// Whether every variable is assigned.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.lits.len() == self.values.len()
    }

    /// Decision literals, one per level.
    pub fn decisions(&self) -> impl Iterator<Item = Lit> + '_ {
        self.level_starts.iter().map(|&start| self.lits[start])
    }

    /// Whether the literal at `pos` opened a decision level.
    #[must_use]
    pub fn is_decision_at(&self, pos: usize) -> bool {
        self.level_starts.binary_search(&pos).is_ok()
    }

    /// Open a new level with `lit` as its decision.
    pub fn push_decision(&mut self, lit: Lit) {
        self.level_starts.push(self.lits.len());
        self.assign(lit, None);
    }

    /// Assert `lit` at the current level, forced by `reason`.
    pub fn push_propagated(&mut self, lit: Lit, reason: ClauseRef) {
        self.assign(lit, Some(reason));
    }

    fn assign(&mut self, lit: Lit, reason: Option<ClauseRef>) {
        let v = lit.var().index();
        debug_assert!(self.values[v].is_undef(), "variable assigned twice");
        self.values[v] = LBool::from_bool(lit.is_positive());
        self.levels[v] = self.decision_level();
        self.reasons[v] = reason;
        self.lits.push(lit);
    }

    /// Undo every level above `level`. Returns the unassigned literals, newest first.
    pub fn backtrack_to(&mut self, level: u32) -> Vec<Lit> {
        let level = level as usize;
        if level >= self.level_starts.len() {
            return Vec::new();
        }
        let start = self.level_starts[level];
        self.level_starts.truncate(level);
        let undone: Vec<Lit> = self.lits.drain(start..).rev().collect();
        for lit in &undone {
            let v = lit.var().index();
            self.values[v] = LBool::Undef;
            self.reasons[v] = None;
        }
        undone
    }

    /// Snapshot of variable values, indexed by variable.
    #[must_use]
    pub fn values(&self) -> &[LBool] {
        &self.values
    }
}
