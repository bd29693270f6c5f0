//! Models of satisfiable queries.

use lazuli_core::ast::{TermId, TermManager};
use lazuli_theories::{TheoryModel, TheoryValue};
use rustc_hash::FxHashMap;
use std::fmt;

/// A model: the theory literals the accepted propositional assignment
/// stands for, Boolean variable values and the theory solver's model.
#[derive(Debug, Clone, Default)]
pub struct Model {
    literals: Vec<TermId>,
    booleans: FxHashMap<TermId, bool>,
    theory: TheoryModel,
}

impl Model {
    pub(crate) fn new(
        literals: Vec<TermId>,
        booleans: FxHashMap<TermId, bool>,
        theory: TheoryModel,
    ) -> Self {
        Self {
            literals,
            booleans,
            theory,
        }
    }

    /// Theory literals true in the model, atoms or their negations.
    #[must_use]
    pub fn literals(&self) -> &[TermId] {
        &self.literals
    }

    /// Value of a Boolean variable of the query.
    #[must_use]
    pub fn bool_value(&self, var: TermId) -> Option<bool> {
        self.booleans.get(&var).copied()
    }

    /// Value of a bit-vector term.
    #[must_use]
    pub fn bitvec_value(&self, term: TermId) -> Option<u64> {
        self.theory.bitvec_value(term)
    }

    /// Whether two terms are in the same equivalence class.
    #[must_use]
    pub fn same_class(&self, a: TermId, b: TermId) -> bool {
        match (self.theory.class_of(a), self.theory.class_of(b)) {
            (Some(x), Some(y)) => x == y,
            _ => a == b,
        }
    }

    /// Theory model.
    #[must_use]
    pub fn theory(&self) -> &TheoryModel {
        &self.theory
    }

    /// Render the model for a term manager.
    #[must_use]
    pub fn display<'a>(&'a self, tm: &'a TermManager) -> ModelDisplay<'a> {
        ModelDisplay { model: self, tm }
    }
}

/// Display adapter returned by [`Model::display`].
pub struct ModelDisplay<'a> {
    model: &'a Model,
    tm: &'a TermManager,
}

impl fmt::Display for ModelDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut booleans: Vec<_> = self.model.booleans.iter().collect();
        booleans.sort_unstable();
        for (&var, &value) in booleans {
            writeln!(f, "{} = {}", self.tm.display(var), value)?;
        }

        let mut values: Vec<_> = self
            .model
            .theory
            .assignments
            .iter()
            .filter_map(|(&t, v)| match v {
                TheoryValue::BitVec { value, width } => Some((t, *value, *width)),
                TheoryValue::Class(_) => None,
            })
            .filter(|&(t, ..)| self.tm.var_name(t).is_some())
            .collect();
        values.sort_unstable();
        for (t, value, width) in values {
            writeln!(
                f,
                "{} = #b{:0w$b}",
                self.tm.display(t),
                value,
                w = width as usize
            )?;
        }

        for &lit in &self.model.literals {
            writeln!(f, "{}", self.tm.display(lit))?;
        }
        Ok(())
    }
}
