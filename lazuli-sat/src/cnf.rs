//! Clause sets in conjunctive normal form.

use lazuli_core::{Lit, Var};
use smallvec::SmallVec;

/// Literals of a single clause.
pub type ClauseLits = SmallVec<[Lit; 4]>;

/// A clause set over variables `0..num_vars`.
///
/// Clauses are stored normalized: sorted, without duplicate literals. Tautologies
/// are dropped on insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cnf {
    num_vars: u32,
    clauses: Vec<ClauseLits>,
}

impl Cnf {
    /// Create an empty clause set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh variable.
    pub fn new_var(&mut self) -> Var {
        let v = Var::new(self.num_vars);
        self.num_vars += 1;
        v
    }

    /// Number of allocated variables.
    #[must_use]
    pub fn num_vars(&self) -> u32 {
        self.num_vars
    }

    /// Number of stored clauses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Whether no clause is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Stored clauses.
    #[must_use]
    pub fn clauses(&self) -> &[ClauseLits] {
        &self.clauses
    }

    /// Add a clause. Returns `false` if it was a tautology and was skipped.
    ///
    /// Variables beyond the current count are allocated implicitly.
    pub fn add_clause(&mut self, lits: impl IntoIterator<Item = Lit>) -> bool {
        let Some(clause) = normalize(lits) else {
            return false;
        };
        if let Some(max) = clause.iter().map(|l| l.var().raw()).max() {
            self.num_vars = self.num_vars.max(max + 1);
        }
        self.clauses.push(clause);
        true
    }

    /// Add a clause given as DIMACS integers.
    pub fn add_clause_dimacs(&mut self, lits: &[i32]) -> bool {
        self.add_clause(lits.iter().filter_map(|&l| Lit::from_dimacs(l)))
    }

    /// Evaluate under a total assignment indexed by variable.
    #[must_use]
    pub fn evaluate(&self, assignment: &[bool]) -> bool {
        self.clauses.iter().all(|clause| {
            clause.iter().any(|lit| {
                assignment
                    .get(lit.var().index())
                    .is_some_and(|&value| value == lit.is_positive())
            })
        })
    }
}

/// Sort and deduplicate a clause; `None` if it contains complementary literals.
pub(crate) fn normalize(lits: impl IntoIterator<Item = Lit>) -> Option<ClauseLits> {
    let mut clause: ClauseLits = lits.into_iter().collect();
    clause.sort_unstable();
    clause.dedup();
    // complements are adjacent after sorting
    if clause.windows(2).any(|w| w[0].is_complement_of(w[1])) {
        return None;
    }
    Some(clause)
}
