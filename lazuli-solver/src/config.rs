//! Solver configuration and theory selection.

use lazuli_core::ast::{TermId, TermKind, TermManager};
use lazuli_core::error::{LazuliError, Result};
use lazuli_sat::SolverConfig as SatConfig;
use lazuli_theories::BvConfig;
use rustc_hash::FxHashSet;

/// Theory deciding the atoms of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TheoryKind {
    /// No theory atoms
    Propositional,
    /// Equality and uninterpreted functions
    Euf,
    /// Fixed-width bit-vectors
    BitVector,
}

impl TheoryKind {
    /// Pick the theory from the sorts and symbols occurring in `formula`.
    ///
    /// Bit-vectors together with uninterpreted sorts or function applications
    /// are rejected, since no combination procedure is available.
    pub fn detect(tm: &TermManager, formula: TermId) -> Result<Self> {
        let mut bitvec = false;
        let mut uninterpreted = false;
        let mut seen = FxHashSet::default();
        let mut stack = vec![formula];
        while let Some(t) = stack.pop() {
            if !seen.insert(t) {
                continue;
            }
            let term = tm.term(t)?;
            bitvec |= term.sort.is_bitvec();
            uninterpreted |= term.sort.is_uninterpreted();
            if matches!(term.kind, TermKind::Apply { .. }) {
                uninterpreted = true;
            }
            stack.extend(term.kind.children());
        }
        match (bitvec, uninterpreted) {
            (true, true) => Err(LazuliError::MixedTheories(
                "bit-vectors with uninterpreted functions".to_string(),
            )),
            (true, false) => Ok(Self::BitVector),
            (false, true) => Ok(Self::Euf),
            (false, false) => Ok(Self::Propositional),
        }
    }
}

/// DPLL(T) solver configuration
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Configuration of the CDCL engine deciding the Boolean skeleton
    pub sat: SatConfig,
    /// Bit width expected of every bit-vector term
    pub bv_width: u32,
    /// Theory to use; detected from the formula when `None`
    pub theory: Option<TheoryKind>,
    /// Maximum number of blocking clauses before giving up (0 = unlimited)
    pub max_refinements: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::balanced()
    }
}

impl SolverConfig {
    /// Default tuning, no limits
    #[must_use]
    pub fn balanced() -> Self {
        Self {
            sat: SatConfig::balanced(),
            bv_width: 4,
            theory: None,
            max_refinements: 0,
        }
    }

    /// Aggressive restarts and forgetting on the skeleton
    #[must_use]
    pub fn fast() -> Self {
        Self {
            sat: SatConfig::fast(),
            ..Self::balanced()
        }
    }

    /// Conservative restarts and forgetting on the skeleton
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            sat: SatConfig::thorough(),
            ..Self::balanced()
        }
    }

    /// Set the SAT engine configuration
    #[must_use]
    pub fn with_sat_config(mut self, sat: SatConfig) -> Self {
        self.sat = sat;
        self
    }

    /// Set the bit-vector width
    #[must_use]
    pub fn with_bv_width(mut self, width: u32) -> Self {
        self.bv_width = width;
        self
    }

    /// Force a theory instead of detecting it
    #[must_use]
    pub fn with_theory(mut self, theory: TheoryKind) -> Self {
        self.theory = Some(theory);
        self
    }

    /// Set the refinement budget
    #[must_use]
    pub fn with_max_refinements(mut self, max: u64) -> Self {
        self.max_refinements = max;
        self
    }

    /// Bit-vector solver configuration derived from this one
    #[must_use]
    pub fn bv_config(&self) -> BvConfig {
        BvConfig::default()
            .with_width(self.bv_width)
            .with_sat_config(self.sat.clone())
    }
}
