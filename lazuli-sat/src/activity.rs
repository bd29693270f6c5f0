//! Literal activity scores for branching (VSIDS-style).
//!
//! Scores start at each literal's occurrence count in the original clauses.
//! Every literal of a learned clause gains one point, and all scores are halved
//! every `decay_interval` conflicts so that recent conflicts dominate.

use crate::trail::Trail;
use lazuli_core::Lit;

/// Per-literal activity table.
#[derive(Debug, Clone)]
pub struct LitActivity {
    scores: Vec<u64>,
    decay_interval: u64,
    conflicts: u64,
}

impl LitActivity {
    /// Create a table halving every `decay_interval` conflicts (0 disables decay).
    #[must_use]
    pub fn new(decay_interval: u64) -> Self {
        Self {
            scores: Vec::new(),
            decay_interval,
            conflicts: 0,
        }
    }

    /// Grow to cover `num_vars` variables.
    pub fn resize(&mut self, num_vars: usize) {
        if num_vars * 2 > self.scores.len() {
            self.scores.resize(num_vars * 2, 0);
        }
    }

    /// Score of a literal.
    #[must_use]
    pub fn score(&self, lit: Lit) -> u64 {
        self.scores.get(lit.index()).copied().unwrap_or(0)
    }

    /// Count occurrences of an original clause's literals.
    pub fn count_occurrences(&mut self, lits: &[Lit]) {
        for lit in lits {
            self.scores[lit.index()] += 1;
        }
    }

    /// Credit a learned clause and apply decay when due.
    pub fn on_conflict(&mut self, learned: &[Lit]) {
        for lit in learned {
            self.scores[lit.index()] += 1;
        }
        self.conflicts += 1;
        if self.decay_interval > 0 && self.conflicts % self.decay_interval == 0 {
            self.halve();
        }
    }

    /// Halve every score.
    pub fn halve(&mut self) {
        for s in &mut self.scores {
            *s /= 2;
        }
    }

    /// Highest-scoring literal over an unassigned variable.
    ///
    /// Ties go to the lowest literal index, so the positive polarity of the
    /// lowest variable wins among equals.
    #[must_use]
    pub fn pick(&self, trail: &Trail) -> Option<Lit> {
        let mut best: Option<(u64, Lit)> = None;
        for (idx, &score) in self.scores.iter().enumerate() {
            let lit = Lit::from_raw(idx as u32);
            if !trail.var_value(lit.var()).is_undef() {
                continue;
            }
            if best.is_none_or(|(s, _)| score > s) {
                best = Some((score, lit));
            }
        }
        best.map(|(_, lit)| lit)
    }
}
