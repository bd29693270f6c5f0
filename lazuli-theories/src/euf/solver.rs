//! Congruence closure over flat cubes.

use super::flatten::{Flattener, UfLiteral, is_flat_literal};
use super::union_find::UnionFind;
use crate::theory::{Theory, TheoryCheckResult, TheoryModel, TheoryValue};
use lazuli_core::ast::{Symbol, TermId, TermKind, TermManager};
use lazuli_core::error::{LazuliError, Result};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::debug;

type Signature = (Symbol, SmallVec<[TermId; 4]>);

/// Statistics for the congruence closure solver
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EufStats {
    /// Cubes checked
    pub checks: u64,
    /// Merges from asserted equalities
    pub equality_merges: u64,
    /// Merges derived by congruence
    pub congruence_merges: u64,
    /// Saturation rounds
    pub rounds: u64,
}

/// Decides flat cubes over equality and uninterpreted functions.
///
/// Each check builds a fresh partition: every term of the cube starts as a
/// singleton, asserted equalities are merged, and applications with the same
/// symbol and pairwise-equal arguments are merged until nothing changes.
#[derive(Debug, Default)]
pub struct EufSolver {
    uf: UnionFind,
    terms: Vec<TermId>,
    model: TheoryModel,
    stats: EufStats,
}

impl EufSolver {
    /// Create a solver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Statistics.
    #[must_use]
    pub fn stats(&self) -> &EufStats {
        &self.stats
    }

    /// Decide a flat cube. Non-flat literals are rejected.
    pub fn check(&mut self, tm: &TermManager, flat_cube: &[TermId]) -> Result<bool> {
        self.uf = UnionFind::new();
        self.terms.clear();
        self.model = TheoryModel::default();
        self.stats.checks += 1;

        let mut equalities = Vec::new();
        let mut disequalities = Vec::new();
        let mut positive = Vec::new();
        let mut negative = Vec::new();
        for &lit in flat_cube {
            if !is_flat_literal(tm, lit) {
                return Err(LazuliError::NotFlat(tm.display(lit).to_string()));
            }
            match UfLiteral::classify(tm, lit)? {
                UfLiteral::Eq(a, b) => equalities.push((a, b)),
                UfLiteral::Neq(a, b) => disequalities.push((a, b)),
                UfLiteral::Pred(p) => positive.push(p),
                UfLiteral::NotPred(p) => negative.push(p),
            }
        }

        let mut seen = FxHashSet::default();
        let mut apps = Vec::new();
        let roots = equalities
            .iter()
            .chain(&disequalities)
            .flat_map(|&(a, b)| [a, b])
            .chain(positive.iter().copied())
            .chain(negative.iter().copied());
        for t in roots {
            self.register(tm, t, &mut seen, &mut apps);
        }

        for &(a, b) in &equalities {
            if self.uf.union(a, b) {
                self.stats.equality_merges += 1;
            }
        }
        self.saturate(tm, &apps);

        for &(a, b) in &disequalities {
            if self.uf.same(a, b) {
                debug!(lhs = %tm.display(a), rhs = %tm.display(b), "EUF: disequality violated");
                return Ok(false);
            }
        }
        for &p in &positive {
            for &q in &negative {
                if self.uf.same(p, q) {
                    debug!(pred = %tm.display(p), "EUF: predicate asserted both ways");
                    return Ok(false);
                }
            }
        }

        for i in 0..self.terms.len() {
            let t = self.terms[i];
            let rep = self.uf.find(t);
            self.model.insert(t, TheoryValue::Class(rep));
        }
        debug!(
            terms = self.terms.len(),
            classes = self.uf.num_classes(),
            "EUF: cube consistent"
        );
        Ok(true)
    }

    fn register(
        &mut self,
        tm: &TermManager,
        t: TermId,
        seen: &mut FxHashSet<TermId>,
        apps: &mut Vec<TermId>,
    ) {
        if !seen.insert(t) {
            return;
        }
        self.uf.make_set(t);
        self.terms.push(t);
        if let Some(TermKind::Apply { args, .. }) = tm.get(t).map(|term| &term.kind) {
            apps.push(t);
            for &arg in args {
                self.register(tm, arg, seen, apps);
            }
        }
    }

    /// Merge congruent applications until a fixed point.
    fn saturate(&mut self, tm: &TermManager, apps: &[TermId]) {
        loop {
            self.stats.rounds += 1;
            let mut table: FxHashMap<Signature, TermId> = FxHashMap::default();
            let mut changed = false;
            for &app in apps {
                let Some(TermKind::Apply { func, args }) = tm.get(app).map(|t| &t.kind) else {
                    continue;
                };
                let sig: Signature = (*func, args.iter().map(|&a| self.uf.find(a)).collect());
                match table.get(&sig) {
                    Some(&other) => {
                        if self.uf.union(app, other) {
                            self.stats.congruence_merges += 1;
                            changed = true;
                        }
                    }
                    None => {
                        table.insert(sig, app);
                    }
                }
            }
            if !changed {
                break;
            }
        }
    }

    /// Equalities between each term of the last checked cube and its class
    /// representative. Application-to-application equalities are not flat
    /// and need flattening before being checked again. Predicate applications
    /// are skipped.
    pub fn induced_equalities(&mut self, tm: &mut TermManager) -> Vec<TermId> {
        let mut out = Vec::new();
        for i in 0..self.terms.len() {
            let t = self.terms[i];
            let rep = self.uf.find(t);
            if rep != t && !tm.sort(t).is_some_and(|s| s.is_bool()) {
                out.push(tm.mk_eq(t, rep));
            }
        }
        out
    }

    /// Classes of the last checked cube, each sorted, in order of first term.
    pub fn classes(&mut self) -> Vec<Vec<TermId>> {
        let mut by_rep: FxHashMap<TermId, usize> = FxHashMap::default();
        let mut classes: Vec<Vec<TermId>> = Vec::new();
        for i in 0..self.terms.len() {
            let t = self.terms[i];
            let rep = self.uf.find(t);
            let idx = *by_rep.entry(rep).or_insert_with(|| {
                classes.push(Vec::new());
                classes.len() - 1
            });
            classes[idx].push(t);
        }
        for class in &mut classes {
            class.sort_unstable();
        }
        classes
    }
}

impl Theory for EufSolver {
    fn name(&self) -> &str {
        "EUF"
    }

    fn reset(&mut self) {
        self.uf = UnionFind::new();
        self.terms.clear();
        self.model = TheoryModel::default();
    }

    fn check_cube(&mut self, tm: &mut TermManager, cube: &[TermId]) -> Result<TheoryCheckResult> {
        let flat = Flattener::new().flatten(tm, cube)?;
        Ok(if self.check(tm, &flat)? {
            TheoryCheckResult::Sat
        } else {
            TheoryCheckResult::Unsat
        })
    }

    fn model(&self) -> &TheoryModel {
        &self.model
    }
}

/// Decide a flat cube by congruence closure.
pub fn uf_theory_check(tm: &TermManager, flat_cube: &[TermId]) -> Result<bool> {
    EufSolver::new().check(tm, flat_cube)
}
