//! CDCL search engine.
//!
//! The main loop applies the classic transitions in priority order:
//!
//! 1. **Fail**: a conflict at decision level 0 makes the clause set UNSAT.
//! 2. **Restart**: when the restart interval has elapsed, drop every level
//!    above 0 and keep all clauses.
//! 3. **Conflict** / **Unit propagation**: two-watched-literal propagation
//!    either reports a falsified clause or extends the trail with forced
//!    literals, each justified by its reason clause.
//! 4. **Explain**: resolve the conflict clause against reason clauses until
//!    exactly one literal of the current level remains (first UIP).
//! 5. **Learn** and **Backjump**: store the learned clause, return to the
//!    second-highest level in it and assert the remaining literal there.
//! 6. **Forget**: periodically drop the less active half of the learned
//!    clauses that are not the reason of any trail literal.
//! 7. **Decide**: branch on the unassigned literal with the highest activity.
//!
//! When no transition applies, every variable is assigned and no clause is
//! falsified, so the trail is a model.

use crate::activity::LitActivity;
use crate::clause::{ClauseDb, ClauseRef};
use crate::cnf::{ClauseLits, Cnf, normalize};
use crate::config::SolverConfig;
use crate::trail::{LBool, Trail};
use lazuli_core::{Lit, Var};
use smallvec::smallvec;
use tracing::{debug, info, trace};

/// Result of a SAT solver call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverResult {
    /// A model was found.
    Sat,
    /// The clause set is unsatisfiable.
    Unsat,
    /// The conflict budget ran out.
    Unknown,
}

/// Search statistics, cumulative over all `solve` calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    /// Decisions made
    pub decisions: u64,
    /// Literals propagated
    pub propagations: u64,
    /// Conflicts encountered
    pub conflicts: u64,
    /// Restarts performed
    pub restarts: u64,
    /// Clauses learned
    pub learned_clauses: u64,
    /// Learned clauses forgotten
    pub forgotten_clauses: u64,
}

#[derive(Debug, Clone, Copy)]
struct Watcher {
    cref: ClauseRef,
    blocker: Lit,
}

/// CDCL SAT solver.
#[derive(Debug)]
pub struct Solver {
    config: SolverConfig,
    clauses: ClauseDb,
    /// Clauses watching each literal, visited when that literal becomes false.
    watches: Vec<Vec<Watcher>>,
    trail: Trail,
    activity: LitActivity,
    qhead: usize,
    ok: bool,
    num_vars: u32,
    seen: Vec<bool>,
    model: Vec<LBool>,
    stats: Statistics,
    conflicts_since_restart: u64,
    restart_limit: f64,
    forget_interval: u64,
    next_forget: u64,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    /// Create a solver with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SolverConfig::default())
    }

    /// Create a solver with the given configuration.
    #[must_use]
    pub fn with_config(config: SolverConfig) -> Self {
        Self {
            activity: LitActivity::new(config.decay_interval),
            restart_limit: config.restart_first as f64,
            forget_interval: config.forget_first,
            next_forget: config.forget_first,
            config,
            clauses: ClauseDb::new(),
            watches: Vec::new(),
            trail: Trail::new(),
            qhead: 0,
            ok: true,
            num_vars: 0,
            seen: Vec::new(),
            model: Vec::new(),
            stats: Statistics::default(),
            conflicts_since_restart: 0,
        }
    }

    /// Create a solver loaded with every clause of `cnf`.
    #[must_use]
    pub fn from_cnf(cnf: &Cnf, config: SolverConfig) -> Self {
        let mut solver = Self::with_config(config);
        solver.add_cnf(cnf);
        solver
    }

    /// Add every clause of `cnf`. Returns `false` once the clause set is known UNSAT.
    pub fn add_cnf(&mut self, cnf: &Cnf) -> bool {
        self.ensure_vars(cnf.num_vars());
        for clause in cnf.clauses() {
            self.add_clause(clause.iter().copied());
        }
        self.ok
    }

    /// Allocate a fresh variable.
    pub fn new_var(&mut self) -> Var {
        let v = Var::new(self.num_vars);
        self.ensure_vars(self.num_vars + 1);
        v
    }

    /// Make sure variables `0..num_vars` exist.
    pub fn ensure_vars(&mut self, num_vars: u32) {
        if num_vars <= self.num_vars {
            return;
        }
        self.num_vars = num_vars;
        let n = num_vars as usize;
        self.trail.resize(n);
        self.activity.resize(n);
        self.watches.resize_with(n * 2, Vec::new);
        self.seen.resize(n, false);
    }

    /// Number of variables.
    #[must_use]
    pub fn num_vars(&self) -> u32 {
        self.num_vars
    }

    /// Add a clause. Returns `false` once the clause set is known UNSAT.
    ///
    /// May be called after `solve`: the trail is reset to level 0 and learned
    /// clauses are kept, since they stay implied by the grown clause set.
    pub fn add_clause(&mut self, lits: impl IntoIterator<Item = Lit>) -> bool {
        let Some(clause) = normalize(lits) else {
            return self.ok;
        };
        if let Some(max) = clause.iter().map(|l| l.var().raw()).max() {
            self.ensure_vars(max + 1);
        }
        self.backtrack(0);
        if !self.ok {
            return false;
        }
        if clause.iter().any(|&l| self.trail.value(l).is_true()) {
            return true;
        }
        let clause: ClauseLits = clause
            .into_iter()
            .filter(|&l| !self.trail.value(l).is_false())
            .collect();
        if self.clauses.contains(&clause) {
            return true;
        }
        self.activity.count_occurrences(&clause);

        match clause.len() {
            0 => {
                self.ok = false;
            }
            1 => {
                let lit = clause[0];
                let cref = self.clauses.insert(clause, false);
                self.trail.push_propagated(lit, cref);
            }
            _ => {
                let cref = self.clauses.insert(clause, false);
                self.attach(cref);
            }
        }
        self.ok
    }

    /// Add a clause given as DIMACS integers.
    pub fn add_clause_dimacs(&mut self, lits: &[i32]) -> bool {
        self.add_clause(lits.iter().filter_map(|&l| Lit::from_dimacs(l)))
    }

    fn attach(&mut self, cref: ClauseRef) {
        let Some(clause) = self.clauses.get(cref) else {
            return;
        };
        let (a, b) = (clause.lits[0], clause.lits[1]);
        self.watches[a.index()].push(Watcher { cref, blocker: b });
        self.watches[b.index()].push(Watcher { cref, blocker: a });
    }

    fn backtrack(&mut self, level: u32) {
        if self.trail.decision_level() > level {
            self.trail.backtrack_to(level);
            self.qhead = self.trail.len();
        }
    }

    /// Propagate until fixpoint; returns a falsified clause if one is found.
    fn propagate(&mut self) -> Option<ClauseRef> {
        let mut conflict = None;
        while self.qhead < self.trail.len() {
            let p = self.trail.lits()[self.qhead];
            self.qhead += 1;
            self.stats.propagations += 1;
            let false_lit = !p;

            let mut ws = std::mem::take(&mut self.watches[false_lit.index()]);
            let (mut i, mut j) = (0, 0);
            while i < ws.len() {
                let w = ws[i];
                i += 1;
                let Some(clause) = self.clauses.get_mut(w.cref) else {
                    // forgotten clause, drop the watcher
                    continue;
                };
                if self.trail.value(w.blocker).is_true() {
                    ws[j] = w;
                    j += 1;
                    continue;
                }

                if clause.lits[0] == false_lit {
                    clause.lits.swap(0, 1);
                }
                let first = clause.lits[0];
                let kept = Watcher {
                    cref: w.cref,
                    blocker: first,
                };
                if self.trail.value(first).is_true() {
                    ws[j] = kept;
                    j += 1;
                    continue;
                }

                let mut moved = false;
                for k in 2..clause.lits.len() {
                    if !self.trail.value(clause.lits[k]).is_false() {
                        clause.lits.swap(1, k);
                        self.watches[clause.lits[1].index()].push(kept);
                        moved = true;
                        break;
                    }
                }
                if moved {
                    continue;
                }

                ws[j] = kept;
                j += 1;
                if self.trail.value(first).is_false() {
                    conflict = Some(w.cref);
                    while i < ws.len() {
                        ws[j] = ws[i];
                        j += 1;
                        i += 1;
                    }
                } else {
                    self.trail.push_propagated(first, w.cref);
                }
            }
            ws.truncate(j);
            self.watches[false_lit.index()] = ws;

            if conflict.is_some() {
                self.qhead = self.trail.len();
                break;
            }
        }
        conflict
    }

    /// First-UIP conflict analysis. Returns the learned clause, asserting
    /// literal first and a literal of the backjump level second, together with
    /// the backjump level.
    fn analyze(&mut self, conflict: ClauseRef) -> (ClauseLits, u32) {
        let current = self.trail.decision_level();
        // slot 0 is filled with the UIP once it is found
        let mut learnt: ClauseLits = smallvec![Lit::from_raw(0)];
        let mut pending = 0usize;
        let mut resolved: Option<Lit> = None;
        let mut index = self.trail.len();
        let mut reason = conflict;

        loop {
            if let Some(clause) = self.clauses.get_mut(reason) {
                clause.activity += 1;
                for &q in &clause.lits {
                    if Some(q) == resolved {
                        continue;
                    }
                    let v = q.var();
                    let level = self.trail.level(v);
                    if self.seen[v.index()] || level == 0 {
                        continue;
                    }
                    self.seen[v.index()] = true;
                    if level >= current {
                        pending += 1;
                    } else {
                        learnt.push(q);
                    }
                }
            }

            let p = loop {
                index -= 1;
                let lit = self.trail.lits()[index];
                if self.seen[lit.var().index()] {
                    break lit;
                }
            };
            self.seen[p.var().index()] = false;
            pending -= 1;
            if pending == 0 {
                learnt[0] = !p;
                break;
            }
            resolved = Some(p);
            reason = self
                .trail
                .reason(p.var())
                .expect("non-UIP literal of the conflict level is propagated");
        }

        for lit in &learnt[1..] {
            self.seen[lit.var().index()] = false;
        }

        let bt_level = if learnt.len() == 1 {
            0
        } else {
            let mut max_i = 1;
            for i in 2..learnt.len() {
                if self.trail.level(learnt[i].var()) > self.trail.level(learnt[max_i].var()) {
                    max_i = i;
                }
            }
            learnt.swap(1, max_i);
            self.trail.level(learnt[1].var())
        };
        (learnt, bt_level)
    }

    fn learn(&mut self, learnt: ClauseLits, bt_level: u32) {
        debug_assert!(normalize(learnt.iter().copied()).is_some(), "tautology learned");
        self.backtrack(bt_level);
        let asserting = learnt[0];
        let attach = learnt.len() >= 2;
        let cref = self.clauses.insert(learnt, true);
        if attach {
            self.attach(cref);
        }
        self.trail.push_propagated(asserting, cref);
        self.stats.learned_clauses += 1;
    }

    fn restart_due(&self) -> bool {
        self.config.restart_first > 0 && self.conflicts_since_restart as f64 >= self.restart_limit
    }

    fn restart(&mut self) {
        self.backtrack(0);
        self.conflicts_since_restart = 0;
        self.restart_limit *= self.config.restart_multiplier.max(1.0);
        self.stats.restarts += 1;
        debug!(
            restarts = self.stats.restarts,
            conflicts = self.stats.conflicts,
            "restart"
        );
    }

    fn is_locked(&self, cref: ClauseRef) -> bool {
        self.clauses.get(cref).is_some_and(|c| {
            let implied = c.lits[0];
            self.trail.reason(implied.var()) == Some(cref) && self.trail.value(implied).is_true()
        })
    }

    fn forget(&mut self) {
        let mut candidates: Vec<(u64, ClauseRef)> = self
            .clauses
            .learned()
            .filter(|&cref| !self.is_locked(cref))
            .filter_map(|cref| {
                self.clauses
                    .get(cref)
                    .filter(|c| c.len() > 2)
                    .map(|c| (c.activity, cref))
            })
            .collect();
        candidates.sort_unstable();
        let removed = candidates.len() / 2;
        for &(_, cref) in &candidates[..removed] {
            self.clauses.remove(cref);
        }
        for (_, cref) in &candidates[removed..] {
            if let Some(c) = self.clauses.get_mut(*cref) {
                c.activity /= 2;
            }
        }
        self.stats.forgotten_clauses += removed as u64;
        self.forget_interval += self.config.forget_increment;
        self.next_forget = self.stats.conflicts + self.forget_interval;
        debug!(
            removed,
            kept = self.clauses.num_learned(),
            "forgot learned clauses"
        );
    }

    /// Search for a model of the clause set.
    pub fn solve(&mut self) -> SolverResult {
        self.model.clear();
        if !self.ok {
            return SolverResult::Unsat;
        }
        self.backtrack(0);
        let budget_start = self.stats.conflicts;

        loop {
            if let Some(conflict) = self.propagate() {
                self.stats.conflicts += 1;
                self.conflicts_since_restart += 1;
                if self.trail.decision_level() == 0 {
                    self.ok = false;
                    info!(
                        conflicts = self.stats.conflicts,
                        decisions = self.stats.decisions,
                        "CDCL: unsat"
                    );
                    return SolverResult::Unsat;
                }
                let (learnt, bt_level) = self.analyze(conflict);
                self.activity.on_conflict(&learnt);
                trace!(len = learnt.len(), bt_level, "learned clause");
                self.learn(learnt, bt_level);

                if self.config.max_conflicts > 0
                    && self.stats.conflicts - budget_start >= self.config.max_conflicts
                {
                    self.backtrack(0);
                    info!(conflicts = self.stats.conflicts, "CDCL: conflict budget exhausted");
                    return SolverResult::Unknown;
                }
                continue;
            }

            if self.restart_due() {
                self.restart();
            }
            if self.config.forget_first > 0 && self.stats.conflicts >= self.next_forget {
                self.forget();
            }

            match self.activity.pick(&self.trail) {
                Some(lit) => {
                    self.stats.decisions += 1;
                    trace!(%lit, level = self.trail.decision_level() + 1, "decide");
                    self.trail.push_decision(lit);
                }
                None => {
                    debug_assert_eq!(crate::invariants::check_all_sat_invariants(self), Ok(()));
                    self.model = self.trail.values().to_vec();
                    info!(
                        conflicts = self.stats.conflicts,
                        decisions = self.stats.decisions,
                        "CDCL: sat"
                    );
                    return SolverResult::Sat;
                }
            }
        }
    }

    /// Model of the last successful `solve`, indexed by variable.
    #[must_use]
    pub fn model(&self) -> &[LBool] {
        &self.model
    }

    /// Model value of a variable.
    #[must_use]
    pub fn value(&self, var: Var) -> LBool {
        self.model.get(var.index()).copied().unwrap_or_default()
    }

    /// Model as one literal per variable, ordered by variable.
    #[must_use]
    pub fn model_lits(&self) -> Vec<Lit> {
        self.model
            .iter()
            .enumerate()
            .map(|(i, v)| Lit::new(Var::new(i as u32), !v.is_true()))
            .collect()
    }

    /// Decision literals of the current trail.
    #[must_use]
    pub fn decisions(&self) -> Vec<Lit> {
        self.trail.decisions().collect()
    }

    /// Current trail.
    #[must_use]
    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    /// Clause database.
    #[must_use]
    pub fn clause_db(&self) -> &ClauseDb {
        &self.clauses
    }

    /// Whether unit propagation has processed the whole trail.
    #[must_use]
    pub fn propagation_complete(&self) -> bool {
        self.qhead == self.trail.len()
    }

    /// Search statistics.
    #[must_use]
    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    /// Configuration.
    #[must_use]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}

/// Solve a clause set, returning one literal per variable on SAT and `None` on UNSAT.
#[must_use]
pub fn cdcl_solve(cnf: &Cnf) -> Option<Vec<Lit>> {
    let mut solver = Solver::from_cnf(cnf, SolverConfig::default());
    match solver.solve() {
        SolverResult::Sat => Some(solver.model_lits()),
        SolverResult::Unsat | SolverResult::Unknown => None,
    }
}
