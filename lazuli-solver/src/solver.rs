//! DPLL(T) refinement loop.
//!
//! The Boolean skeleton of the query is encoded once. Each round the CDCL
//! engine proposes an assignment, the theory literals it stands for form a
//! cube, and the theory solver either accepts the cube or the assignment of
//! the atom proxies is blocked with a new clause.

use crate::config::{SolverConfig, TheoryKind};
use crate::model::Model;
use crate::skeleton::BooleanSkeleton;
use lazuli_core::ast::{TermId, TermManager};
use lazuli_core::error::{LazuliError, Result};
use lazuli_core::{Lit, Var};
use lazuli_sat::{Solver as SatSolver, SolverResult as SatResult, TseitinEncoder};
use lazuli_theories::{BvSolver, EufSolver, Theory, TheoryCheckResult, TheoryModel};
use rustc_hash::FxHashMap;
use std::fmt;
use tracing::{debug, info};

/// Result of SMT solving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverResult {
    /// Satisfiable
    Sat,
    /// Unsatisfiable
    Unsat,
    /// Unknown (a conflict or refinement budget ran out)
    Unknown,
}

impl fmt::Display for SolverResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sat => write!(f, "sat"),
            Self::Unsat => write!(f, "unsat"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Verdict with the model of a satisfiable query
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    /// Verdict
    pub result: SolverResult,
    /// Model, present exactly when the verdict is `Sat`
    pub model: Option<Model>,
}

/// Solver statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    /// Theory atoms in the skeleton
    pub atoms: u64,
    /// Calls to the CDCL engine
    pub sat_calls: u64,
    /// Cubes handed to the theory solver
    pub theory_checks: u64,
    /// Blocking clauses added
    pub refinements: u64,
    /// Literals over all blocking clauses
    pub blocking_literals: u64,
}

impl Statistics {
    /// Reset all statistics
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// DPLL(T) solver over one theory at a time
#[derive(Debug, Default)]
pub struct Solver {
    config: SolverConfig,
    stats: Statistics,
    rejected: Vec<Vec<TermId>>,
}

impl Solver {
    /// Create a solver with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a solver with the given configuration
    #[must_use]
    pub fn with_config(config: SolverConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Get the configuration
    #[must_use]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Get statistics of the last query
    #[must_use]
    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    /// Cubes the theory rejected during the last query, in order.
    #[must_use]
    pub fn rejected_models(&self) -> &[Vec<TermId>] {
        &self.rejected
    }

    fn theory_solver(&self, kind: TheoryKind) -> Option<Box<dyn Theory>> {
        match kind {
            TheoryKind::Propositional => None,
            TheoryKind::Euf => Some(Box::new(EufSolver::new())),
            TheoryKind::BitVector => {
                Some(Box::new(BvSolver::with_config(self.config.bv_config())))
            }
        }
    }

    /// Decide `formula`.
    pub fn solve(&mut self, tm: &mut TermManager, formula: TermId) -> Result<SolveOutcome> {
        self.stats.reset();
        self.rejected.clear();

        let kind = match self.config.theory {
            Some(kind) => kind,
            None => TheoryKind::detect(tm, formula)?,
        };
        let skeleton = BooleanSkeleton::extract(tm, formula)?;
        self.stats.atoms = skeleton.atoms().len() as u64;
        if kind == TheoryKind::Propositional {
            if let Some(&(atom, _)) = skeleton.atoms().first() {
                return Err(LazuliError::MixedTheories(format!(
                    "theory atom {} in a propositional query",
                    tm.display(atom)
                )));
            }
        }

        let mut encoder = TseitinEncoder::new();
        encoder.encode(tm, skeleton.formula())?;
        let mut atom_vars = Vec::with_capacity(skeleton.atoms().len());
        for &(atom, proxy) in skeleton.atoms() {
            let var = encoder
                .var_of(proxy)
                .ok_or(LazuliError::UnknownTerm(proxy.raw()))?;
            atom_vars.push((atom, var));
        }
        debug!(
            ?kind,
            atoms = atom_vars.len(),
            vars = encoder.cnf().num_vars(),
            clauses = encoder.cnf().len(),
            "DPLL(T): skeleton encoded"
        );

        let mut sat = SatSolver::from_cnf(encoder.cnf(), self.config.sat.clone());
        let mut theory = self.theory_solver(kind);

        loop {
            self.stats.sat_calls += 1;
            match sat.solve() {
                SatResult::Sat => {}
                SatResult::Unsat => return Ok(self.finish(SolverResult::Unsat, None)),
                SatResult::Unknown => return Ok(self.finish(SolverResult::Unknown, None)),
            }

            let mut cube = Vec::with_capacity(atom_vars.len());
            let mut blocking = Vec::with_capacity(atom_vars.len());
            for &(atom, var) in &atom_vars {
                let value = sat.value(var).is_true();
                cube.push(if value { atom } else { tm.mk_not(atom) });
                blocking.push(Lit::new(var, value));
            }

            let verdict = match theory.as_mut() {
                Some(theory) if !cube.is_empty() => {
                    self.stats.theory_checks += 1;
                    theory.check_cube(tm, &cube)?
                }
                _ => TheoryCheckResult::Sat,
            };
            match verdict {
                TheoryCheckResult::Sat => {
                    let theory_model = theory
                        .as_ref()
                        .map(|t| t.model().clone())
                        .unwrap_or_default();
                    let model = build_model(&skeleton, &encoder, &sat, cube, theory_model);
                    return Ok(self.finish(SolverResult::Sat, Some(model)));
                }
                TheoryCheckResult::Unknown => {
                    return Ok(self.finish(SolverResult::Unknown, None));
                }
                TheoryCheckResult::Unsat => {}
            }

            self.stats.refinements += 1;
            self.stats.blocking_literals += blocking.len() as u64;
            debug!(
                round = self.stats.refinements,
                literals = blocking.len(),
                "DPLL(T): theory rejected assignment, blocking it"
            );
            self.rejected.push(cube);

            let budget = self.config.max_refinements;
            if budget > 0 && self.stats.refinements >= budget {
                return Ok(self.finish(SolverResult::Unknown, None));
            }
            if !sat.add_clause(blocking) {
                return Ok(self.finish(SolverResult::Unsat, None));
            }
        }
    }

    fn finish(&self, result: SolverResult, model: Option<Model>) -> SolveOutcome {
        info!(
            %result,
            sat_calls = self.stats.sat_calls,
            refinements = self.stats.refinements,
            "DPLL(T) finished"
        );
        SolveOutcome { result, model }
    }
}

fn build_model(
    skeleton: &BooleanSkeleton,
    encoder: &TseitinEncoder,
    sat: &SatSolver,
    literals: Vec<TermId>,
    theory: TheoryModel,
) -> Model {
    let booleans: FxHashMap<TermId, bool> = skeleton
        .bool_vars()
        .iter()
        .filter_map(|&v| {
            let var: Var = encoder.var_of(v)?;
            Some((v, sat.value(var).is_true()))
        })
        .collect();
    Model::new(literals, booleans, theory)
}

/// Decide `formula` with the default configuration.
pub fn dpll_t_solve(tm: &mut TermManager, formula: TermId) -> Result<SolverResult> {
    Ok(Solver::new().solve(tm, formula)?.result)
}
