//! BitVector Theory Solver

use super::blaster::BitBlaster;
use crate::config::BvConfig;
use crate::theory::{Theory, TheoryCheckResult, TheoryModel, TheoryValue};
use lazuli_core::ast::{TermId, TermManager};
use lazuli_core::error::Result;
use lazuli_sat::{Solver as SatSolver, SolverResult, TseitinEncoder};
use tracing::debug;

/// Statistics for the bit-vector solver
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BvStats {
    /// Cubes checked
    pub checks: u64,
    /// Bit-vector terms blasted since the last reset
    pub blasted_terms: u64,
    /// Clauses handed to the SAT engine in the last check
    pub clauses: u64,
}

/// BitVector Theory Solver using bit-blasting
///
/// Each check blasts the cube, encodes it to clauses and runs a fresh CDCL
/// engine. On success the model records the value of every blasted term.
/// Bits and atom proxies are kept between checks until [`Theory::reset`], so
/// repeated cubes over the same terms add nothing to the term manager.
#[derive(Debug, Default)]
pub struct BvSolver {
    config: BvConfig,
    blaster: Option<BitBlaster>,
    model: TheoryModel,
    stats: BvStats,
}

impl BvSolver {
    /// Create a new BV solver
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a solver with the given configuration
    #[must_use]
    pub fn with_config(config: BvConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &BvConfig {
        &self.config
    }

    /// Get statistics
    #[must_use]
    pub fn stats(&self) -> &BvStats {
        &self.stats
    }

    /// Value of a bit-vector term in the last satisfying model
    #[must_use]
    pub fn value(&self, term: TermId) -> Option<u64> {
        self.model.bitvec_value(term)
    }

    /// Decide a cube of bit-vector atoms.
    pub fn check(&mut self, tm: &mut TermManager, cube: &[TermId]) -> Result<TheoryCheckResult> {
        self.model = TheoryModel::default();
        self.stats.checks += 1;

        // dropped on error so a half-blasted cube leaves no definitions behind
        let mut blaster = match self.blaster.take() {
            Some(blaster) => blaster,
            None => BitBlaster::new(self.config.width)?,
        };
        let formula = blaster.blast_cube(tm, cube)?;
        let mut encoder = TseitinEncoder::new();
        encoder.encode(tm, formula)?;

        self.stats.blasted_terms = blaster.terms().count() as u64;
        self.stats.clauses = encoder.cnf().len() as u64;
        debug!(
            atoms = cube.len(),
            terms = self.stats.blasted_terms,
            vars = encoder.cnf().num_vars(),
            clauses = self.stats.clauses,
            "BV: bit-blasted cube"
        );

        let mut sat = SatSolver::from_cnf(encoder.cnf(), self.config.sat.clone());
        let result = match sat.solve() {
            SolverResult::Sat => {
                let width = blaster.width();
                for term in blaster.terms() {
                    let Some(bits) = blaster.bits(term) else {
                        continue;
                    };
                    let mut value = 0u64;
                    for (i, &bit) in bits.iter().enumerate() {
                        let set = encoder
                            .var_of(bit)
                            .is_some_and(|v| sat.value(v).is_true());
                        if set {
                            value |= 1 << i;
                        }
                    }
                    self.model.insert(term, TheoryValue::BitVec { value, width });
                }
                TheoryCheckResult::Sat
            }
            SolverResult::Unsat => TheoryCheckResult::Unsat,
            SolverResult::Unknown => TheoryCheckResult::Unknown,
        };
        debug!(?result, "BV: check finished");
        self.blaster = Some(blaster);
        Ok(result)
    }
}

impl Theory for BvSolver {
    fn name(&self) -> &str {
        "BV"
    }

    fn reset(&mut self) {
        self.blaster = None;
        self.model = TheoryModel::default();
    }

    fn check_cube(&mut self, tm: &mut TermManager, cube: &[TermId]) -> Result<TheoryCheckResult> {
        self.check(tm, cube)
    }

    fn model(&self) -> &TheoryModel {
        &self.model
    }
}

/// Decide a cube of bit-vector atoms at the default width.
pub fn bitvector_theory_check(
    tm: &mut TermManager,
    cube: &[TermId],
) -> Result<TheoryCheckResult> {
    BvSolver::new().check(tm, cube)
}
