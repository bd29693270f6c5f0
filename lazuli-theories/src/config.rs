//! Theory solver configuration.

use lazuli_sat::SolverConfig;

/// Configuration for the bit-vector solver.
#[derive(Debug, Clone, PartialEq)]
pub struct BvConfig {
    /// Width every bit-vector term must have
    pub width: u32,
    /// Configuration of the SAT engine that decides the blasted formula
    pub sat: SolverConfig,
}

impl Default for BvConfig {
    fn default() -> Self {
        Self {
            width: 4,
            sat: SolverConfig::default(),
        }
    }
}

impl BvConfig {
    /// Set the bit width
    #[must_use]
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    /// Set the SAT engine configuration
    #[must_use]
    pub fn with_sat_config(mut self, sat: SolverConfig) -> Self {
        self.sat = sat;
        self
    }
}
