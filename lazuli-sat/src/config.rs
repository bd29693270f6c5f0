//! CDCL engine configuration.

/// Tuning knobs for the CDCL engine.
///
/// None of these affect soundness or completeness: restarts grow
/// geometrically and forgetting intervals grow linearly, so the search always
/// gets enough room to finish.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Conflicts before the first restart (0 disables restarts)
    pub restart_first: u64,
    /// Growth factor of the restart interval
    pub restart_multiplier: f64,
    /// Conflicts between two halvings of literal activity (0 disables decay)
    pub decay_interval: u64,
    /// Conflicts before the first forget pass (0 disables forgetting)
    pub forget_first: u64,
    /// Added to the forget interval after each pass
    pub forget_increment: u64,
    /// Conflict budget; 0 means unlimited. Exhausting it yields `Unknown`.
    pub max_conflicts: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::balanced()
    }
}

impl SolverConfig {
    /// Default configuration
    #[must_use]
    pub fn balanced() -> Self {
        Self {
            restart_first: 100,
            restart_multiplier: 1.5,
            decay_interval: 256,
            forget_first: 2000,
            forget_increment: 300,
            max_conflicts: 0,
        }
    }

    /// Frequent restarts and aggressive forgetting, for small easy instances
    #[must_use]
    pub fn fast() -> Self {
        Self {
            restart_first: 50,
            restart_multiplier: 1.2,
            decay_interval: 128,
            forget_first: 500,
            forget_increment: 100,
            max_conflicts: 0,
        }
    }

    /// Rare restarts and a large learned clause database
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            restart_first: 700,
            restart_multiplier: 2.0,
            decay_interval: 256,
            forget_first: 10_000,
            forget_increment: 1000,
            max_conflicts: 0,
        }
    }

    /// Set the conflict budget
    #[must_use]
    pub fn with_max_conflicts(mut self, max_conflicts: u64) -> Self {
        self.max_conflicts = max_conflicts;
        self
    }

    /// Set the first restart interval and its growth factor
    #[must_use]
    pub fn with_restarts(mut self, first: u64, multiplier: f64) -> Self {
        self.restart_first = first;
        self.restart_multiplier = multiplier;
        self
    }

    /// Set the activity decay cadence
    #[must_use]
    pub fn with_decay_interval(mut self, interval: u64) -> Self {
        self.decay_interval = interval;
        self
    }

    /// Set the forget schedule
    #[must_use]
    pub fn with_forget(mut self, first: u64, increment: u64) -> Self {
        self.forget_first = first;
        self.forget_increment = increment;
        self
    }
}
