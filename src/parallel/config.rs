//! Parallel annealing configuration.

use crate::error::{Result, ScheduleError};
use crate::sa::{AnnealConfig, CoolingLaw};

/// Configuration for the multi-worker coordinator.
///
/// `anneal` configures every worker's run. Its `seed` seeds the
/// coordinator's master generator, from which each worker's generator is
/// seeded in turn.
///
/// # Examples
///
/// ```
/// use u_flowsched::parallel::ParallelConfig;
///
/// let config = ParallelConfig::default()
///     .with_workers(8)
///     .with_round_stagnation_limit(5)
///     .with_seed(42);
/// assert_eq!(config.workers, 8);
/// assert_eq!(config.anneal.seed, Some(42));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParallelConfig {
    /// Independent annealing runs per round, one thread each.
    pub workers: usize,

    /// Rounds allowed without improving the global best before stopping.
    pub round_stagnation_limit: usize,

    /// Per-worker run configuration.
    pub anneal: AnnealConfig,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            round_stagnation_limit: 10,
            anneal: AnnealConfig::default(),
        }
    }
}

impl ParallelConfig {
    pub fn with_workers(mut self, n: usize) -> Self {
        self.workers = n;
        self
    }

    pub fn with_round_stagnation_limit(mut self, n: usize) -> Self {
        self.round_stagnation_limit = n;
        self
    }

    pub fn with_anneal(mut self, anneal: AnnealConfig) -> Self {
        self.anneal = anneal;
        self
    }

    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.anneal.initial_temperature = t;
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingLaw) -> Self {
        self.anneal.cooling = cooling;
        self
    }

    /// Sets the per-worker iteration stagnation limit.
    pub fn with_stagnation_limit(mut self, n: usize) -> Self {
        self.anneal.stagnation_limit = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.anneal.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(ScheduleError::config("workers must be at least 1"));
        }
        self.anneal.validate()
    }
}
